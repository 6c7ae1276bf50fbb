use std::sync::Once;

/// Filters applied when neither the config nor `RUST_LOG` names any.
///
/// wgpu logs adapter selection and every resource at info.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn";

/// Settings for the process-wide logger installed by [`init_logging`].
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` directives, e.g. `"quadspin_engine=debug"`. Overrides `RUST_LOG`.
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the `env_logger` backend for the `log` facade.
///
/// Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok());

        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .init();

        log::debug!("logging initialized with '{filter}'");
    });
}

/// Config directives win over `RUST_LOG`, which wins over [`DEFAULT_FILTER`].
fn resolve_filter(configured: Option<String>, from_env: Option<String>) -> String {
    let non_blank = |f: &String| !f.trim().is_empty();
    configured
        .filter(non_blank)
        .or(from_env.filter(non_blank))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}
