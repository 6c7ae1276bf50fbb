//! Opens a window and animates a quad: rotation about +Y plus a pulsing scale.

mod animation;
mod app;
mod quad;
mod scene;

use anyhow::Result;

use quadspin_engine::device::GpuInit;
use quadspin_engine::logging::{init_logging, LoggingConfig};
use quadspin_engine::window::{Runtime, RuntimeConfig};

use crate::app::QuadSpinApp;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "quadspin".to_string(),
        ..RuntimeConfig::default()
    };

    // Linear surface: the fragment color constant is written as-is.
    let gpu_init = GpuInit {
        prefer_srgb: false,
        ..GpuInit::default()
    };

    Runtime::run(config, gpu_init, QuadSpinApp::new())
}
