use std::fmt;

/// Programmable pipeline stage a WGSL module is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Entry point name the stage's WGSL source must define.
    pub const fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex shader"),
            ShaderStage::Fragment => f.write_str("fragment shader"),
        }
    }
}

/// A shader module plus the outcome of its compile check.
pub struct CompiledStage {
    pub stage: ShaderStage,
    pub module: wgpu::ShaderModule,
    /// `false` when wgpu reported a validation error for the source.
    pub compiled: bool,
}

/// Compiles one WGSL stage inside a validation error scope.
///
/// A failed compile is not fatal: the diagnostic is logged naming the stage
/// and the (invalid) module is still returned, so loading carries on.
pub fn compile_stage(device: &wgpu::Device, stage: ShaderStage, label: &str, source: &str) -> CompiledStage {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let compiled = match pollster::block_on(scope.pop()) {
        Some(err) => {
            log::error!("error compiling {stage}: {err}");
            false
        }
        None => {
            log::debug!("compiled {stage} '{label}'");
            true
        }
    };

    CompiledStage {
        stage,
        module,
        compiled,
    }
}

/// A render pipeline plus the outcome of its link check.
pub struct LinkedPipeline {
    pub pipeline: wgpu::RenderPipeline,
    /// `false` when pipeline creation raised a validation error. Such a
    /// pipeline must never be bound: wgpu rejects the whole submission.
    pub linked: bool,
}

/// Creates a render pipeline inside a validation error scope.
///
/// Linking against a module that failed to compile is reported the same way
/// as a compile failure: logged, not fatal.
pub fn create_render_pipeline_checked(
    device: &wgpu::Device,
    desc: &wgpu::RenderPipelineDescriptor<'_>,
) -> LinkedPipeline {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(desc);

    let linked = match pollster::block_on(scope.pop()) {
        Some(err) => {
            let label = desc.label.unwrap_or("unnamed");
            log::error!("error linking shader program '{label}': {err}");
            false
        }
        None => true,
    };

    LinkedPipeline { pipeline, linked }
}
