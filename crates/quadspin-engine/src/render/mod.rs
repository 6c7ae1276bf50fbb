//! GPU rendering helpers.
//!
//! Applications own their pipelines and buffers; this module provides the
//! per-frame context they draw with and the checked shader compilation path.
//!
//! Convention:
//! - the runtime clears color (and depth, when present) before `draw` runs
//! - renderers open their own passes with `LoadOp::Load`

mod ctx;
mod shader;

pub use ctx::{RenderCtx, RenderTarget};
pub use shader::{compile_stage, create_render_pipeline_checked, CompiledStage, LinkedPipeline, ShaderStage};
