use crate::coords::Viewport;

/// Renderer-facing context (device/queue + target formats + viewport).
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
    pub viewport: Viewport, // physical px
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            depth_format,
            viewport,
        }
    }
}

/// Target for drawing (encoder + color view + optional depth view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: Option<&'a wgpu::TextureView>,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        depth_view: Option<&'a wgpu::TextureView>,
    ) -> Self {
        Self {
            encoder,
            color_view,
            depth_view,
        }
    }

    /// Depth attachment that keeps the cleared depth values and stores writes.
    pub fn depth_attachment(&self) -> Option<wgpu::RenderPassDepthStencilAttachment<'a>> {
        self.depth_view.map(|view| wgpu::RenderPassDepthStencilAttachment {
            view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        })
    }
}
