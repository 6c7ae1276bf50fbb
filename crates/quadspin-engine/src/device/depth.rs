use winit::dpi::PhysicalSize;

/// Depth attachment sized to the surface.
///
/// Recreated on every resize; wgpu textures cannot change extent in place.
pub struct DepthBuffer {
    format: wgpu::TextureFormat,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, size: PhysicalSize<u32>) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("quadspin depth buffer"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { format, texture, view }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Current extent in physical pixels.
    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.texture.width(), self.texture.height())
    }
}

impl Drop for DepthBuffer {
    fn drop(&mut self) {
        self.texture.destroy();
    }
}
