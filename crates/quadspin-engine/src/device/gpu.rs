use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface;
use super::{DepthBuffer, GpuFrame, GpuInit, SurfaceErrorAction};

/// Owns wgpu core objects and the surface configuration.
///
/// This type is the low-level rendering context:
/// - creates and stores Instance/Adapter/Device/Queue
/// - creates and configures the Surface (swapchain) and optional depth buffer
/// - acquires frames and provides an encoder + view for rendering
pub struct Gpu<'w> {
    /// wgpu instance used to create the adapter and surface.
    #[allow(dead_code)]
    instance: wgpu::Instance,

    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Surface bound to the window.
    ///
    /// Surface lifetime is tied to the window; the runtime keeps the window
    /// alive for as long as this `Gpu` exists.
    surface: wgpu::Surface<'w>,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Depth attachment matching `size`, if requested in `GpuInit`.
    depth: Option<DepthBuffer>,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(surface::is_drawable(size), "window has zero size");

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            depth_format,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("quadspin device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        // Errors outside a validation scope are logged; wgpu's default handler panics.
        device.on_uncaptured_error(Arc::new(|err: wgpu::Error| {
            log::error!("uncaptured wgpu error: {err}");
        }));

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps.formats, prefer_srgb)
            .context("no supported surface formats")?;

        let alpha_mode = surface::choose_alpha_mode(&surface_caps.alpha_modes, alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        let depth = depth_format.map(|f| DepthBuffer::new(&device, f, size));

        let gpu = Self {
            instance,
            adapter,
            surface,
            device,
            queue,
            config,
            depth,
            size,
        };

        let info = gpu.adapter_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        Ok(gpu)
    }

    /// Describes the selected adapter (name, backend, device type).
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the depth format, if a depth buffer is attached.
    pub fn depth_format(&self) -> Option<wgpu::TextureFormat> {
        self.depth.as_ref().map(DepthBuffer::format)
    }

    /// Returns the depth attachment view, if any.
    pub fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth.as_ref().map(DepthBuffer::view)
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Whether the surface currently has a non-zero extent.
    pub fn is_drawable(&self) -> bool {
        surface::is_drawable(self.size)
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reconfigures the surface (and depth buffer) after a resize.
    ///
    /// A 0x0 size only updates internal state; configuration is deferred until
    /// the window becomes drawable again.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let configured = surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );

        if !configured {
            return;
        }

        if let Some(depth) = self.depth.as_mut() {
            if depth.size() != new_size {
                *depth = DepthBuffer::new(&self.device, depth.format(), new_size);
            }
        }
    }

    /// Acquires the next surface texture and creates an encoder.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quadspin frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands for the given frame and presents it.
    pub fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        frame.surface_texture.present();
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
    }
}
