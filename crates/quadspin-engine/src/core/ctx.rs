use winit::window::Window;

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;

use super::app::AppControl;

/// Borrowed handle to the runtime's window.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the drawable size as `(width, height)` in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }
}

/// Context passed to `core::App::on_load`.
pub struct LoadCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu:    &'a Gpu<'w>,
}

impl<'a, 'w> LoadCtx<'a, 'w> {
    pub fn device(&self) -> &wgpu::Device {
        self.gpu.device()
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.gpu.surface_format()
    }

    pub fn depth_format(&self) -> Option<wgpu::TextureFormat> {
        self.gpu.depth_format()
    }

    /// Current drawable size as a viewport.
    pub fn viewport(&self) -> Viewport {
        let size = self.gpu.size();
        Viewport::from_physical(size.width, size.height)
    }
}

/// Per-frame context passed to `core::App::on_render`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu:    &'a mut Gpu<'w>,
    pub time:   FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Clears color and depth, calls `draw` with a ready [`RenderCtx`] and
    /// [`RenderTarget`], then presents the frame.
    ///
    /// Surface errors are handled here: lost/outdated surfaces are
    /// reconfigured and the frame skipped; out-of-memory returns `Exit`.
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        if !self.gpu.is_drawable() {
            return AppControl::Continue;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::debug!("surface acquisition failed: {err}");
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    log::error!("unrecoverable surface error; exiting");
                    return AppControl::Exit;
                }
                return AppControl::Continue;
            }
        };

        let depth_view = self.gpu.depth_view();

        // Clear pass, dropped before the encoder is borrowed by the target.
        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quadspin clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view:           &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load:  wgpu::LoadOp::Clear(clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: depth_view.map(|view| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view,
                        depth_ops: Some(wgpu::Operations {
                            load:  wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes:    None,
                occlusion_query_set: None,
                multiview_mask:      None,
            });
        }

        let size = self.gpu.size();
        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.gpu.depth_format(),
            Viewport::from_physical(size.width, size.height),
        );

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, depth_view);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
