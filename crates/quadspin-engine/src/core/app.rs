use crate::time::FrameTime;

use super::ctx::{FrameCtx, LoadCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application lifecycle driven by [`Runtime`](crate::window::Runtime).
///
/// Call order for one window:
/// `on_load` once, then per redraw `on_update` followed by `on_render`,
/// with `on_resize` between frames whenever the drawable size changes, and
/// finally `on_unload` exactly once before the GPU context is dropped.
pub trait App {
    /// Called once after the window and GPU context exist.
    fn on_load(&mut self, ctx: &mut LoadCtx<'_, '_>) {
        let _ = ctx;
    }

    /// Called after the surface has been resized, with the new physical size.
    ///
    /// Either dimension may be zero while the window is minimized.
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Advances simulation state by one tick.
    fn on_update(&mut self, time: FrameTime) -> AppControl {
        let _ = time;
        AppControl::Continue
    }

    /// Records and presents one frame.
    fn on_render(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Releases GPU resources created in `on_load`.
    fn on_unload(&mut self) {}
}
