use quadspin_engine::coords::Viewport;
use quadspin_engine::core::{App, AppControl, FrameCtx, LoadCtx};
use quadspin_engine::paint::Color;
use quadspin_engine::time::FrameTime;

use crate::animation::AnimationState;
use crate::quad::QuadRenderer;
use crate::scene::Transforms;

pub const CLEAR_COLOR: Color = Color::rgb(0.2, 0.4, 0.8);

/// Spinning, pulsing quad.
///
/// All state is owned here and threaded through the lifecycle callbacks:
/// `animation` is written by `on_update` and read by `on_render`, `viewport`
/// follows `on_resize`, and `quad` lives between `on_load` and `on_unload`.
pub struct QuadSpinApp {
    animation: AnimationState,
    viewport: Viewport,
    quad: Option<QuadRenderer>,
}

impl QuadSpinApp {
    pub fn new() -> Self {
        Self::with_animation(AnimationState::default())
    }

    pub fn with_animation(animation: AnimationState) -> Self {
        Self {
            animation,
            viewport: Viewport::default(),
            quad: None,
        }
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl Default for QuadSpinApp {
    fn default() -> Self {
        Self::new()
    }
}

impl App for QuadSpinApp {
    fn on_load(&mut self, ctx: &mut LoadCtx<'_, '_>) {
        self.viewport = ctx.viewport();
        self.quad = Some(QuadRenderer::new(
            ctx.device(),
            ctx.surface_format(),
            ctx.depth_format(),
        ));
        let (width, height) = ctx.window.physical_size();
        log::debug!("quad loaded for {width}x{height} window");
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::from_physical(width, height);
    }

    fn on_update(&mut self, time: FrameTime) -> AppControl {
        self.animation.update(time.dt);
        AppControl::Continue
    }

    fn on_render(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(quad) = self.quad.as_ref() else {
            return AppControl::Continue;
        };

        let viewport = self.viewport;
        let transforms = Transforms::for_frame(&self.animation, viewport);

        ctx.render(CLEAR_COLOR, |rctx, target| {
            quad.render(rctx, target, viewport, &transforms);
        })
    }

    fn on_unload(&mut self) {
        if let Some(quad) = self.quad.take() {
            quad.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ScaleDirection;

    fn tick(dt: f32) -> FrameTime {
        FrameTime { dt }
    }

    #[test]
    fn starts_from_default_animation() {
        let app = QuadSpinApp::new();
        assert_eq!(*app.animation(), AnimationState::new(0.5, 1.0, ScaleDirection::Up));
    }

    #[test]
    fn update_advances_animation_by_dt() {
        let mut app = QuadSpinApp::new();
        assert_eq!(app.on_update(tick(1.0)), AppControl::Continue);
        assert_eq!(app.animation().rotation, 1.5);
        assert_eq!(app.animation().scale, 2.0);
        assert_eq!(app.animation().direction, ScaleDirection::Down);
    }

    #[test]
    fn resize_replaces_viewport() {
        let mut app = QuadSpinApp::new();
        app.on_resize(1280, 768);
        assert_eq!(app.viewport(), Viewport::new(1280.0, 768.0));
        app.on_resize(0, 768);
        assert_eq!(app.viewport(), Viewport::new(0.0, 768.0));
        assert_eq!(app.viewport().aspect_ratio(), 1.0);
    }

    #[test]
    fn unload_without_load_is_a_no_op() {
        let mut app = QuadSpinApp::new();
        app.on_unload();
        app.on_unload();
    }

    #[test]
    fn clear_color_is_opaque_blue() {
        assert_eq!(CLEAR_COLOR, Color::rgb(0.2, 0.4, 0.8));
        assert_eq!(CLEAR_COLOR.to_wgpu().a, 1.0);
    }
}
