use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::monitor::MonitorHandle;
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, LoadCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::{FrameClock, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Center the window on the primary monitor when it is created.
    pub centered: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "quadspin".to_string(),
            initial_size: LogicalSize::new(1280.0, 768.0),
            centered: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, drives `app` through its lifecycle, and returns once
    /// the window is closed or the app asks to exit.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.failure.map_or(Ok(()), Err)
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    /// Set once `on_load` has run; `on_unload` only fires when this is set.
    loaded: bool,
    exit_requested: bool,
    failure: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            loaded: false,
            exit_requested: false,
            failure: None,
        }
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let mut attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        if self.config.centered {
            let monitor = event_loop
                .primary_monitor()
                .or_else(|| event_loop.available_monitors().next());

            match monitor {
                Some(m) => {
                    attrs = attrs.with_position(center_on_monitor(&m, self.config.initial_size));
                }
                None => log::debug!("no monitor reported; leaving window placement to the platform"),
            }
        }

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        Ok(entry)
    }

    /// Creates the window and runs `on_load`.
    fn load(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let mut entry = self.create_window_entry(event_loop)?;

        let app = &mut self.app;
        entry.with_mut(|fields| {
            let mut ctx = LoadCtx {
                window: WindowCtx {
                    window: fields.window,
                },
                gpu: fields.gpu,
            };
            app.on_load(&mut ctx);

            // Loading time must not show up as the first frame's dt.
            fields.clock.reset();
            fields.window.request_redraw();
        });

        log::info!("loaded '{}'", self.config.title);

        self.loaded = true;
        self.window = Some(entry);
        Ok(())
    }

    /// Runs `on_unload` (once) and drops the window and its GPU context.
    fn unload(&mut self) {
        if std::mem::take(&mut self.loaded) {
            self.app.on_unload();
            log::info!("unloaded '{}'", self.config.title);
        }
        self.window = None;
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        self.unload();
        event_loop.exit();
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(entry) = self.window.as_mut() else { return };

        entry.with_gpu_mut(|gpu| gpu.resize(new_size));
        entry.with_window(|w| w.request_redraw());

        log::debug!("resized to {}x{}", new_size.width, new_size.height);
        self.app.on_resize(new_size.width, new_size.height);
    }

    /// Drives one update + render tick. Returns the combined control directive.
    fn frame(&mut self) -> AppControl {
        let app = &mut self.app;
        let Some(entry) = self.window.as_mut() else {
            return AppControl::Continue;
        };

        entry.with_mut(|fields| {
            let ft: FrameTime = fields.clock.tick();
            let drawable = fields.gpu.is_drawable();

            drive_frame(app, ft, drawable, |app| {
                let mut ctx = FrameCtx {
                    window: WindowCtx {
                        window: fields.window,
                    },
                    gpu: fields.gpu,
                    time: ft,
                };
                app.on_render(&mut ctx)
            })
        })
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exit_requested {
            return;
        }

        if let Err(e) = self.load(event_loop) {
            log::error!("failed to create initial window: {e:#}");
            self.failure = Some(e);
            self.request_exit(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous animation: every iteration schedules the next frame.
        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let owns_window = self
            .window
            .as_ref()
            .is_some_and(|entry| entry.with_window(|w| w.id()) == window_id);
        if !owns_window {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => self.resize(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(new_size) = self.window.as_ref().map(|e| e.with_window(|w| w.inner_size())) {
                    self.resize(new_size);
                }
            }

            WindowEvent::RedrawRequested => {
                if self.frame() == AppControl::Exit {
                    self.request_exit(event_loop);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unload();
    }
}

/// Runs `on_update`, then `render` if the surface can be drawn to.
///
/// Updates continue while the window is minimized; only rendering pauses.
fn drive_frame<A, R>(app: &mut A, time: FrameTime, drawable: bool, render: R) -> AppControl
where
    A: CoreApp,
    R: FnOnce(&mut A) -> AppControl,
{
    if app.on_update(time) == AppControl::Exit {
        return AppControl::Exit;
    }

    if !drawable {
        return AppControl::Continue;
    }

    render(app)
}

/// Top-left position that centers a window of `size` on `monitor`.
fn center_on_monitor(monitor: &MonitorHandle, size: LogicalSize<f64>) -> PhysicalPosition<i32> {
    let window_size: PhysicalSize<u32> = size.to_physical(monitor.scale_factor());
    centered_position(monitor.position(), monitor.size(), window_size)
}

fn centered_position(
    monitor_pos: PhysicalPosition<i32>,
    monitor_size: PhysicalSize<u32>,
    window_size: PhysicalSize<u32>,
) -> PhysicalPosition<i32> {
    // Windows larger than the monitor are pinned to its top-left corner.
    let dx = (i64::from(monitor_size.width) - i64::from(window_size.width)).max(0) / 2;
    let dy = (i64::from(monitor_size.height) - i64::from(window_size.height)).max(0) / 2;

    PhysicalPosition::new(monitor_pos.x + dx as i32, monitor_pos.y + dy as i32)
}
