use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::FrameClock;

/// Window settings.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lifegrid".to_string(),
            initial_size: LogicalSize::new(960.0, 640.0),
        }
    }
}

/// Requests an app makes from inside a callback. They take effect once the
/// callback has returned.
#[derive(Default)]
pub struct RuntimeCtx {
    title: Option<String>,
    exit: bool,
}

impl RuntimeCtx {
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn exit(&mut self) {
        self.exit = true;
    }
}

/// Single-window event loop.
pub struct Runtime;

impl Runtime {
    /// Opens the window and drives `app` until it exits or the window is
    /// closed. A failed GPU setup is returned as the error.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut driver = Driver {
            config,
            gpu_init,
            app,
            session: None,
            fatal: None,
            finished: false,
        };
        event_loop
            .run_app(&mut driver)
            .context("winit event loop terminated with error")?;

        driver.fatal.map_or(Ok(()), Err)
    }
}

/// The window and the GPU context that borrows it.
#[self_referencing]
struct Session {
    clock: FrameClock,
    window: Window,
    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl Session {
    fn open(
        event_loop: &ActiveEventLoop,
        config: &RuntimeConfig,
        gpu_init: GpuInit,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        SessionTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }

    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }

    /// Rebuilds the swapchain for the window's current size.
    fn fit_surface(&mut self) {
        let size = self.with_window(|w| w.inner_size());
        self.with_gpu_mut(|gpu| gpu.resize(size));
    }
}

struct Driver<A: App + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    session: Option<Session>,
    fatal: Option<anyhow::Error>,
    finished: bool,
}

impl<A: App + 'static> Driver<A> {
    /// Lets the app release its resources, then drops the GPU context and the
    /// window, in that order. Runs once.
    fn finish(&mut self, event_loop: &ActiveEventLoop) {
        if !self.finished {
            self.finished = true;
            self.app.on_exit();
            self.session = None;
        }
        event_loop.exit();
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, requests: RuntimeCtx) {
        if let (Some(title), Some(session)) = (requests.title, self.session.as_ref()) {
            session.with_window(|w| w.set_title(&title));
        }
        if requests.exit {
            self.finish(event_loop);
        }
    }

    fn draw(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let app = &mut self.app;
        let mut requests = RuntimeCtx::default();

        let control = session.with_mut(|s| {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: s.window,
                },
                gpu: s.gpu,
                time: s.clock.tick(),
                runtime: &mut requests,
            };
            app.on_frame(&mut ctx)
        });

        if control == AppControl::Exit {
            requests.exit();
        }
        self.apply(event_loop, requests);
    }
}

impl<A: App + 'static> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() || self.finished {
            return;
        }
        match Session::open(event_loop, &self.config, self.gpu_init.clone()) {
            Ok(session) => {
                session.request_redraw();
                self.session = Some(session);
            }
            Err(err) => {
                log::error!("{err:#}");
                self.fatal = Some(err);
                self.finish(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.finished {
            event_loop.exit();
            return;
        }
        // Redraw continuously; the present mode paces frames.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(session) = self.session.as_ref() {
            session.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.finished {
            event_loop.exit();
            return;
        }
        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.finish(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.finish(event_loop),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(session) = self.session.as_mut() {
                    session.fit_surface();
                    session.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.draw(event_loop, window_id),
            _ => {}
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        self.finish(event_loop);
    }
}
