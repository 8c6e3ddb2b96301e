use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use lifegrid_engine::core::{App, AppControl, FrameCtx};
use lifegrid_engine::paint::Color;
use lifegrid_engine::time::TickLimiter;
use lifegrid_sim::{SimConfig, SimError};

use crate::demo::Demo;
use crate::registry::DemoRegistry;

/// Drives the active demo: paces generations, handles keys, and restarts the
/// run when the window is resized or the demo changes.
pub struct Harness {
    registry: DemoRegistry,
    config: SimConfig,
    demo: Box<dyn Demo>,
    limiter: TickLimiter,

    running: bool,
    /// Set when the run must be (re)started on the next frame.
    restart: bool,
    /// Start failed for the current viewport; wait for a resize.
    parked: bool,
    switch_to: Option<&'static str>,

    paused: bool,
    step_once: bool,
}

impl Harness {
    pub fn new(
        registry: DemoRegistry,
        requested: Option<&str>,
        config: SimConfig,
    ) -> anyhow::Result<Self> {
        let name = registry
            .resolve(requested)
            .ok_or_else(|| anyhow::anyhow!("no demos registered"))?;
        let demo = registry
            .create(name, &config)
            .ok_or_else(|| anyhow::anyhow!("demo '{name}' missing from registry"))?;

        Ok(Self {
            limiter: TickLimiter::new(config.tick_interval),
            registry,
            config,
            demo,
            running: false,
            restart: true,
            parked: false,
            switch_to: None,
            paused: false,
            step_once: false,
        })
    }

    fn on_key(&mut self, key: &Key) -> AppControl {
        match key {
            Key::Named(NamedKey::Escape) => return AppControl::Exit,
            Key::Named(NamedKey::Space) => {
                self.paused = !self.paused;
                log::info!("{}", if self.paused { "paused" } else { "resumed" });
            }
            Key::Named(NamedKey::Tab) => {
                self.switch_to = self.registry.next_after(self.demo.name());
            }
            Key::Character(c) if c.eq_ignore_ascii_case("s") => {
                if self.paused {
                    self.step_once = true;
                }
            }
            Key::Character(c) if c.eq_ignore_ascii_case("r") => self.request_restart(),
            _ => {}
        }
        AppControl::Continue
    }

    fn request_restart(&mut self) {
        self.restart = true;
        self.parked = false;
    }

    fn stop_demo(&mut self) {
        if self.running {
            log::info!(
                "{} stopped after {} generations",
                self.demo.name(),
                self.demo.generation()
            );
            self.demo.stop();
            self.running = false;
        }
    }

    /// Applies pending switch/restart requests.
    fn sync(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if let Some(name) = self.switch_to.take() {
            if let Some(next) = self.registry.create(name, &self.config) {
                self.stop_demo();
                self.demo = next;
                self.request_restart();
            }
        }

        if !self.restart || self.parked {
            return AppControl::Continue;
        }
        self.restart = false;
        self.stop_demo();

        let viewport = ctx.window.viewport();
        match self.demo.start(ctx.gpu, viewport) {
            Ok(()) => {
                self.running = true;
                self.limiter.reset();
                log::info!(
                    "{} started ({}x{} logical px)",
                    self.demo.name(),
                    viewport.width,
                    viewport.height
                );
                AppControl::Continue
            }
            Err(err @ SimError::InvalidDimensions { .. }) => {
                log::warn!("{}: {err}; waiting for a larger window", self.demo.name());
                self.parked = true;
                AppControl::Continue
            }
            Err(err) => {
                log::error!("{} failed to start: {err}", self.demo.name());
                AppControl::Exit
            }
        }
    }
}

impl App for Harness {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                self.on_key(&event.logical_key)
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.request_restart();
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.sync(ctx) == AppControl::Exit {
            return AppControl::Exit;
        }

        if !self.running {
            return ctx.render(Color::LIGHT_GRAY, |_, _| {});
        }

        let advance = if self.paused {
            std::mem::take(&mut self.step_once)
        } else {
            self.limiter.should_tick(ctx.time.now)
        };

        let control = self.demo.frame(ctx, advance);
        if advance {
            let state = if self.paused { " (paused)" } else { "" };
            ctx.runtime.set_title(format!(
                "lifegrid - {} - generation {}{state}",
                self.demo.name(),
                self.demo.generation()
            ));
        }
        control
    }

    fn on_exit(&mut self) {
        self.stop_demo();
    }
}
