use lifegrid_engine::coords::Viewport;
use lifegrid_engine::core::{AppControl, FrameCtx};
use lifegrid_engine::device::Gpu;
use lifegrid_engine::paint::Color;
use lifegrid_sim::{GpuBackend, GridRenderer, SimConfig, Simulation};

use crate::demo::Demo;

/// Compute-shader simulation; the renderer reads both arenas directly.
pub struct LifeGpu {
    config: SimConfig,
    run: Option<Run>,
}

struct Run {
    sim: Simulation<GpuBackend>,
    renderer: GridRenderer,
}

impl LifeGpu {
    pub const NAME: &'static str = "life-gpu";

    pub fn new(config: &SimConfig) -> Self {
        Self {
            config: config.clone(),
            run: None,
        }
    }
}

impl Demo for LifeGpu {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn start(&mut self, gpu: &Gpu<'_>, viewport: Viewport) -> lifegrid_sim::Result<()> {
        self.stop();

        let config = self.config.sized_to(viewport);
        log::debug!("{}: adapter {}", Self::NAME, gpu.adapter_info().name);
        let backend = GpuBackend::new(gpu.compute().clone())?;
        let sim = Simulation::initialize(backend, &config, &mut config.rng())?;

        let mut renderer = GridRenderer::new(gpu.device(), config.style());
        let [a, b] = sim.store().arenas()?;
        renderer.bind(gpu.device(), sim.dims(), &[a, b]);

        self.run = Some(Run { sim, renderer });
        Ok(())
    }

    fn frame(&mut self, ctx: &mut FrameCtx<'_, '_>, advance: bool) -> AppControl {
        let Some(run) = self.run.as_mut() else {
            return ctx.render(Color::LIGHT_GRAY, |_, _| {});
        };

        // The dispatch is queued ahead of this frame's render commands.
        if advance {
            if let Err(err) = run.sim.advance() {
                if super::on_advance_error(ctx, &err) == AppControl::Exit {
                    return AppControl::Exit;
                }
            }
        }

        let Ok(slot) = run.sim.store().current_index() else {
            return ctx.render(Color::LIGHT_GRAY, |_, _| {});
        };
        let renderer = &mut run.renderer;
        ctx.render(Color::LIGHT_GRAY, |rctx, target| {
            renderer.render(rctx, target, slot)
        })
    }

    fn stop(&mut self) {
        if let Some(mut run) = self.run.take() {
            run.renderer.unbind();
            if let Err(err) = run.sim.release() {
                log::warn!("{}: release failed: {err}", Self::NAME);
            }
        }
    }

    fn generation(&self) -> u64 {
        self.run.as_ref().map_or(0, |r| r.sim.generation())
    }
}
