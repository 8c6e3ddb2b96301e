use lifegrid_engine::coords::Viewport;
use lifegrid_engine::core::{AppControl, FrameCtx};
use lifegrid_engine::device::Gpu;
use lifegrid_engine::paint::Color;
use lifegrid_sim::{CpuBackend, GridRenderer, SimConfig, Simulation};

use crate::demo::Demo;

/// Host simulation on the rayon pool; each new generation is uploaded into a
/// single display buffer before drawing.
pub struct LifeCpu {
    config: SimConfig,
    run: Option<Run>,
}

struct Run {
    sim: Simulation<CpuBackend>,
    renderer: GridRenderer,
    display: wgpu::Buffer,
}

impl Run {
    fn upload(&self, queue: &wgpu::Queue) -> lifegrid_sim::Result<()> {
        let cells = self.sim.current_buffer()?;
        queue.write_buffer(&self.display, 0, bytemuck::cast_slice(cells));
        Ok(())
    }
}

impl LifeCpu {
    pub const NAME: &'static str = "life-cpu";

    pub fn new(config: &SimConfig) -> Self {
        Self {
            config: config.clone(),
            run: None,
        }
    }
}

impl Demo for LifeCpu {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn start(&mut self, gpu: &Gpu<'_>, viewport: Viewport) -> lifegrid_sim::Result<()> {
        self.stop();

        let config = self.config.sized_to(viewport);
        let sim = Simulation::initialize(CpuBackend::new(), &config, &mut config.rng())?;
        let dims = sim.dims();

        let display = gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("lifegrid cpu display"),
            size: dims.byte_size(),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let mut renderer = GridRenderer::new(gpu.device(), config.style());
        renderer.bind(gpu.device(), dims, &[&display]);

        let run = Run {
            sim,
            renderer,
            display,
        };
        run.upload(gpu.queue())?;
        self.run = Some(run);
        Ok(())
    }

    fn frame(&mut self, ctx: &mut FrameCtx<'_, '_>, advance: bool) -> AppControl {
        let Some(run) = self.run.as_mut() else {
            return ctx.render(Color::LIGHT_GRAY, |_, _| {});
        };

        if advance {
            match run.sim.advance() {
                Ok(()) => {
                    if let Err(err) = run.upload(ctx.gpu.queue()) {
                        log::warn!("{}: upload failed: {err}", Self::NAME);
                    }
                }
                Err(err) => {
                    if super::on_advance_error(ctx, &err) == AppControl::Exit {
                        return AppControl::Exit;
                    }
                }
            }
        }

        let renderer = &mut run.renderer;
        ctx.render(Color::LIGHT_GRAY, |rctx, target| {
            renderer.render(rctx, target, 0)
        })
    }

    fn stop(&mut self) {
        if let Some(mut run) = self.run.take() {
            run.renderer.unbind();
            if let Err(err) = run.sim.release() {
                log::warn!("{}: release failed: {err}", Self::NAME);
            }
            run.display.destroy();
        }
    }

    fn generation(&self) -> u64 {
        self.run.as_ref().map_or(0, |r| r.sim.generation())
    }
}
