//! Built-in Game of Life demos.

mod life_cpu;
mod life_gpu;

pub use life_cpu::LifeCpu;
pub use life_gpu::LifeGpu;

use lifegrid_engine::core::{AppControl, FrameCtx};
use lifegrid_sim::SimError;

/// Shared handling of a failed tick: keep presenting the last generation
/// unless the device is gone.
fn on_advance_error(ctx: &FrameCtx<'_, '_>, err: &SimError) -> AppControl {
    if ctx.gpu.compute().is_lost() {
        log::error!("device lost, stopping: {err}");
        AppControl::Exit
    } else {
        AppControl::Continue
    }
}
