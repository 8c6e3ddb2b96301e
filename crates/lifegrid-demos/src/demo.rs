use lifegrid_engine::coords::Viewport;
use lifegrid_engine::core::{AppControl, FrameCtx};
use lifegrid_engine::device::Gpu;

/// A selectable demo driven by the harness.
///
/// The harness calls `start` with the current viewport, `frame` once per
/// displayed frame, and `stop` before switching away, restarting or exiting.
/// `start` may be called again after `stop`.
pub trait Demo {
    fn name(&self) -> &'static str;

    /// Allocates the run's resources for a grid sized to `viewport`.
    fn start(&mut self, gpu: &Gpu<'_>, viewport: Viewport) -> lifegrid_sim::Result<()>;

    /// Presents the current generation, advancing one generation first when
    /// `advance` is set.
    fn frame(&mut self, ctx: &mut FrameCtx<'_, '_>, advance: bool) -> AppControl;

    /// Releases everything `start` allocated. No-op when not running.
    fn stop(&mut self);

    /// Completed generations of the current run.
    fn generation(&self) -> u64;
}
