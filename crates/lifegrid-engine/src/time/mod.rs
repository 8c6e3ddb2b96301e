//! Time subsystem.
//!
//! Frame timing utilities decoupled from the runtime:
//! - one `FrameClock` per window; `tick()` once per presented frame
//! - `TickLimiter` gates work (simulation steps) to a bounded rate that is
//!   independent of the display refresh

mod frame_clock;
mod limiter;

pub use frame_clock::{FrameClock, FrameTime};
pub use limiter::TickLimiter;
