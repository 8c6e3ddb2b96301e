//! Core engine-facing contracts.
//!
//! Stable interface between the runtime (platform loop) and higher layers
//! (demos, tools): the `App` callbacks and the per-frame context.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
