//! Device acquisition.
//!
//! [`Gpu`] binds a device to a window surface for the demos; [`ComputeDevice`]
//! is the device/queue pair on its own, which compute backends and headless
//! tests use.

mod context;
mod headless;
mod init;
mod surface;

pub use context::Gpu;
pub use headless::{ComputeDevice, request_compute_device};
pub use init::GpuInit;
pub use surface::{Frame, SurfaceRecovery};
