//! Window, device and frame plumbing for the lifegrid demos.
//!
//! The simulation crate only needs [`device::ComputeDevice`] and the render
//! context types; the rest drives a single window.

pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod window;
