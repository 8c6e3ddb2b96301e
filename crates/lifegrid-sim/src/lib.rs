//! Double-buffered Game of Life.
//!
//! The authoritative grid lives in a pair of backend arenas held by a
//! [`GridStore`]. Each tick a [`GridBackend`] writes the next generation into
//! the scratch arena and the roles swap; [`GridRenderer`] draws whichever
//! arena is current.

pub mod backend;
pub mod config;
pub mod error;
pub mod grid;
pub mod present;
pub mod rule;
pub mod seed;
pub mod store;

mod simulation;

pub use backend::{CpuBackend, GpuBackend, GridBackend};
pub use config::SimConfig;
pub use error::{Result, SimError};
pub use grid::{Generation, GridDims};
pub use present::{GridRenderer, GridStyle};
pub use simulation::Simulation;
pub use store::GridStore;
