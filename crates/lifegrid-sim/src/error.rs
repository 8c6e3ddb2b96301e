//! Error types for grid simulation.

use thiserror::Error;

/// Errors reported by the grid store, the update backends and the facade.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimError {
    /// Device/compute backend unavailable or buffer allocation failed.
    /// Fatal; the simulation cannot start.
    #[error("simulation initialization failed: {0}")]
    InitializationFailure(String),

    /// One generation's compute work could not be submitted. The frame is
    /// skipped and the current generation stays authoritative.
    #[error("generation dispatch failed: {0}")]
    DispatchFailure(String),

    /// Any call on a store after `release()`.
    #[error("grid store used after release")]
    UseAfterRelease,

    /// Rejected before any allocation.
    #[error("invalid grid dimensions {rows}x{cols}")]
    InvalidDimensions { rows: u32, cols: u32 },

    #[error("live probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    /// Waiting on the device failed; the device is unusable.
    #[error("device lost: {0}")]
    DeviceLost(String),
}

impl SimError {
    /// Whether the caller may keep running and retry on a later frame.
    pub fn is_transient(&self) -> bool {
        matches!(self, SimError::DispatchFailure(_))
    }
}

pub type Result<T, E = SimError> = std::result::Result<T, E>;
