//! Coordinate types shared across the engine and renderers.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Renderers convert to NDC in shaders using the viewport.

mod viewport;

pub use viewport::Viewport;
