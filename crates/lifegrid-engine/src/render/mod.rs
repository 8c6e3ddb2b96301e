//! GPU rendering context shared by renderers.
//!
//! Each renderer owns its GPU resources (pipelines, buffers) and records into
//! the frame encoder it is handed.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using the viewport.

mod ctx;
pub mod quad;

pub use ctx::{RenderCtx, RenderTarget};
