//! Color representation shared between demos and renderers.
//!
//! Colors are linear premultiplied RGBA; renderers upload them as-is.

pub mod color;

pub use color::Color;
