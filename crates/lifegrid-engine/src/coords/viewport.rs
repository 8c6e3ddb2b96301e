/// Viewport size in logical pixels.
///
/// Renderers treat this as the basis for converting logical px positions to
/// NDC in shaders.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Number of whole `cell`-sized tiles that fit as `(rows, cols)`.
    ///
    /// Returns zeros for an invalid viewport or non-positive cell size.
    pub fn tiles(self, cell: f32) -> (u32, u32) {
        if !self.is_valid() || !(cell > 0.0) {
            return (0, 0);
        }
        let rows = (self.height / cell).floor() as u32;
        let cols = (self.width / cell).floor() as u32;
        (rows, cols)
    }

    /// Top-left corner `[x, y]` that centers a `width` x `height` box.
    ///
    /// Content larger than the viewport is pinned to the top-left corner.
    pub fn centered_origin(self, width: f32, height: f32) -> [f32; 2] {
        [
            ((self.width - width) * 0.5).max(0.0),
            ((self.height - height) * 0.5).max(0.0),
        ]
    }
}
