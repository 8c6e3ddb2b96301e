/// Settings for the windowed GPU context.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Use an sRGB swapchain format when the surface offers one.
    pub prefer_srgb: bool,

    /// FIFO paces presentation to the display and is always supported.
    pub present_mode: wgpu::PresentMode,

    /// The grid renderer binds cell storage in the vertex stage, which the
    /// downlevel WebGL2 limits do not allow.
    pub required_limits: wgpu::Limits,

    /// Frames the presentation engine may queue ahead (hint).
    pub max_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            required_limits: wgpu::Limits::default(),
            max_frame_latency: 2,
        }
    }
}
