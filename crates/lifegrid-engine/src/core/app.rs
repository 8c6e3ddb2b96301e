use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;

/// Whether the runtime should keep going after a callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Callbacks the runtime drives.
pub trait App {
    /// Sees every window event before the runtime reacts to it (resize,
    /// close). Returning `Exit` shuts down without handling the event.
    fn on_window_event(&mut self, _id: WindowId, _event: &WindowEvent) -> AppControl {
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Runs once while the device is still alive, before the window closes.
    /// Release GPU resources here.
    fn on_exit(&mut self) {}
}
