//! Window management module for screen-rule
//!
//! This module owns the winit event loop and the overlay window: a
//! transparent, undecorated, always-on-top window whose mouse
//! click-through is switched at runtime. The overlay logic talks to the
//! window only through [`WindowHost`], so it can be driven without a
//! display in tests.

pub mod drag;
pub mod events;
pub mod pointer;
pub mod winit_window;

pub use drag::WindowDragger;
pub use events::EventHandler;
pub use winit_window::{run, OverlayApp};

/// Window operations the overlay needs each tick
pub trait WindowHost {
    /// Outer window position in physical screen pixels
    fn window_position(&self) -> (i32, i32);

    /// Move the window to `position` (physical screen pixels)
    fn set_window_position(&mut self, position: (i32, i32));

    /// Whether mouse events currently pass through the window
    fn mouse_passthrough(&self) -> bool;

    /// Enable or disable mouse click-through
    fn set_mouse_passthrough(&mut self, enabled: bool);
}

/// Logical to physical ratio per axis
///
/// Falls back to 1.0 on an axis with a zero logical size.
pub fn scale_ratio(outside: (u32, u32), logical: (u32, u32)) -> (f64, f64) {
    let ratio = |outside: u32, logical: u32| {
        if logical == 0 {
            1.0
        } else {
            outside as f64 / logical as f64
        }
    };
    (ratio(outside.0, logical.0), ratio(outside.1, logical.1))
}
