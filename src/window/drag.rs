//! Primary-button window dragging
//!
//! Pressing the left button anywhere outside the debug panel starts a
//! drag. While the button is held the window follows the cursor.

use crate::overlay::input::{FrameInput, MouseButton};
use crate::window::WindowHost;

/// Drag in progress
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    /// Window position when the drag started
    window_origin: (i32, i32),

    /// Window-local cursor when the drag started
    cursor_origin: (i32, i32),
}

/// Moves the host window while the primary button is held
#[derive(Debug)]
pub struct WindowDragger {
    drag: Option<DragState>,

    /// Logical to physical ratio per axis
    scale: (f64, f64),
}

impl WindowDragger {
    pub fn new() -> Self {
        Self {
            drag: None,
            scale: (1.0, 1.0),
        }
    }

    /// Update the logical to physical ratio
    pub fn set_scale(&mut self, scale: (f64, f64)) {
        self.scale = scale;
    }

    pub fn scale(&self) -> (f64, f64) {
        self.scale
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Advance the drag for one tick
    ///
    /// The cursor is window-local, so once the window has caught up the
    /// cursor is back at its origin. Each tick therefore moves the window
    /// by the offset from the origin, relative to where it is now.
    pub fn update(&mut self, input: &FrameInput, over_panel: bool, host: &mut dyn WindowHost) {
        if self.drag.is_none() && input.is_pressed(MouseButton::Left) && !over_panel {
            self.start_dragging(input.cursor, host);
        }

        let Some(drag) = self.drag else {
            return;
        };

        if input.is_released(MouseButton::Left) || !input.is_held(MouseButton::Left) {
            self.stop_dragging(host);
            return;
        }

        let delta = (
            ((input.cursor.0 - drag.cursor_origin.0) as f64 * self.scale.0) as i32,
            ((input.cursor.1 - drag.cursor_origin.1) as f64 * self.scale.1) as i32,
        );
        if delta == (0, 0) {
            return;
        }

        let (x, y) = host.window_position();
        host.set_window_position((x + delta.0, y + delta.1));
    }

    fn start_dragging(&mut self, cursor: (i32, i32), host: &dyn WindowHost) {
        let window_origin = host.window_position();
        log::debug!("Drag started at {:?}, window at {:?}", cursor, window_origin);
        self.drag = Some(DragState {
            window_origin,
            cursor_origin: cursor,
        });
    }

    fn stop_dragging(&mut self, host: &dyn WindowHost) {
        if let Some(drag) = self.drag.take() {
            log::debug!(
                "Drag ended, window moved from {:?} to {:?}",
                drag.window_origin,
                host.window_position()
            );
        }
    }
}

impl Default for WindowDragger {
    fn default() -> Self {
        Self::new()
    }
}
