//! Event handling for the winit window
//!
//! This module folds winit window and device events into the
//! [`RawInput`] consumed once per tick by the overlay.

use crate::overlay::input::{ButtonSet, MouseButton, RawInput, OFF_SCREEN_CURSOR};
use crate::window::pointer;
use winit::dpi::PhysicalPosition;
use winit::event::{
    DeviceEvent, ElementState, MouseButton as WinitMouseButton, WindowEvent as WinitWindowEvent,
};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Accumulates input between ticks
#[derive(Debug)]
pub struct EventHandler {
    /// Window-local cursor in logical pixels, if known
    cursor: Option<(f64, f64)>,

    held: ButtonSet,
    pressed: ButtonSet,
    released: ButtonSet,
    quit: bool,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            cursor: None,
            held: ButtonSet::EMPTY,
            pressed: ButtonSet::EMPTY,
            released: ButtonSet::EMPTY,
            quit: false,
        }
    }

    /// Handle a winit window event
    pub fn handle_window_event(&mut self, event: &WinitWindowEvent, scale_factor: f64) {
        match event {
            WinitWindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(*position, scale_factor);
            }

            WinitWindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = convert_mouse_button(*button) {
                    self.button_changed(button, *state == ElementState::Pressed);
                }
            }

            WinitWindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    log::info!("Escape pressed, shutting down");
                    self.quit = true;
                }
            }

            // Releases are not delivered once focus is gone
            WinitWindowEvent::Focused(false) => self.release_all(),

            _ => {}
        }
    }

    /// Handle a raw device event
    ///
    /// Pointer motion is only used while click-through hides window
    /// events; otherwise `CursorMoved` is authoritative.
    pub fn handle_device_event(&mut self, event: &DeviceEvent, scale_factor: f64, passthrough: bool) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if passthrough {
                if let Some((x, y)) = self.cursor {
                    let scale = positive_scale(scale_factor);
                    self.cursor = Some((x + delta.0 / scale, y + delta.1 / scale));
                }
            }
        }
    }

    /// Replace the cursor with a position read from the platform
    pub fn set_cursor(&mut self, logical: (f64, f64)) {
        self.cursor = Some(logical);
    }

    /// Replace the cursor with a global physical position
    ///
    /// `inner_origin` is the window's client-area origin in physical
    /// screen pixels.
    pub fn set_global_cursor(&mut self, global: (i32, i32), inner_origin: (i32, i32), scale_factor: f64) {
        self.set_cursor(pointer::to_window_local(global, inner_origin, scale_factor));
    }

    /// Current cursor, rounded down to whole logical pixels
    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
            .map(|(x, y)| (x.floor() as i32, y.floor() as i32))
            .unwrap_or(OFF_SCREEN_CURSOR)
    }

    /// Input for one tick; clears the per-tick transitions
    pub fn take_input(&mut self) -> RawInput {
        let input = RawInput {
            cursor: self.cursor(),
            held: self.held,
            pressed: self.pressed,
            released: self.released,
            quit: self.quit,
        };
        self.pressed = ButtonSet::EMPTY;
        self.released = ButtonSet::EMPTY;
        input
    }

    fn cursor_moved(&mut self, position: PhysicalPosition<f64>, scale_factor: f64) {
        let logical = position.to_logical::<f64>(positive_scale(scale_factor));
        self.cursor = Some((logical.x, logical.y));
    }

    fn button_changed(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.held.insert(button);
            self.pressed.insert(button);
        } else {
            self.held.remove(button);
            self.released.insert(button);
        }
    }

    fn release_all(&mut self) {
        for button in self.held.iter() {
            self.released.insert(button);
        }
        self.held = ButtonSet::EMPTY;
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn positive_scale(scale_factor: f64) -> f64 {
    if scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    }
}

/// Convert winit mouse button to an overlay mouse button
fn convert_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        WinitMouseButton::Back => Some(MouseButton::Back),
        WinitMouseButton::Forward => Some(MouseButton::Forward),
        WinitMouseButton::Other(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_handler_creation() {
        let mut handler = EventHandler::new();
        let input = handler.take_input();
        assert_eq!(input.cursor, OFF_SCREEN_CURSOR);
        assert!(input.held.is_empty());
        assert!(!input.quit);
    }

    #[test]
    fn test_mouse_button_conversion() {
        assert_eq!(convert_mouse_button(WinitMouseButton::Left), Some(MouseButton::Left));
        assert_eq!(convert_mouse_button(WinitMouseButton::Right), Some(MouseButton::Right));
        assert_eq!(convert_mouse_button(WinitMouseButton::Middle), Some(MouseButton::Middle));
        assert_eq!(convert_mouse_button(WinitMouseButton::Back), Some(MouseButton::Back));
        assert_eq!(convert_mouse_button(WinitMouseButton::Forward), Some(MouseButton::Forward));
        assert_eq!(convert_mouse_button(WinitMouseButton::Other(7)), None);
    }

    #[test]
    fn test_cursor_is_logical() {
        let mut handler = EventHandler::new();
        handler.cursor_moved(PhysicalPosition::new(201.0, 99.0), 2.0);
        assert_eq!(handler.cursor(), (100, 49));
    }

    #[test]
    fn test_transitions_cleared_per_tick() {
        let mut handler = EventHandler::new();
        handler.button_changed(MouseButton::Left, true);

        let input = handler.take_input();
        assert!(input.pressed.contains(MouseButton::Left));
        assert!(input.held.contains(MouseButton::Left));

        let input = handler.take_input();
        assert!(input.pressed.is_empty());
        assert!(input.held.contains(MouseButton::Left));

        handler.button_changed(MouseButton::Left, false);
        let input = handler.take_input();
        assert!(input.released.contains(MouseButton::Left));
        assert!(input.held.is_empty());
    }

    #[test]
    fn test_focus_loss_releases_buttons() {
        let mut handler = EventHandler::new();
        handler.button_changed(MouseButton::Left, true);
        handler.button_changed(MouseButton::Right, true);
        handler.take_input();

        handler.handle_window_event(&WinitWindowEvent::Focused(false), 1.0);
        let input = handler.take_input();
        assert!(input.held.is_empty());
        assert!(input.released.contains(MouseButton::Left));
        assert!(input.released.contains(MouseButton::Right));
    }

    #[test]
    fn test_motion_only_applies_in_passthrough() {
        let mut handler = EventHandler::new();
        let motion = DeviceEvent::MouseMotion { delta: (10.0, -4.0) };

        // Unknown cursor cannot be dead-reckoned
        handler.handle_device_event(&motion, 1.0, true);
        assert_eq!(handler.cursor(), OFF_SCREEN_CURSOR);

        handler.set_cursor((50.0, 50.0));
        handler.handle_device_event(&motion, 1.0, false);
        assert_eq!(handler.cursor(), (50, 50));

        handler.handle_device_event(&motion, 2.0, true);
        assert_eq!(handler.cursor(), (55, 48));
    }

    #[test]
    fn test_global_cursor_seeds_unknown_cursor() {
        let mut handler = EventHandler::new();
        handler.set_global_cursor((1300, 700), (1000, 500), 2.0);
        assert_eq!(handler.take_input().cursor, (150, 100));

        // Dead reckoning continues from the seeded position
        handler.handle_device_event(&DeviceEvent::MouseMotion { delta: (4.0, 0.0) }, 2.0, true);
        assert_eq!(handler.cursor(), (152, 100));
    }
}
