//! Shared fixtures for integration tests
//!
//! - A block-glyph typeface so canvas pixels are predictable
//! - A mock window host that models the screen cursor, so moving the
//!   window shifts the window-local cursor the way a real desktop does

#![allow(dead_code)]

use screen_rule::overlay::input::ButtonSet;
use screen_rule::overlay::{Flow, MouseButton, Overlay, OverlayContext, RawInput, Scene};
use screen_rule::renderer::Color;
use screen_rule::text::{blend_pixel, TextStyle, Typeface};
use screen_rule::utils::Config;
use screen_rule::window::WindowHost;
use tiny_skia::Pixmap;

/// Draws every non-space character as a solid `size/2 x size` block
pub struct BlockFace;

impl BlockFace {
    fn advance(style: &TextStyle) -> f32 {
        (style.size / 2.0).floor()
    }
}

impl Typeface for BlockFace {
    fn measure(&self, content: &str, style: &TextStyle) -> (f32, f32) {
        let lines: Vec<&str> = content.split('\n').collect();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        (widest as f32 * Self::advance(style), lines.len() as f32 * style.size)
    }

    fn draw(&self, target: &mut Pixmap, content: &str, style: &TextStyle, origin: (f32, f32), color: Color) {
        let advance = Self::advance(style) as i32;
        for (row, line) in content.split('\n').enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                let x0 = origin.0 as i32 + col as i32 * advance;
                let y0 = origin.1 as i32 + row as i32 * style.size as i32;
                for y in y0..y0 + style.size as i32 {
                    for x in x0..x0 + advance {
                        blend_pixel(target, x, y, color, 1.0);
                    }
                }
            }
        }
    }
}

/// Window host that records every platform call
#[derive(Debug)]
pub struct MockHost {
    pub position: (i32, i32),
    pub passthrough: bool,
    pub passthrough_calls: usize,
    pub moves: usize,
}

impl MockHost {
    pub fn new(position: (i32, i32), passthrough: bool) -> Self {
        Self {
            position,
            passthrough,
            passthrough_calls: 0,
            moves: 0,
        }
    }
}

impl WindowHost for MockHost {
    fn window_position(&self) -> (i32, i32) {
        self.position
    }

    fn set_window_position(&mut self, position: (i32, i32)) {
        self.position = position;
        self.moves += 1;
    }

    fn mouse_passthrough(&self) -> bool {
        self.passthrough
    }

    fn set_mouse_passthrough(&mut self, enabled: bool) {
        self.passthrough = enabled;
        self.passthrough_calls += 1;
    }
}

/// Overlay plus a simulated desktop
pub struct Harness {
    pub overlay: Overlay,
    pub host: MockHost,

    /// Cursor in screen pixels
    pub screen_cursor: (i32, i32),

    held: ButtonSet,
    pressed: ButtonSet,
    released: ButtonSet,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        let context = OverlayContext::new(Box::new(BlockFace), (1920, 1080)).unwrap();
        let overlay = Overlay::new(context, config).unwrap();
        let host = MockHost::new(
            (config.window.x, config.window.y),
            config.window.initial_passthrough,
        );
        Self {
            overlay,
            host,
            screen_cursor: (0, 0),
            held: ButtonSet::EMPTY,
            pressed: ButtonSet::EMPTY,
            released: ButtonSet::EMPTY,
        }
    }

    /// Window-local cursor for the current window position
    pub fn local_cursor(&self) -> (i32, i32) {
        (
            self.screen_cursor.0 - self.host.position.0,
            self.screen_cursor.1 - self.host.position.1,
        )
    }

    /// Run one update with the pending input
    pub fn tick(&mut self) -> Flow {
        let input = RawInput {
            cursor: self.local_cursor(),
            held: self.held,
            pressed: self.pressed,
            released: self.released,
            quit: false,
        };
        self.pressed = ButtonSet::EMPTY;
        self.released = ButtonSet::EMPTY;
        self.overlay.update(&input, &mut self.host).unwrap()
    }

    /// Put the cursor at a window-local position and tick
    pub fn hover_local(&mut self, local: (i32, i32)) {
        self.screen_cursor = (local.0 + self.host.position.0, local.1 + self.host.position.1);
        self.tick();
    }

    /// Move the screen cursor by `delta` and tick
    pub fn move_by(&mut self, delta: (i32, i32)) {
        self.screen_cursor = (self.screen_cursor.0 + delta.0, self.screen_cursor.1 + delta.1);
        self.tick();
    }

    pub fn press(&mut self, button: MouseButton) {
        self.held.insert(button);
        self.pressed.insert(button);
        self.tick();
    }

    pub fn release(&mut self, button: MouseButton) {
        self.held.remove(button);
        self.released.insert(button);
        self.tick();
    }
}
