//! screen-rule: a transparent, always-on-top overlay window
//!
//! The overlay draws styled text and a border onto an off-screen canvas,
//! switches mouse click-through per pixel of that canvas, follows the
//! cursor with a small brush and can be dragged with the primary button.

pub mod overlay;
pub mod renderer;
pub mod text;
pub mod utils;
pub mod window;
