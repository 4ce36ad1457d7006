//! Debug panel with a single counting button

use crate::overlay::input::{FrameInput, MouseButton};
use crate::renderer::Color;
use crate::text::{TextStyle, Typeface};
use tiny_skia::{Paint, Pixmap, Rect, Transform};

/// Axis-aligned rectangle, half-open on the right and bottom edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: (i32, i32),
    pub max: (i32, i32),
}

impl Bounds {
    /// Contains no point
    pub const EMPTY: Self = Self {
        min: (0, 0),
        max: (0, 0),
    };

    pub const fn new(min: (i32, i32), max: (i32, i32)) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, point: (i32, i32)) -> bool {
        point.0 >= self.min.0 && point.0 < self.max.0 && point.1 >= self.min.1 && point.1 < self.max.1
    }

    pub fn width(&self) -> i32 {
        self.max.0 - self.min.0
    }

    pub fn height(&self) -> i32 {
        self.max.1 - self.min.1
    }

    fn to_rect(self) -> Option<Rect> {
        Rect::from_xywh(
            self.min.0 as f32,
            self.min.1 as f32,
            self.width() as f32,
            self.height() as f32,
        )
    }
}

const PANEL_BOUNDS: Bounds = Bounds::new((250, 100), (350, 150));
const TITLE_HEIGHT: i32 = 16;
const BUTTON_MARGIN: i32 = 6;
const LABEL_STYLE: TextStyle = TextStyle::new(12.0);

const PANEL_FILL: Color = Color { r: 0.12, g: 0.12, b: 0.14, a: 0.85 };
const TITLE_FILL: Color = Color { r: 0.22, g: 0.22, b: 0.26, a: 0.95 };
const BUTTON_FILL: Color = Color { r: 0.32, g: 0.32, b: 0.38, a: 1.0 };
const BUTTON_ARMED_FILL: Color = Color { r: 0.45, g: 0.45, b: 0.52, a: 1.0 };

/// Immediate-mode debug panel
///
/// Placement happens once, on first use, and never changes afterwards.
#[derive(Debug, Default)]
pub struct DebugPanel {
    bounds: Option<Bounds>,
    armed: bool,
    count: u32,
}

impl DebugPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the panel if it has not been placed yet
    pub fn ensure_placed(&mut self) -> Bounds {
        *self.bounds.get_or_insert_with(|| {
            log::debug!("Debug panel placed at {:?}", PANEL_BOUNDS);
            PANEL_BOUNDS
        })
    }

    /// Panel rectangle, empty until placed
    pub fn bounds(&self) -> Bounds {
        self.bounds.unwrap_or(Bounds::EMPTY)
    }

    /// Button rectangle inside the panel
    pub fn button_bounds(&self) -> Bounds {
        let panel = self.bounds();
        if panel == Bounds::EMPTY {
            return Bounds::EMPTY;
        }
        Bounds::new(
            (panel.min.0 + BUTTON_MARGIN, panel.min.1 + TITLE_HEIGHT + BUTTON_MARGIN / 2),
            (panel.max.0 - BUTTON_MARGIN, panel.max.1 - BUTTON_MARGIN / 2),
        )
    }

    /// Completed button activations
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Advance button state
    ///
    /// An activation needs both the press and the release inside the
    /// button. Movement alone never changes the count.
    pub fn update(&mut self, input: &FrameInput) {
        self.ensure_placed();
        let button = self.button_bounds();

        if input.is_pressed(MouseButton::Left) {
            self.armed = button.contains(input.cursor);
        }

        if input.is_released(MouseButton::Left) {
            if self.armed && button.contains(input.cursor) {
                self.count += 1;
                log::debug!("Debug button activated ({} total)", self.count);
            }
            self.armed = false;
        }
    }

    pub fn draw(&self, screen: &mut Pixmap, face: &dyn Typeface) {
        let Some(panel) = self.bounds else {
            return;
        };

        fill(screen, panel, PANEL_FILL);
        let title = Bounds::new(panel.min, (panel.max.0, panel.min.1 + TITLE_HEIGHT));
        fill(screen, title, TITLE_FILL);
        face.draw(
            screen,
            "Test",
            &LABEL_STYLE,
            (title.min.0 as f32 + 4.0, title.min.1 as f32 + 1.0),
            Color::WHITE,
        );

        let button = self.button_bounds();
        fill(screen, button, if self.armed { BUTTON_ARMED_FILL } else { BUTTON_FILL });

        let (text_width, text_height) = face.measure("Button", &LABEL_STYLE);
        face.draw(
            screen,
            "Button",
            &LABEL_STYLE,
            (
                button.min.0 as f32 + (button.width() as f32 - text_width) / 2.0,
                button.min.1 as f32 + (button.height() as f32 - text_height) / 2.0,
            ),
            Color::WHITE,
        );
    }
}

fn fill(screen: &mut Pixmap, bounds: Bounds, color: Color) {
    let Some(rect) = bounds.to_rect() else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    screen.fill_rect(rect, &paint, Transform::identity(), None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::input::ButtonSet;
    use crate::text::testing::BlockTypeface;

    fn frame(cursor: (i32, i32), pressed: bool, released: bool) -> FrameInput {
        let mut just_pressed = ButtonSet::EMPTY;
        let mut just_released = ButtonSet::EMPTY;
        if pressed {
            just_pressed.insert(MouseButton::Left);
        }
        if released {
            just_released.insert(MouseButton::Left);
        }
        FrameInput {
            cursor,
            moved: false,
            held: ButtonSet::EMPTY,
            just_pressed,
            just_released,
        }
    }

    #[test]
    fn test_bounds_half_open() {
        let bounds = Bounds::new((250, 100), (350, 150));
        assert!(bounds.contains((250, 100)));
        assert!(bounds.contains((349, 149)));
        assert!(!bounds.contains((350, 120)));
        assert!(!bounds.contains((300, 150)));
        assert!(!Bounds::EMPTY.contains((0, 0)));
    }

    #[test]
    fn test_lazy_placement() {
        let mut panel = DebugPanel::new();
        assert_eq!(panel.bounds(), Bounds::EMPTY);
        assert_eq!(panel.ensure_placed(), PANEL_BOUNDS);
        assert_eq!(panel.bounds(), PANEL_BOUNDS);
        assert!(PANEL_BOUNDS.contains(panel.button_bounds().min));
    }

    #[test]
    fn test_activation_counts_once() {
        let mut panel = DebugPanel::new();
        panel.ensure_placed();
        let inside = panel.button_bounds().min;

        panel.update(&frame(inside, true, false));
        assert_eq!(panel.count(), 0);
        panel.update(&frame(inside, false, false));
        panel.update(&frame(inside, false, true));
        assert_eq!(panel.count(), 1);

        // Release without a fresh press does nothing
        panel.update(&frame(inside, false, true));
        assert_eq!(panel.count(), 1);
    }

    #[test]
    fn test_release_outside_cancels() {
        let mut panel = DebugPanel::new();
        panel.ensure_placed();
        let inside = panel.button_bounds().min;

        panel.update(&frame(inside, true, false));
        panel.update(&frame((10, 10), false, true));
        assert_eq!(panel.count(), 0);

        // Press outside, release inside
        panel.update(&frame((10, 10), true, false));
        panel.update(&frame(inside, false, true));
        assert_eq!(panel.count(), 0);
    }

    #[test]
    fn test_movement_never_counts() {
        let mut panel = DebugPanel::new();
        let button = {
            panel.ensure_placed();
            panel.button_bounds()
        };
        for x in button.min.0..button.max.0 {
            let mut input = frame((x, button.min.1), false, false);
            input.moved = true;
            panel.update(&input);
        }
        assert_eq!(panel.count(), 0);
    }

    #[test]
    fn test_draw_fills_panel() {
        let mut panel = DebugPanel::new();
        let mut screen = Pixmap::new(400, 180).unwrap();
        panel.draw(&mut screen, &BlockTypeface);
        assert!(screen.data().iter().all(|&b| b == 0));

        panel.ensure_placed();
        panel.draw(&mut screen, &BlockTypeface);
        let idx = ((149 * 400 + 251) * 4 + 3) as usize;
        assert!(screen.data()[idx] > 0);
    }
}
