//! Off-screen canvas holding the styled text and border

use crate::renderer::Color;
use crate::text::{TextStyle, Typeface};
use crate::utils::config::StyleConfig;
use crate::utils::error::{OverlayError, Result};
use tiny_skia::{Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform};

/// Padding around text inside its temporary buffer
const TEXT_PADDING: f32 = 5.0;

/// One piece of text on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub style: TextStyle,
    pub position: (f32, f32),
}

/// Transparent canvas rebuilt whenever input changes
pub struct CanvasRenderer {
    /// Premultiplied RGBA pixels, read by the hit tester
    pixmap: Pixmap,

    labels: Vec<Label>,
    accent: Color,
    border_width: f32,
    border_inset: f32,

    /// Number of redraws so far
    redraws: u64,
}

impl CanvasRenderer {
    pub fn new(
        width: u32,
        height: u32,
        labels: Vec<Label>,
        accent: Color,
        border_width: f32,
        border_inset: f32,
    ) -> Result<Self> {
        Ok(Self {
            pixmap: allocate(width, height)?,
            labels,
            accent,
            border_width,
            border_inset,
            redraws: 0,
        })
    }

    /// Canvas for the configured style
    pub fn from_style(width: u32, height: u32, style: &StyleConfig) -> Result<Self> {
        let accent = Color::from_hex(&style.accent)?;
        let labels = style
            .labels
            .iter()
            .map(|label| Label {
                text: label.text.clone(),
                style: TextStyle::new(label.size)
                    .with_weight(style.weight)
                    .with_width(style.width),
                position: (label.x, label.y),
            })
            .collect();

        Self::new(width, height, labels, accent, style.border_width, style.border_inset)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    /// Clear and draw labels and border
    pub fn redraw(&mut self, face: &dyn Typeface) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);

        for label in &self.labels {
            draw_text(&mut self.pixmap, face, label, self.accent);
        }

        self.stroke_border();
        self.redraws += 1;
    }

    fn stroke_border(&mut self) {
        if self.border_width <= 0.0 {
            return;
        }

        let inset = self.border_inset;
        let rect = Rect::from_xywh(
            inset,
            inset,
            self.pixmap.width() as f32 - 2.0 * inset,
            self.pixmap.height() as f32 - 2.0 * inset,
        );
        let Some(rect) = rect else {
            return;
        };

        let path = PathBuilder::from_rect(rect);
        let mut paint = Paint::default();
        paint.set_color(self.accent.to_skia());
        paint.anti_alias = true;

        let stroke = Stroke {
            width: self.border_width,
            ..Default::default()
        };

        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

fn allocate(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width, height).ok_or_else(|| {
        OverlayError::InvalidInput(format!("Cannot allocate a {}x{} canvas", width, height))
    })
}

/// Rasterise `label` into a padded scratch buffer, then composite it
fn draw_text(target: &mut Pixmap, face: &dyn Typeface, label: &Label, color: Color) {
    let (width, height) = face.measure(&label.text, &label.style);
    let scratch_width = (width.ceil() + 2.0 * TEXT_PADDING) as u32;
    let scratch_height = (height.ceil() + 2.0 * TEXT_PADDING) as u32;

    let Some(mut scratch) = Pixmap::new(scratch_width, scratch_height) else {
        log::warn!("Skipping label {:?}: cannot allocate text buffer", label.text);
        return;
    };

    face.draw(
        &mut scratch,
        &label.text,
        &label.style,
        (TEXT_PADDING, TEXT_PADDING),
        color,
    );

    target.draw_pixmap(
        label.position.0.round() as i32,
        label.position.1.round() as i32,
        scratch.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::testing::BlockTypeface;

    fn alpha(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.data()[((y * pixmap.width() + x) * 4 + 3) as usize]
    }

    fn canvas() -> CanvasRenderer {
        CanvasRenderer::from_style(400, 180, &StyleConfig::default()).unwrap()
    }

    #[test]
    fn test_starts_blank() {
        let canvas = canvas();
        assert_eq!(canvas.redraw_count(), 0);
        assert!(canvas.pixmap().data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_redraw_draws_labels_with_padding() {
        let mut canvas = canvas();
        canvas.redraw(&BlockTypeface);
        assert_eq!(canvas.redraw_count(), 1);

        // "测试" at (90, 80) size 56, glyphs start 5 px inside the scratch buffer
        assert_eq!(alpha(canvas.pixmap(), 95, 85), 255);
        assert_eq!(alpha(canvas.pixmap(), 100, 100), 255);
        assert_eq!(alpha(canvas.pixmap(), 92, 100), 0);

        // Background between labels stays transparent
        assert_eq!(alpha(canvas.pixmap(), 200, 150), 0);
    }

    #[test]
    fn test_border_is_stroked() {
        let mut canvas = canvas();
        canvas.redraw(&BlockTypeface);

        // Stroke is centred on the inset rectangle edge at x = 2
        assert!(alpha(canvas.pixmap(), 2, 90) > 0);
        assert!(alpha(canvas.pixmap(), 397, 90) > 0);
        assert!(alpha(canvas.pixmap(), 200, 2) > 0);
        assert_eq!(alpha(canvas.pixmap(), 10, 90), 0);
    }

    #[test]
    fn test_accent_colour() {
        let mut canvas = canvas();
        canvas.redraw(&BlockTypeface);
        let idx = ((100 * 400 + 100) * 4) as usize;
        assert_eq!(&canvas.pixmap().data()[idx..idx + 4], &[0xff, 0xaa, 0x11, 0xff]);
    }

    #[test]
    fn test_rejects_bad_accent() {
        let style = StyleConfig {
            accent: "nope".to_string(),
            ..Default::default()
        };
        assert!(CanvasRenderer::from_style(400, 180, &style).is_err());
    }
}
