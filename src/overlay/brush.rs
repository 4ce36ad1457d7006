//! Cursor-following brush sprite

use crate::utils::error::{OverlayError, Result};
use tiny_skia::{Pixmap, PixmapPaint, Transform};

const ALPHA: [u8; 16] = [
    0x40, 0xc0, 0xc0, 0x40, //
    0xc0, 0xff, 0xff, 0xc0, //
    0xc0, 0xff, 0xff, 0xc0, //
    0x40, 0xc0, 0xc0, 0x40, //
];

/// Per-channel colour scale applied to the alpha gradient
const COLOR_SCALE: [f32; 4] = [1.0, 0.5, 0.125, 1.0];

/// Brush placement relative to the cursor
const OFFSET: (i32, i32) = (-2, -4);

/// 4x4 orange gradient drawn under the cursor
pub struct BrushSprite {
    pixmap: Pixmap,
}

impl BrushSprite {
    pub fn new() -> Result<Self> {
        let mut pixmap = Pixmap::new(4, 4)
            .ok_or_else(|| OverlayError::InvalidInput("Cannot allocate brush".to_string()))?;

        // White source scaled by COLOR_SCALE, stored premultiplied
        for (pixel, &alpha) in pixmap.data_mut().chunks_exact_mut(4).zip(ALPHA.iter()) {
            for (channel, scale) in pixel.iter_mut().zip(COLOR_SCALE) {
                *channel = (alpha as f32 * scale).round() as u8;
            }
        }

        Ok(Self { pixmap })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn draw(&self, screen: &mut Pixmap, cursor: (i32, i32)) {
        screen.draw_pixmap(
            cursor.0 + OFFSET.0,
            cursor.1 + OFFSET.1,
            self.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient() {
        let brush = BrushSprite::new().unwrap();
        let data = brush.pixmap().data();
        assert_eq!(&data[0..4], &[0x40, 0x20, 0x08, 0x40]);
        // Second row, second column
        assert_eq!(&data[20..24], &[0xff, 0x80, 0x20, 0xff]);
    }

    #[test]
    fn test_draw_offset() {
        let brush = BrushSprite::new().unwrap();
        let mut screen = Pixmap::new(10, 10).unwrap();
        brush.draw(&mut screen, (5, 5));

        let alpha = |x: usize, y: usize| screen.data()[(y * 10 + x) * 4 + 3];
        assert_eq!(alpha(3, 1), 0x40);
        assert_eq!(alpha(4, 2), 0xff);
        assert_eq!(alpha(2, 1), 0);
        assert_eq!(alpha(7, 5), 0);
    }
}
