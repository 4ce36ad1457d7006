//! Text rendering
//!
//! A [`Typeface`] measures and rasterises text into a tiny-skia pixmap.
//! [`FontFace`] is the production implementation backed by a variable
//! font parsed with ab_glyph.

use crate::renderer::Color;
use tiny_skia::Pixmap;

pub mod font_face;

pub use font_face::FontFace;

/// Value of the `wght` axis for an extra-bold face
pub const WEIGHT_EXTRA_BOLD: f32 = 800.0;

/// Value of the `wght` axis for a regular face
pub const WEIGHT_REGULAR: f32 = 400.0;

/// Value of the `wdth` axis for a normal width face
pub const WIDTH_NORMAL: f32 = 100.0;

/// Per-draw text parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Em size in pixels
    pub size: f32,

    /// `wght` variation axis
    pub weight: f32,

    /// `wdth` variation axis
    pub width: f32,
}

impl TextStyle {
    /// Regular weight and normal width at `size`
    pub const fn new(size: f32) -> Self {
        Self {
            size,
            weight: WEIGHT_REGULAR,
            width: WIDTH_NORMAL,
        }
    }

    /// Same style with a different weight
    pub const fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Same style with a different width
    pub const fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }
}

/// Something that can lay out and rasterise text
pub trait Typeface {
    /// Size of the laid-out text as (width, height)
    ///
    /// Lines are separated by `\n`; width is the widest line.
    fn measure(&self, content: &str, style: &TextStyle) -> (f32, f32);

    /// Draw `content` with the top-left of its first line box at `origin`
    fn draw(
        &self,
        target: &mut Pixmap,
        content: &str,
        style: &TextStyle,
        origin: (f32, f32),
        color: Color,
    );
}

/// Source-over blend of `color` at `coverage` into one pixel
///
/// Coordinates outside `target` are ignored.
pub fn blend_pixel(target: &mut Pixmap, x: i32, y: i32, color: Color, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= target.width() || y as u32 >= target.height() {
        return;
    }
    if coverage <= 0.0 {
        return;
    }

    let idx = (y as usize * target.width() as usize + x as usize) * 4;
    let src = color.premultiplied_u8(coverage);
    let inv = 255 - src[3] as u32;
    let data = target.data_mut();
    for (channel, s) in src.iter().enumerate() {
        let d = data[idx + channel] as u32;
        data[idx + channel] = (*s as u32 + (d * inv + 127) / 255).min(255) as u8;
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_builders() {
        let style = TextStyle::new(50.0)
            .with_weight(WEIGHT_EXTRA_BOLD)
            .with_width(WIDTH_NORMAL);
        assert_eq!(style.size, 50.0);
        assert_eq!(style.weight, 800.0);
        assert_eq!(style.width, 100.0);
    }

    #[test]
    fn test_blend_pixel_source_over() {
        let mut pixmap = Pixmap::new(2, 2).unwrap();
        blend_pixel(&mut pixmap, 1, 0, Color::WHITE, 0.5);
        assert_eq!(&pixmap.data()[4..8], &[128, 128, 128, 128]);

        blend_pixel(&mut pixmap, 1, 0, Color::WHITE, 1.0);
        assert_eq!(&pixmap.data()[4..8], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_blend_pixel_ignores_out_of_bounds() {
        let mut pixmap = Pixmap::new(2, 2).unwrap();
        blend_pixel(&mut pixmap, -1, 0, Color::WHITE, 1.0);
        blend_pixel(&mut pixmap, 0, 2, Color::WHITE, 1.0);
        assert!(pixmap.data().iter().all(|&b| b == 0));
    }
}
