//! Variable font face backed by ab_glyph
//!
//! The font bytes are parsed and validated once. Each draw builds a cheap
//! borrowed face view and applies the `wght`/`wdth` variation axes for
//! that call only, so the shared face itself never changes.

use crate::renderer::Color;
use crate::text::{blend_pixel, TextStyle, Typeface};
use crate::utils::error::{IntoOverlayError, OverlayError, Result};
use ab_glyph::{point, Font, FontRef, PxScale, ScaleFont, VariableFont};
use std::borrow::Cow;
use std::path::Path;
use tiny_skia::Pixmap;

#[cfg(feature = "embedded-font")]
static EMBEDDED_FONT: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/fonts/SourceHanSansSC-VF.ttf"
));

const AXIS_WEIGHT: [u8; 4] = *b"wght";
const AXIS_WIDTH: [u8; 4] = *b"wdth";

/// A parsed font, shared read-only across all text draws
pub struct FontFace {
    /// Raw font file contents
    data: Cow<'static, [u8]>,

    /// Variation axes the font declares
    axes: Vec<[u8; 4]>,
}

impl FontFace {
    /// Parse a font from memory
    pub fn from_bytes(data: impl Into<Cow<'static, [u8]>>) -> Result<Self> {
        let data = data.into();
        let axes: Vec<[u8; 4]> = {
            let face = FontRef::try_from_slice(data.as_ref()).font_err("Failed to parse font")?;
            face.variations().into_iter().map(|axis| axis.tag).collect()
        };

        log::info!(
            "Loaded font ({} bytes, variation axes: [{}])",
            data.len(),
            axes.iter()
                .map(|tag| String::from_utf8_lossy(tag).into_owned())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self { data, axes })
    }

    /// Read and parse a font file
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).font_err(&format!("Failed to read {}", path.display()))?;
        Self::from_bytes(bytes)
    }

    /// The face compiled into the binary
    #[cfg(feature = "embedded-font")]
    pub fn embedded() -> Result<Self> {
        Self::from_bytes(EMBEDDED_FONT)
    }

    /// Load from `path` when given, else the embedded face
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            #[cfg(feature = "embedded-font")]
            None => Self::embedded(),
            #[cfg(not(feature = "embedded-font"))]
            None => Err(OverlayError::Font(
                "No font configured: set [font] path, SCREEN_RULE_FONT or --font, \
                 or build with the embedded-font feature"
                    .to_string(),
            )),
        }
    }

    /// Whether the font declares the variation axis `tag`
    pub fn has_axis(&self, tag: &[u8; 4]) -> bool {
        self.axes.contains(tag)
    }

    /// Face view with the style's variations applied
    fn instance(&self, style: &TextStyle) -> Option<FontRef<'_>> {
        let mut face = match FontRef::try_from_slice(self.data.as_ref()) {
            Ok(face) => face,
            Err(e) => {
                log::warn!("Font became unreadable: {}", e);
                return None;
            }
        };

        if self.has_axis(&AXIS_WEIGHT) {
            face.set_variation(&AXIS_WEIGHT, style.weight);
        }
        if self.has_axis(&AXIS_WIDTH) {
            face.set_variation(&AXIS_WIDTH, style.width);
        }

        Some(face)
    }
}

/// Pixel scale for an em size
fn px_scale(face: &FontRef<'_>, size: f32) -> PxScale {
    match face.units_per_em() {
        Some(units) if units > 0.0 => PxScale::from(size * face.height_unscaled() / units),
        _ => PxScale::from(size),
    }
}

/// Advance width of one line including kerning
fn line_width<F: Font, SF: ScaleFont<F>>(scaled: &SF, line: &str) -> f32 {
    let mut width = 0.0;
    let mut prev = None;
    for ch in line.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev_id) = prev {
            width += scaled.kern(prev_id, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    width
}

impl Typeface for FontFace {
    fn measure(&self, content: &str, style: &TextStyle) -> (f32, f32) {
        let Some(face) = self.instance(style) else {
            return (0.0, 0.0);
        };
        let scaled = face.as_scaled(px_scale(&face, style.size));

        let mut width: f32 = 0.0;
        let mut lines = 0;
        for line in content.split('\n') {
            width = width.max(line_width(&scaled, line));
            lines += 1;
        }

        let line_advance = scaled.height() + scaled.line_gap();
        let height = scaled.height() + (lines - 1) as f32 * line_advance;
        (width, height)
    }

    fn draw(
        &self,
        target: &mut Pixmap,
        content: &str,
        style: &TextStyle,
        origin: (f32, f32),
        color: Color,
    ) {
        let Some(face) = self.instance(style) else {
            return;
        };
        let scaled = face.as_scaled(px_scale(&face, style.size));
        let line_advance = scaled.height() + scaled.line_gap();

        for (row, line) in content.split('\n').enumerate() {
            let baseline = origin.1 + scaled.ascent() + row as f32 * line_advance;
            let mut caret = origin.0;
            let mut prev = None;

            for ch in line.chars() {
                let mut glyph = scaled.scaled_glyph(ch);
                if let Some(prev_id) = prev {
                    caret += scaled.kern(prev_id, glyph.id);
                }
                glyph.position = point(caret, baseline);
                caret += scaled.h_advance(glyph.id);
                prev = Some(glyph.id);

                if let Some(outlined) = scaled.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    outlined.draw(|x, y, coverage| {
                        blend_pixel(
                            target,
                            bounds.min.x as i32 + x as i32,
                            bounds.min.y as i32 + y as i32,
                            color,
                            coverage,
                        );
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Variable COLRv1 test font with 44 custom axes and no `wght`/`wdth`
    static VARIABLE_FIXTURE: &[u8] = include_bytes!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/colr_1_variable.ttf"
    ));

    #[test]
    fn test_reads_variation_axes() {
        let face = FontFace::from_bytes(VARIABLE_FIXTURE).unwrap();
        assert_eq!(face.axes.len(), 44);
        assert!(face.has_axis(b"ROTA"));
        assert!(face.has_axis(b"APH3"));
        assert!(!face.has_axis(&AXIS_WEIGHT));
        assert!(!face.has_axis(&AXIS_WIDTH));
    }

    #[test]
    fn test_missing_axes_are_skipped() {
        let face = FontFace::from_bytes(VARIABLE_FIXTURE).unwrap();
        let style = TextStyle {
            size: 24.0,
            weight: 800.0,
            width: 100.0,
        };
        assert!(face.instance(&style).is_some());

        let (_, height) = face.measure("", &style);
        assert!(height > 0.0);
    }

    #[test]
    fn test_rejects_invalid_font_data() {
        let result = FontFace::from_bytes(&b"definitely not a font"[..]);
        assert!(matches!(result, Err(OverlayError::Font(_))));
    }

    #[test]
    fn test_rejects_empty_font_data() {
        let result = FontFace::from_bytes(Vec::new());
        assert!(matches!(result, Err(OverlayError::Font(_))));
    }

    #[test]
    fn test_missing_font_file() {
        let result = FontFace::from_file(Path::new("/nonexistent/screen-rule/face.ttf"));
        match result {
            Err(OverlayError::Font(msg)) => assert!(msg.contains("face.ttf")),
            _ => panic!("Expected Font error"),
        }
    }

    #[cfg(not(feature = "embedded-font"))]
    #[test]
    fn test_no_font_configured() {
        assert!(matches!(FontFace::load(None), Err(OverlayError::Font(_))));
    }
}
