//! Renderer module for screen-rule
//!
//! The overlay composites each frame on the CPU into a tiny-skia pixmap.
//! This module presents that pixmap through wgpu onto a transparent
//! window surface and tracks frame timing.

use crate::utils::error::{OverlayError, Result};

// Export submodules
pub mod frame;
pub mod pipeline;
pub mod texture;
pub mod wgpu_renderer;

// Re-export main types
pub use frame::FrameClock;
pub use wgpu_renderer::WgpuRenderer;

/// Renderer trait defining the interface for frame presentation
pub trait Renderer {
    /// Upload a composited frame and present it
    ///
    /// # Arguments
    ///
    /// * `frame` - Premultiplied RGBA frame at the logical canvas size
    fn present(&mut self, frame: &tiny_skia::Pixmap) -> Result<()>;

    /// Handle window resize
    ///
    /// # Arguments
    ///
    /// * `width` - New surface width in physical pixels
    /// * `height` - New surface height in physical pixels
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;
}

/// Color representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create color from RGBA values (0-255)
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create color from hex string
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim_start_matches('#');

        if (hex.len() != 6 && hex.len() != 8) || !hex.is_ascii() {
            return Err(OverlayError::InvalidInput(
                "Hex color must be 6 or 8 characters".to_string(),
            ));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| OverlayError::InvalidInput("Invalid hex color".to_string()))
        };

        let r = channel(0..2)?;
        let g = channel(2..4)?;
        let b = channel(4..6)?;
        let a = if hex.len() == 8 { channel(6..8)? } else { 255 };

        Ok(Self::from_rgba(r, g, b, a))
    }

    /// Premultiplied 8-bit channels scaled by `coverage`
    pub fn premultiplied_u8(&self, coverage: f32) -> [u8; 4] {
        let a = (self.a * coverage).clamp(0.0, 1.0);
        let channel = |c: f32| (c.clamp(0.0, 1.0) * a * 255.0 + 0.5) as u8;
        [channel(self.r), channel(self.g), channel(self.b), (a * 255.0 + 0.5) as u8]
    }

    /// Convert to a tiny-skia colour
    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
        .unwrap_or(tiny_skia::Color::TRANSPARENT)
    }

    // Common colors
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const TRANSPARENT: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };
}
