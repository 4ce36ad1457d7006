//! Canvas texture management
//!
//! Holds the GPU texture the composited frame is uploaded into each tick.
//! The texture is recreated only when the frame size changes.

use crate::utils::error::{OverlayError, Result};

/// GPU copy of the composited overlay frame
pub struct CanvasTexture {
    /// Frame texture
    texture: wgpu::Texture,

    /// View bound to the pipeline
    view: wgpu::TextureView,

    /// Texture sampler
    sampler: wgpu::Sampler,

    /// Texel format; sRGB when the surface is sRGB
    format: wgpu::TextureFormat,

    /// Current texture dimensions
    dimensions: (u32, u32),
}

impl CanvasTexture {
    /// Create a texture for frames of the given size
    pub fn new(device: &wgpu::Device, width: u32, height: u32, srgb: bool) -> Self {
        let format = if srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };

        // Magnify without blurring so text edges stay crisp at integer scales
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Canvas Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let (texture, view) = Self::create_texture(device, width, height, format);

        Self {
            texture,
            view,
            sampler,
            format,
            dimensions: (width, height),
        }
    }

    /// Recreate the texture if the frame size changed
    ///
    /// Returns `true` when the texture was recreated and bind groups
    /// referencing the old view must be rebuilt.
    pub fn ensure_size(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        if self.dimensions == (width, height) {
            return false;
        }

        let (texture, view) = Self::create_texture(device, width, height, self.format);
        self.texture = texture;
        self.view = view;
        self.dimensions = (width, height);
        true
    }

    /// Upload a premultiplied RGBA frame
    pub fn upload(&self, queue: &wgpu::Queue, frame: &tiny_skia::Pixmap) -> Result<()> {
        let (width, height) = self.dimensions;
        if (frame.width(), frame.height()) != self.dimensions {
            return Err(OverlayError::Renderer(format!(
                "Frame is {}x{}, texture is {}x{}",
                frame.width(),
                frame.height(),
                width,
                height
            )));
        }

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            frame.data(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        Ok(())
    }

    /// Texture view for binding
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Sampler for binding
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    fn create_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Canvas Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }
}
