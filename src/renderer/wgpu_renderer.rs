//! WGPU-based presentation of the composited overlay frame
//!
//! The surface is configured with a non-opaque composite alpha mode when
//! the platform offers one, so transparent canvas pixels show whatever is
//! beneath the window.

use crate::renderer::Renderer;
use crate::utils::error::{IntoOverlayError, OverlayError, Result};
use std::sync::Arc;
use winit::window::Window as WinitWindow;

use super::pipeline::OverlayPipeline;
use super::texture::CanvasTexture;

/// WGPU renderer implementation
pub struct WgpuRenderer {
    /// Window the surface belongs to
    window: Arc<WinitWindow>,

    /// WGPU device
    device: wgpu::Device,

    /// WGPU queue for submitting commands
    queue: wgpu::Queue,

    /// Render surface
    surface: wgpu::Surface<'static>,

    /// Surface configuration
    surface_config: wgpu::SurfaceConfiguration,

    /// Render pipeline
    pipeline: OverlayPipeline,

    /// Texture holding the uploaded frame
    canvas: CanvasTexture,

    /// Bind group for the current canvas texture
    bind_group: wgpu::BindGroup,
}

impl WgpuRenderer {
    /// Create a renderer for `window`
    ///
    /// `canvas_size` is the logical frame size uploaded every tick.
    pub fn new(window: Arc<WinitWindow>, canvas_size: (u32, u32), vsync: bool) -> Result<Self> {
        pollster::block_on(Self::init_wgpu(window, canvas_size, vsync))
    }

    /// Initialize wgpu instance, device, queue, and surface
    async fn init_wgpu(
        window: Arc<WinitWindow>,
        canvas_size: (u32, u32),
        vsync: bool,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .renderer_err("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .renderer_err("Failed to find suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("Using GPU adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Overlay GPU Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await
            .renderer_err("Failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| OverlayError::Renderer("Surface reports no formats".to_string()))?;

        let alpha_mode = choose_alpha_mode(&surface_caps.alpha_modes);
        if alpha_mode == wgpu::CompositeAlphaMode::Opaque {
            log::warn!("Surface does not support transparency; background will be opaque");
        }

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        log::debug!(
            "Surface configured: {:?} {}x{} alpha={:?}",
            surface_format,
            surface_config.width,
            surface_config.height,
            alpha_mode
        );

        let pipeline = OverlayPipeline::new(&device, surface_format, alpha_mode);
        let canvas = CanvasTexture::new(&device, canvas_size.0, canvas_size.1, surface_format.is_srgb());
        let bind_group = pipeline.create_bind_group(&device, &canvas);

        Ok(Self {
            window,
            device,
            queue,
            surface,
            surface_config,
            pipeline,
            canvas,
            bind_group,
        })
    }

    /// Reconfigure the surface (e.g., after resize or lost surface)
    fn reconfigure_surface(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
    }
}

impl Renderer for WgpuRenderer {
    fn present(&mut self, frame: &tiny_skia::Pixmap) -> Result<()> {
        if self.canvas.ensure_size(&self.device, frame.width(), frame.height()) {
            self.bind_group = self.pipeline.create_bind_group(&self.device, &self.canvas);
        }
        self.canvas.upload(&self.queue, frame)?;

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                self.reconfigure_surface();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(OverlayError::Renderer("Out of GPU memory".to_string()));
            }
            Err(e) => {
                log::warn!("Surface texture acquisition failed: {:?}", e);
                return Ok(());
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Overlay Encoder"),
        });
        self.pipeline.render(&mut encoder, &view, &self.bind_group);
        self.queue.submit(std::iter::once(encoder.finish()));

        self.window.pre_present_notify();
        surface_texture.present();

        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.reconfigure_surface();

        Ok(())
    }
}

/// Pick a composite alpha mode that keeps transparent pixels transparent
fn choose_alpha_mode(supported: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    [
        wgpu::CompositeAlphaMode::PreMultiplied,
        wgpu::CompositeAlphaMode::PostMultiplied,
        wgpu::CompositeAlphaMode::Inherit,
    ]
    .into_iter()
    .find(|mode| supported.contains(mode))
    .or_else(|| supported.first().copied())
    .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::CompositeAlphaMode as Mode;

    #[test]
    fn test_prefers_premultiplied() {
        assert_eq!(
            choose_alpha_mode(&[Mode::Opaque, Mode::PostMultiplied, Mode::PreMultiplied]),
            Mode::PreMultiplied
        );
        assert_eq!(
            choose_alpha_mode(&[Mode::Opaque, Mode::PostMultiplied]),
            Mode::PostMultiplied
        );
    }

    #[test]
    fn test_falls_back_to_first_mode() {
        assert_eq!(choose_alpha_mode(&[Mode::Opaque]), Mode::Opaque);
        assert_eq!(choose_alpha_mode(&[]), Mode::Auto);
    }
}
