//! Overlay controller
//!
//! Each tick the window layer calls [`Scene::update`] and then
//! [`Scene::draw`]. Update samples input and, when anything changed,
//! rebuilds the canvas and hit tests it before switching click-through,
//! so passthrough is never decided against stale pixels. Dragging and the
//! debug panel run every tick, and click-through stays off while a drag
//! is active.

pub mod brush;
pub mod canvas;
pub mod hud;
pub mod input;
pub mod panel;

pub use brush::BrushSprite;
pub use canvas::CanvasRenderer;
pub use hit_test::HitTester;
pub use input::{FrameInput, InputSampler, MouseButton, RawInput};
pub use panel::{Bounds, DebugPanel};

use crate::renderer::Color;
use crate::text::Typeface;
use crate::utils::config::Config;
use crate::utils::error::Result;
use crate::window::{scale_ratio, WindowDragger, WindowHost};
use tiny_skia::{Pixmap, PixmapPaint, Transform};

/// Whether the event loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Per-frame facts owned by the window layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Measured ticks per second
    pub tps: f64,

    /// Current click-through state
    pub passthrough: bool,
}

/// Frame-driven application logic
pub trait Scene {
    /// Advance state for one tick
    fn update(&mut self, input: &RawInput, host: &mut dyn WindowHost) -> Result<Flow>;

    /// Render the frame into `screen`
    fn draw(&mut self, screen: &mut Pixmap, info: &FrameInfo);

    /// Logical screen size for an outside (physical) window size
    fn layout(&mut self, outside_width: u32, outside_height: u32) -> (u32, u32);
}

/// Read-only resources shared by the overlay
pub struct OverlayContext {
    pub face: Box<dyn Typeface>,
    pub brush: BrushSprite,

    /// Monitor size in logical pixels
    pub monitor_size: (u32, u32),
}

impl OverlayContext {
    pub fn new(face: Box<dyn Typeface>, monitor_size: (u32, u32)) -> Result<Self> {
        Ok(Self {
            face,
            brush: BrushSprite::new()?,
            monitor_size,
        })
    }
}

/// The overlay: canvas, hit testing, click-through, drag and debug panel
pub struct Overlay {
    context: OverlayContext,
    sampler: InputSampler,
    canvas: CanvasRenderer,
    hit_tester: HitTester,
    dragger: WindowDragger,
    panel: Option<DebugPanel>,

    /// Cursor from the latest tick
    cursor: (i32, i32),

    /// Logical screen size
    screen_size: (u32, u32),
}

impl Overlay {
    pub fn new(context: OverlayContext, config: &Config) -> Result<Self> {
        let screen_size = (config.window.width, config.window.height);
        let canvas = CanvasRenderer::from_style(screen_size.0, screen_size.1, &config.style)?;

        Ok(Self {
            context,
            sampler: InputSampler::new(),
            canvas,
            hit_tester: HitTester::new(),
            dragger: WindowDragger::new(),
            panel: config.general.debug_panel.then(DebugPanel::new),
            cursor: (-1, -1),
            screen_size,
        })
    }

    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    pub fn canvas(&self) -> &CanvasRenderer {
        &self.canvas
    }

    pub fn is_dragging(&self) -> bool {
        self.dragger.is_dragging()
    }

    /// Debug panel activations, if the panel is enabled
    pub fn panel_count(&self) -> Option<u32> {
        self.panel.as_ref().map(DebugPanel::count)
    }

    fn panel_bounds(&self) -> Bounds {
        self.panel.as_ref().map(DebugPanel::bounds).unwrap_or(Bounds::EMPTY)
    }
}

/// Set click-through, skipping the platform call when nothing changes
pub fn apply_passthrough(host: &mut dyn WindowHost, enabled: bool) {
    if host.mouse_passthrough() == enabled {
        return;
    }
    log::debug!("Mouse passthrough {}", if enabled { "on" } else { "off" });
    host.set_mouse_passthrough(enabled);
}

impl Scene for Overlay {
    fn update(&mut self, input: &RawInput, host: &mut dyn WindowHost) -> Result<Flow> {
        if input.quit {
            return Ok(Flow::Exit);
        }

        if let Some(panel) = self.panel.as_mut() {
            panel.ensure_placed();
        }

        let frame = self.sampler.sample(input);
        self.cursor = frame.cursor;
        let panel_bounds = self.panel_bounds();

        let hit = frame.changed().then(|| {
            self.canvas.redraw(self.context.face.as_ref());
            self.hit_tester
                .test(self.canvas.pixmap(), frame.cursor, panel_bounds)
        });

        self.dragger
            .update(&frame, panel_bounds.contains(frame.cursor), host);

        // A drag owns the pointer until release, wherever the cursor lands
        if let Some(hit) = hit {
            apply_passthrough(host, !(hit || self.dragger.is_dragging()));
        }

        if let Some(panel) = self.panel.as_mut() {
            panel.update(&frame);
        }

        Ok(Flow::Continue)
    }

    fn draw(&mut self, screen: &mut Pixmap, info: &FrameInfo) {
        screen.fill(tiny_skia::Color::TRANSPARENT);
        screen.draw_pixmap(
            0,
            0,
            self.canvas.pixmap().as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        self.context.brush.draw(screen, self.cursor);

        let text = hud::diagnostic_text(
            self.context.monitor_size,
            self.cursor,
            info.tps,
            info.passthrough,
            self.panel_count(),
        );
        self.context
            .face
            .draw(screen, &text, &hud::HUD_STYLE, hud::HUD_ORIGIN, Color::WHITE);

        if let Some(panel) = &self.panel {
            panel.draw(screen, self.context.face.as_ref());
        }
    }

    fn layout(&mut self, outside_width: u32, outside_height: u32) -> (u32, u32) {
        self.dragger
            .set_scale(scale_ratio((outside_width, outside_height), self.screen_size));
        self.screen_size
    }
}
