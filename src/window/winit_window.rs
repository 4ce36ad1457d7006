//! Winit window implementation for screen-rule
//!
//! This module creates the transparent overlay window, runs the event
//! loop at a fixed tick rate, and hands each tick to a [`Scene`].

use crate::overlay::{Flow, FrameInfo, Scene};
use crate::renderer::{FrameClock, Renderer, WgpuRenderer};
use crate::utils::config::WindowConfig;
use crate::utils::error::{IntoOverlayError, OverlayError, Result};
use crate::window::events::EventHandler;
use crate::window::pointer::PointerProbe;
use crate::window::WindowHost;
use std::sync::Arc;
use std::time::Instant;
use tiny_skia::Pixmap;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalPosition, LogicalSize, PhysicalPosition},
    event::{DeviceEvent, DeviceId, WindowEvent as WinitWindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, DeviceEvents, EventLoop},
    window::{Window as WinitWindow, WindowId, WindowLevel},
};

/// [`WindowHost`] backed by a winit window
pub struct WinitHost {
    window: Arc<WinitWindow>,

    /// Last known outer position, physical pixels
    position: (i32, i32),

    passthrough: bool,
}

impl WinitHost {
    fn new(window: Arc<WinitWindow>, passthrough: bool) -> Self {
        let position = window
            .outer_position()
            .map(|p| (p.x, p.y))
            .unwrap_or_else(|e| {
                log::warn!("Window position unavailable: {}", e);
                (0, 0)
            });

        let mut host = Self {
            window,
            position,
            passthrough: !passthrough,
        };
        host.set_mouse_passthrough(passthrough);
        host
    }

    fn moved(&mut self, position: PhysicalPosition<i32>) {
        self.position = (position.x, position.y);
    }
}

impl WindowHost for WinitHost {
    fn window_position(&self) -> (i32, i32) {
        self.position
    }

    fn set_window_position(&mut self, position: (i32, i32)) {
        self.window
            .set_outer_position(PhysicalPosition::new(position.0, position.1));
        self.position = position;
    }

    fn mouse_passthrough(&self) -> bool {
        self.passthrough
    }

    fn set_mouse_passthrough(&mut self, enabled: bool) {
        if let Err(e) = self.window.set_cursor_hittest(!enabled) {
            log::warn!("Failed to set mouse passthrough: {}", e);
        }
        self.passthrough = enabled;
    }
}

/// Everything that exists once the window is up
struct Running<S> {
    window: Arc<WinitWindow>,
    renderer: WgpuRenderer,
    host: WinitHost,
    scene: S,

    /// Logical-size frame uploaded every tick
    screen: Pixmap,
}

/// Event loop handler driving a [`Scene`]
pub struct OverlayApp<S, F> {
    config: WindowConfig,

    /// Builds the scene once the monitor size is known
    factory: Option<F>,

    running: Option<Running<S>>,
    events: EventHandler,
    pointer: PointerProbe,
    clock: FrameClock,

    /// First fatal error; ends the event loop
    error: Option<OverlayError>,
}

impl<S, F> OverlayApp<S, F>
where
    S: Scene,
    F: FnOnce((u32, u32)) -> Result<S>,
{
    pub fn new(config: WindowConfig, factory: F) -> Self {
        let clock = FrameClock::new(config.tps, Instant::now());
        Self {
            config,
            factory: Some(factory),
            running: None,
            events: EventHandler::new(),
            pointer: PointerProbe::new(),
            clock,
            error: None,
        }
    }

    /// Outcome of the run
    pub fn into_result(self) -> Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: OverlayError) {
        log::error!("{}", error);
        if self.error.is_none() {
            self.error = Some(error);
        }
        event_loop.exit();
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> Result<Arc<WinitWindow>> {
        let config = &self.config;

        #[allow(unused_mut)]
        let mut attributes = WinitWindow::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64))
            .with_position(LogicalPosition::new(config.x as f64, config.y as f64))
            .with_decorations(config.decorated)
            .with_transparent(config.transparent)
            .with_resizable(false)
            .with_active(!config.start_unfocused)
            .with_window_level(if config.always_on_top {
                WindowLevel::AlwaysOnTop
            } else {
                WindowLevel::Normal
            });

        #[cfg(any(
            target_os = "linux",
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "netbsd",
            target_os = "openbsd"
        ))]
        {
            use winit::platform::x11::WindowAttributesExtX11;
            attributes = attributes.with_name(config.class_name.clone(), config.class_name.clone());
        }

        #[cfg(windows)]
        {
            use winit::platform::windows::WindowAttributesExtWindows;
            attributes = attributes.with_skip_taskbar(config.skip_taskbar);
        }

        let window = event_loop
            .create_window(attributes)
            .window_err("Failed to create overlay window")?;

        Ok(Arc::new(window))
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running<S>> {
        let window = self.create_window(event_loop)?;

        let monitor_size = window
            .current_monitor()
            .or_else(|| window.primary_monitor())
            .map(|monitor| {
                let size = monitor.size().to_logical::<u32>(monitor.scale_factor());
                (size.width, size.height)
            })
            .unwrap_or_else(|| {
                log::warn!("No monitor reported, assuming 0x0");
                (0, 0)
            });
        log::info!(
            "Overlay window {}x{} on a {}x{} monitor (scale {:.2})",
            self.config.width,
            self.config.height,
            monitor_size.0,
            monitor_size.1,
            window.scale_factor()
        );

        let renderer = WgpuRenderer::new(
            window.clone(),
            (self.config.width, self.config.height),
            self.config.vsync,
        )?;
        // Global positions are useless without the window origin (Wayland)
        if self.pointer.is_available() && window.inner_position().is_err() {
            log::info!("Window position not reported, tracking window events only");
            self.pointer = PointerProbe::disabled();
        }

        // Without a probe the first cursor position has to come from a
        // window event, which click-through would swallow
        let passthrough = self.config.initial_passthrough && self.pointer.is_available();
        if passthrough != self.config.initial_passthrough {
            log::info!("Starting interactive until the cursor is seen");
        }
        let host = WinitHost::new(window.clone(), passthrough);

        let factory = self
            .factory
            .take()
            .ok_or_else(|| OverlayError::Window("Scene already created".to_string()))?;
        let mut scene = factory(monitor_size)?;

        let outside = window.inner_size();
        let (width, height) = scene.layout(outside.width, outside.height);
        let screen = allocate_screen(width, height)?;

        Ok(Running {
            window,
            renderer,
            host,
            scene,
            screen,
        })
    }

    /// Run one update and draw
    fn tick(&mut self) -> Result<Flow> {
        let Some(running) = self.running.as_mut() else {
            return Ok(Flow::Continue);
        };

        let scale_factor = running.window.scale_factor();
        if let Some(global) = self.pointer.position(scale_factor) {
            match running.window.inner_position() {
                Ok(origin) => self
                    .events
                    .set_global_cursor(global, (origin.x, origin.y), scale_factor),
                Err(e) => log::trace!("Inner position unavailable: {}", e),
            }
        }

        let input = self.events.take_input();
        if running.scene.update(&input, &mut running.host)? == Flow::Exit {
            return Ok(Flow::Exit);
        }

        let info = FrameInfo {
            tps: self.clock.actual_tps(),
            passthrough: running.host.mouse_passthrough(),
        };
        running.scene.draw(&mut running.screen, &info);
        running.renderer.present(&running.screen)?;

        Ok(Flow::Continue)
    }

    fn resized(&mut self, width: u32, height: u32) -> Result<()> {
        let Some(running) = self.running.as_mut() else {
            return Ok(());
        };

        running.renderer.resize(width, height)?;
        let logical = running.scene.layout(width, height);
        if logical != (running.screen.width(), running.screen.height()) {
            running.screen = allocate_screen(logical.0, logical.1)?;
        }
        Ok(())
    }
}

fn allocate_screen(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width, height)
        .ok_or_else(|| OverlayError::Window(format!("Invalid screen size {}x{}", width, height)))
}

impl<S, F> ApplicationHandler for OverlayApp<S, F>
where
    S: Scene,
    F: FnOnce((u32, u32)) -> Result<S>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WinitWindowEvent) {
        match event {
            WinitWindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
            }

            WinitWindowEvent::Resized(size) => {
                if let Err(e) = self.resized(size.width, size.height) {
                    self.fail(event_loop, e);
                }
            }

            WinitWindowEvent::Moved(position) => {
                if let Some(running) = self.running.as_mut() {
                    running.host.moved(position);
                }
            }

            event => {
                let scale_factor = self
                    .running
                    .as_ref()
                    .map(|running| running.window.scale_factor())
                    .unwrap_or(1.0);
                self.events.handle_window_event(&event, scale_factor);
            }
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        // The probe replaces the cursor every tick anyway
        if self.pointer.is_available() {
            return;
        }
        if let Some(running) = self.running.as_ref() {
            self.events.handle_device_event(
                &event,
                running.window.scale_factor(),
                running.host.mouse_passthrough(),
            );
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if self.clock.is_due(now) {
            self.clock.record_tick(now);
            match self.tick() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => {
                    event_loop.exit();
                    return;
                }
                Err(e) => {
                    self.fail(event_loop, e);
                    return;
                }
            }
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(self.clock.next_tick()));
    }
}

/// Open the overlay window and run until it closes
///
/// `factory` receives the monitor size in logical pixels.
pub fn run<S, F>(config: WindowConfig, factory: F) -> Result<()>
where
    S: Scene,
    F: FnOnce((u32, u32)) -> Result<S>,
{
    let event_loop = EventLoop::new().window_err("Failed to create event loop")?;
    event_loop.listen_device_events(DeviceEvents::Always);

    let mut app = OverlayApp::new(config, factory);
    event_loop
        .run_app(&mut app)
        .window_err("Event loop error")?;

    app.into_result()
}
