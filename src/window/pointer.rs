//! Global cursor probe
//!
//! While click-through is on, the window receives no cursor events, so the
//! cursor is read from the desktop every tick instead:
//!
//! - Windows: `GetCursorPos`
//! - X11: `QueryPointer` on the root window over a connection opened once
//! - macOS: the location of a fresh Core Graphics event
//!
//! Where none of these is available (a Wayland session without XWayland,
//! for example) [`crate::window::events`] falls back to event tracking.

use crate::utils::error::Result;

/// Reads the cursor position from the desktop
pub struct PointerProbe {
    backend: Option<Backend>,
}

impl PointerProbe {
    /// Connect to the platform; failure leaves the probe disabled
    pub fn new() -> Self {
        let backend = match Backend::connect() {
            Ok(backend) => Some(backend),
            Err(e) => {
                log::info!("Global cursor unavailable, tracking window events only: {}", e);
                None
            }
        };
        Self { backend }
    }

    /// A probe that never reports a position
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    /// Whether the probe can report positions
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Cursor position in physical screen pixels
    ///
    /// `scale_factor` is the window's; platforms that report logical
    /// points use it to convert. A query error disables the probe.
    pub fn position(&mut self, scale_factor: f64) -> Option<(i32, i32)> {
        let backend = self.backend.as_mut()?;
        match backend.query(scale_factor) {
            Ok(position) => Some(position),
            Err(e) => {
                log::warn!("Global cursor query failed, disabling probe: {}", e);
                self.backend = None;
                None
            }
        }
    }
}

impl Default for PointerProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(windows)]
struct Backend;

#[cfg(windows)]
impl Backend {
    fn connect() -> Result<Self> {
        Ok(Self)
    }

    fn query(&mut self, _scale_factor: f64) -> Result<(i32, i32)> {
        use crate::utils::error::IntoOverlayError;
        use windows::Win32::Foundation::POINT;
        use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

        let mut point = POINT::default();
        // SAFETY: `point` is a valid, writable POINT for the duration of the call
        unsafe { GetCursorPos(&mut point) }.platform_err("GetCursorPos failed")?;
        Ok((point.x, point.y))
    }
}

#[cfg(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
struct Backend {
    conn: x11rb::rust_connection::RustConnection,
    root: x11rb::protocol::xproto::Window,
}

#[cfg(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
impl Backend {
    fn connect() -> Result<Self> {
        use crate::utils::error::{IntoOverlayError, OverlayError};
        use x11rb::connection::Connection;

        let (conn, screen_num) = x11rb::connect(None).platform_err("No X display")?;
        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| OverlayError::Platform(format!("X screen {} missing", screen_num)))?;

        log::debug!("Global cursor from X11 root window {:#x}", root);
        Ok(Self { conn, root })
    }

    fn query(&mut self, _scale_factor: f64) -> Result<(i32, i32)> {
        use crate::utils::error::IntoOverlayError;
        use x11rb::protocol::xproto::ConnectionExt as _;

        let reply = self
            .conn
            .query_pointer(self.root)
            .platform_err("QueryPointer request failed")?
            .reply()
            .platform_err("QueryPointer reply failed")?;
        Ok((reply.root_x as i32, reply.root_y as i32))
    }
}

#[cfg(target_os = "macos")]
struct Backend;

#[cfg(target_os = "macos")]
impl Backend {
    fn connect() -> Result<Self> {
        Ok(Self)
    }

    fn query(&mut self, scale_factor: f64) -> Result<(i32, i32)> {
        use crate::utils::error::OverlayError;
        use core_graphics::event::CGEvent;
        use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};

        let source = CGEventSource::new(CGEventSourceStateID::CombinedSessionState)
            .map_err(|_| OverlayError::Platform("CGEventSource unavailable".to_string()))?;
        let event = CGEvent::new(source)
            .map_err(|_| OverlayError::Platform("CGEvent unavailable".to_string()))?;

        // Points, top-left origin; the window origin is in physical pixels
        let point = event.location();
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Ok(((point.x * scale).floor() as i32, (point.y * scale).floor() as i32))
    }
}

#[cfg(not(any(
    windows,
    target_os = "macos",
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
struct Backend;

#[cfg(not(any(
    windows,
    target_os = "macos",
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
impl Backend {
    fn connect() -> Result<Self> {
        Err(crate::utils::error::OverlayError::Platform(
            "no global cursor on this platform".to_string(),
        ))
    }

    fn query(&mut self, _scale_factor: f64) -> Result<(i32, i32)> {
        Self::connect().map(|_| (0, 0))
    }
}

/// Convert a global physical position to window-local logical pixels
pub fn to_window_local(
    global: (i32, i32),
    inner_origin: (i32, i32),
    scale_factor: f64,
) -> (f64, f64) {
    let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
    (
        (global.0 - inner_origin.0) as f64 / scale,
        (global.1 - inner_origin.1) as f64 / scale,
    )
}
