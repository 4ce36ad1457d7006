//! Error types for screen-rule
//!
//! This module defines the error type used throughout the library.
//! We use thiserror for the library error and anyhow at the binary
//! boundary.

use thiserror::Error;

/// Main error type for the overlay
#[derive(Error, Debug)]
pub enum OverlayError {
    /// Window creation and event loop errors
    #[error("Window error: {0}")]
    Window(String),

    /// GPU presentation errors
    #[error("Renderer error: {0}")]
    Renderer(String),

    /// Font loading or parsing errors
    #[error("Font error: {0}")]
    Font(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(#[from] std::io::Error),

    /// Errors reported by the host platform
    #[error("Platform error: {0}")]
    Platform(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for Results in screen-rule
pub type Result<T> = std::result::Result<T, OverlayError>;

/// Extension trait for converting other errors to OverlayError
pub trait IntoOverlayError<T> {
    /// Convert this error into an OverlayError with the given context
    fn window_err(self, context: &str) -> Result<T>;
    fn renderer_err(self, context: &str) -> Result<T>;
    fn font_err(self, context: &str) -> Result<T>;
    fn config_err(self, context: &str) -> Result<T>;
    fn platform_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoOverlayError<T> for std::result::Result<T, E> {
    fn window_err(self, context: &str) -> Result<T> {
        self.map_err(|e| OverlayError::Window(format!("{}: {}", context, e)))
    }

    fn renderer_err(self, context: &str) -> Result<T> {
        self.map_err(|e| OverlayError::Renderer(format!("{}: {}", context, e)))
    }

    fn font_err(self, context: &str) -> Result<T> {
        self.map_err(|e| OverlayError::Font(format!("{}: {}", context, e)))
    }

    fn config_err(self, context: &str) -> Result<T> {
        self.map_err(|e| OverlayError::Config(format!("{}: {}", context, e)))
    }

    fn platform_err(self, context: &str) -> Result<T> {
        self.map_err(|e| OverlayError::Platform(format!("{}: {}", context, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OverlayError::Window("Failed to create window".to_string());
        assert_eq!(err.to_string(), "Window error: Failed to create window");

        let err = OverlayError::Font("bad table".to_string());
        assert_eq!(err.to_string(), "Font error: bad table");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: OverlayError = io_err.into();
        assert!(matches!(err, OverlayError::FileIO(_)));
    }

    #[test]
    fn test_into_overlay_error_trait() {
        let result: std::result::Result<(), &str> = Err("no adapter");
        let converted = result.renderer_err("Requesting adapter");

        match converted {
            Err(OverlayError::Renderer(msg)) => {
                assert_eq!(msg, "Requesting adapter: no adapter");
            }
            _ => panic!("Expected Renderer error"),
        }

        let result: std::result::Result<(), &str> = Err("connection reset");
        let err = result.platform_err("QueryPointer reply failed").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Platform error: QueryPointer reply failed: connection reset"
        );
    }
}
