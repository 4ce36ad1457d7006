//! Utility module for screen-rule
//!
//! - Error handling with a custom error type
//! - Configuration management

pub mod config;
pub mod error;

// Re-export commonly used items
pub use config::{Config, FontConfig, GeneralConfig, LabelConfig, StyleConfig, WindowConfig};
pub use error::{IntoOverlayError, OverlayError, Result};

/// Load the application configuration
///
/// Loads from defaults, then `explicit` or the user configuration file,
/// then environment variables. Validation is left to the caller.
pub fn load_config(explicit: Option<&std::path::Path>) -> Result<Config> {
    Config::load(explicit)
}
