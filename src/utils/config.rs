//! Configuration management for screen-rule
//!
//! Configuration starts from built-in defaults, is optionally replaced
//! section-by-section from a TOML file, and is then adjusted by
//! environment variables. Nothing is ever written back.

use crate::renderer::Color;
use crate::utils::error::{IntoOverlayError, OverlayError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Window configuration
    pub window: WindowConfig,

    /// Canvas text and border styling
    pub style: StyleConfig,

    /// Font source
    pub font: FontConfig,

    /// General application settings
    pub general: GeneralConfig,
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Logical canvas width
    pub width: u32,

    /// Logical canvas height
    pub height: u32,

    /// Initial window x position
    pub x: i32,

    /// Initial window y position
    pub y: i32,

    /// Window title
    pub title: String,

    /// X11 WM_CLASS class and instance name
    pub class_name: String,

    /// Update ticks per second
    pub tps: u32,

    /// Wait for vertical blank on present
    pub vsync: bool,

    /// Draw the platform title bar and borders
    pub decorated: bool,

    /// Keep the window above all others
    pub always_on_top: bool,

    /// Transparent window background
    pub transparent: bool,

    /// Start with mouse click-through enabled
    pub initial_passthrough: bool,

    /// Do not take focus when the window first appears
    pub start_unfocused: bool,

    /// Hide the window from the taskbar (Windows only)
    pub skip_taskbar: bool,
}

/// A text label drawn onto the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    pub text: String,
    pub size: f32,
    pub x: f32,
    pub y: f32,
}

/// Canvas styling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Accent colour for text and border, as hex
    pub accent: String,

    /// `wght` variation axis value
    pub weight: f32,

    /// `wdth` variation axis value
    pub width: f32,

    /// Border stroke width
    pub border_width: f32,

    /// Border inset from the canvas edges
    pub border_inset: f32,

    /// Labels drawn in order
    pub labels: Vec<LabelConfig>,
}

/// Font source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Path to a variable font file; falls back to the embedded face
    pub path: Option<PathBuf>,
}

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Show the debug panel
    pub debug_panel: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 180,
            x: 0,
            y: 0,
            title: "Hello, World!".to_string(),
            class_name: "Hello, World!".to_string(),
            tps: 60,
            vsync: true,
            decorated: false,
            always_on_top: true,
            transparent: true,
            initial_passthrough: true,
            start_unfocused: true,
            skip_taskbar: true,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            accent: "#ffaa11".to_string(),
            weight: 800.0,
            width: 100.0,
            border_width: 2.0,
            border_inset: 2.0,
            labels: vec![
                LabelConfig {
                    text: "你好世界！".to_string(),
                    size: 50.0,
                    x: 146.0,
                    y: 5.0,
                },
                LabelConfig {
                    text: "测试".to_string(),
                    size: 56.0,
                    x: 90.0,
                    y: 80.0,
                },
            ],
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_panel: true,
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// Sources, later overriding earlier:
    /// 1. Default values
    /// 2. `explicit` file if given, else the user config file when present
    /// 3. Environment variables (SCREEN_RULE_* prefix)
    ///
    /// The result is not validated: callers apply their own overrides
    /// first and then call [`Config::validate`].
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::user_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .config_err(&format!("Failed to read {}", path.display()))?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration text; missing keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).config_err("Failed to parse config file")
    }

    /// Apply environment variable overrides
    ///
    /// `lookup` is `std::env::var` in production.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(width) = lookup("SCREEN_RULE_WIDTH") {
            self.window.width = width
                .parse()
                .map_err(|_| OverlayError::Config("Invalid SCREEN_RULE_WIDTH".to_string()))?;
        }

        if let Some(height) = lookup("SCREEN_RULE_HEIGHT") {
            self.window.height = height
                .parse()
                .map_err(|_| OverlayError::Config("Invalid SCREEN_RULE_HEIGHT".to_string()))?;
        }

        if let Some(font) = lookup("SCREEN_RULE_FONT") {
            self.font.path = Some(PathBuf::from(font));
        }

        if let Some(log_level) = lookup("SCREEN_RULE_LOG_LEVEL") {
            self.general.log_level = log_level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(OverlayError::Config(
                "Window dimensions must be non-zero".to_string(),
            ));
        }

        if !(1..=240).contains(&self.window.tps) {
            return Err(OverlayError::Config(format!(
                "Ticks per second must be between 1 and 240, got {}",
                self.window.tps
            )));
        }

        if self.style.border_width < 0.0 || self.style.border_inset < 0.0 {
            return Err(OverlayError::Config(
                "Border width and inset must not be negative".to_string(),
            ));
        }

        if self.style.labels.iter().any(|label| label.size <= 0.0) {
            return Err(OverlayError::Config(
                "Label font sizes must be positive".to_string(),
            ));
        }

        Color::from_hex(&self.style.accent)
            .map_err(|e| OverlayError::Config(format!("Invalid accent colour: {}", e)))?;

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.general.log_level.as_str()) {
            return Err(OverlayError::Config(format!(
                "Invalid log level '{}', must be one of: {:?}",
                self.general.log_level, valid_log_levels
            )));
        }

        Ok(())
    }

    /// Get user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("screen-rule").join("config.toml"))
    }
}
