use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;

use screen_rule::overlay::{Overlay, OverlayContext};
use screen_rule::text::FontFace;
use screen_rule::utils::{self, Config};
use screen_rule::window;

/// screen-rule - A transparent overlay with per-pixel click-through
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to the user config file)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Variable font file
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Window width in logical pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in logical pixels
    #[arg(long)]
    height: Option<u32>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    /// Apply command line overrides on top of the loaded configuration
    fn apply(&self, config: &mut Config) {
        if let Some(font) = &self.font {
            config.font.path = Some(font.clone());
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if self.debug {
            config.general.log_level = "debug".to_string();
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    let loaded = utils::load_config(args.config.as_deref()).and_then(|mut config| {
        args.apply(&mut config);
        config.validate()?;
        Ok(config)
    });

    // Initialize logging
    let log_level = match &loaded {
        Ok(config) => config.general.log_level.clone(),
        Err(_) if args.debug => "debug".to_string(),
        Err(_) => "info".to_string(),
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    info!("Starting screen-rule v{}", env!("CARGO_PKG_VERSION"));

    let config = loaded.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let face = FontFace::load(config.font.path.as_deref()).map_err(|e| {
        error!("Failed to load font: {}", e);
        e
    })?;

    let window_config = config.window.clone();
    window::run(window_config, move |monitor_size| {
        let context = OverlayContext::new(Box::new(face), monitor_size)?;
        Overlay::new(context, &config)
    })?;

    info!("Overlay closed");
    Ok(())
}
