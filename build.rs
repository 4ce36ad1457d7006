//! Build script for screen-rule
//!
//! This script handles:
//! - Checking the embedded font asset when the `embedded-font` feature is on
//! - Rebuilding when the font asset changes

use std::env;
use std::path::{Path, PathBuf};

const FONT_ASSET: &str = "assets/fonts/SourceHanSansSC-VF.ttf";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", FONT_ASSET);

    if env::var_os("CARGO_FEATURE_EMBEDDED_FONT").is_some() {
        let manifest_dir = env::var("CARGO_MANIFEST_DIR").map(PathBuf::from).unwrap_or_default();
        if let Err(e) = check_font_asset(&manifest_dir.join(FONT_ASSET)) {
            panic!(
                "embedded-font is enabled but {}: {}. Place a variable font at {} or build without the feature.",
                FONT_ASSET, e, FONT_ASSET
            );
        }
    }
}

/// Verify the asset exists and starts with a TrueType or OpenType tag
fn check_font_asset(path: &Path) -> Result<(), String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    let tag = bytes.get(0..4).ok_or_else(|| "file is too short".to_string())?;
    match tag {
        [0x00, 0x01, 0x00, 0x00] | b"OTTO" | b"true" | b"ttcf" => Ok(()),
        _ => Err(format!("unrecognised font signature {:02x?}", tag)),
    }
}
