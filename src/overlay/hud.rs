//! Diagnostic text in the top-left corner

use crate::text::TextStyle;

/// Where the diagnostic text starts
pub const HUD_ORIGIN: (f32, f32) = (10.0, 10.0);

pub const HUD_STYLE: TextStyle = TextStyle::new(12.0);

/// Text shown every frame
///
/// The `Count` line is omitted when the debug panel is disabled.
pub fn diagnostic_text(
    monitor_size: (u32, u32),
    cursor: (i32, i32),
    tps: f64,
    passthrough: bool,
    count: Option<u32>,
) -> String {
    let mut text = format!(
        "({}, {})\n({}, {})\nTPS: {:.2}\nMousePassthrough: {}\nHello, World!",
        monitor_size.0, monitor_size.1, cursor.0, cursor.1, tps, passthrough
    );
    if let Some(count) = count {
        text.push_str(&format!("\nCount: {}", count));
    }
    text
}
