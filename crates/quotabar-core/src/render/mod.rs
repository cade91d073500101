//! Bar rendering.
//!
//! One renderer per [`BarStyle`] variant, selected in [`render_bar`]:
//! ```text
//! ascii    5h[###-|---]
//! unicode  5h[███░│░░░]
//! braille  5h[⣿⣿⣿⣤⠀⠀⠀⠀]
//! minimal  5h 45%
//! ```
//! Glyph styles always emit exactly `width` cells between the brackets.

mod braille;
mod cells;

pub use braille::{braille_cells, BRAILLE_LEVELS};
pub use cells::{marked_cells, GlyphSet, ASCII_GLYPHS, UNICODE_GLYPHS};

use crate::config::BarStyle;
use crate::usage::WindowKind;
use crate::window::WindowProgress;

/// Render one bar: `label[cells]`, or `label N%` for the minimal style
pub fn render_bar(fill: u8, time: u8, width: u16, label: &str, style: BarStyle) -> String {
    let cells = match style {
        BarStyle::Ascii => marked_cells(fill, time, width, &ASCII_GLYPHS),
        BarStyle::Unicode => marked_cells(fill, time, width, &UNICODE_GLYPHS),
        BarStyle::Braille => braille_cells(fill, width),
        BarStyle::Minimal => return format!("{} {}%", label, fill.min(100)),
    };
    format!("{}[{}]", label, cells)
}

/// Statusline segment for one window.
///
/// Glyph styles: `5h[███░│░░░] 45% 2h`; minimal: `5h 45%`.
pub fn render_segment(
    kind: WindowKind,
    progress: &WindowProgress,
    width: u16,
    style: BarStyle,
) -> String {
    let bar = render_bar(
        progress.fill,
        progress.time,
        width,
        kind.short_label(),
        style,
    );
    match style {
        BarStyle::Minimal => bar,
        _ => format!("{} {}% {}", bar, progress.fill, progress.remaining),
    }
}
