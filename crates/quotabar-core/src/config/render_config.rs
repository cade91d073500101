//! Render settings: bar width, bar style and which windows to display.
//!
//! Style and display values are closed enums. Parsing is lenient: unknown
//! strings log a warning and fall back to the default variant, so a typo
//! in the config file never breaks the statusline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::cache::fingerprint;
use crate::usage::WindowKind;

/// Default number of glyph cells per bar
pub const DEFAULT_BAR_WIDTH: u16 = 8;

/// Visual style of a bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarStyle {
    /// `#`, `-` and `|` for the time marker
    Ascii,
    /// Block glyphs with a thin vertical time marker
    #[default]
    Unicode,
    /// Braille cells with 8 fill levels each, no time marker
    Braille,
    /// Percentage only
    Minimal,
}

impl BarStyle {
    /// Cycle order
    pub const ALL: [BarStyle; 4] = [
        BarStyle::Ascii,
        BarStyle::Unicode,
        BarStyle::Braille,
        BarStyle::Minimal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BarStyle::Ascii => "ascii",
            BarStyle::Unicode => "unicode",
            BarStyle::Braille => "braille",
            BarStyle::Minimal => "minimal",
        }
    }

    /// Parse, falling back to the default style for unknown values
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            warn!("Unknown bar style '{}', using '{}'", s, Self::default());
            Self::default()
        })
    }
}

impl FromStr for BarStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascii" => Ok(BarStyle::Ascii),
            "unicode" | "block" => Ok(BarStyle::Unicode),
            "braille" => Ok(BarStyle::Braille),
            "minimal" => Ok(BarStyle::Minimal),
            other => Err(format!("unknown bar style: {}", other)),
        }
    }
}

impl fmt::Display for BarStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which windows end up in the output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Every window the endpoint reported
    #[default]
    All,
    FiveHour,
    SevenDay,
    Sonnet,
    /// Percentages for the two primary windows, no bars
    Minimal,
}

impl DisplayMode {
    /// Cycle order
    pub const ALL: [DisplayMode; 5] = [
        DisplayMode::All,
        DisplayMode::FiveHour,
        DisplayMode::SevenDay,
        DisplayMode::Sonnet,
        DisplayMode::Minimal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::All => "all",
            DisplayMode::FiveHour => "five_hour",
            DisplayMode::SevenDay => "seven_day",
            DisplayMode::Sonnet => "sonnet",
            DisplayMode::Minimal => "minimal",
        }
    }

    /// Windows shown in this mode, in display order
    pub fn windows(self) -> &'static [WindowKind] {
        match self {
            DisplayMode::All => &WindowKind::ALL,
            DisplayMode::FiveHour => &[WindowKind::FiveHour],
            DisplayMode::SevenDay => &[WindowKind::SevenDay],
            DisplayMode::Sonnet => &[WindowKind::SonnetSevenDay],
            DisplayMode::Minimal => &[WindowKind::FiveHour, WindowKind::SevenDay],
        }
    }

    /// Parse, falling back to the default mode for unknown values
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            warn!("Unknown display mode '{}', using '{}'", s, Self::default());
            Self::default()
        })
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "all" => Ok(DisplayMode::All),
            "fivehour" | "5h" => Ok(DisplayMode::FiveHour),
            "sevenday" | "7d" => Ok(DisplayMode::SevenDay),
            "sonnet" => Ok(DisplayMode::Sonnet),
            "minimal" => Ok(DisplayMode::Minimal),
            _ => Err(format!("unknown display mode: {}", s.trim())),
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective render settings for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Glyph cells per bar, always > 0
    pub bar_width: u16,
    pub style: BarStyle,
    pub display: DisplayMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            bar_width: DEFAULT_BAR_WIDTH,
            style: BarStyle::default(),
            display: DisplayMode::default(),
        }
    }
}

impl RenderConfig {
    /// Style actually drawn; the minimal display mode forces minimal bars
    pub fn effective_style(&self) -> BarStyle {
        if self.display == DisplayMode::Minimal {
            BarStyle::Minimal
        } else {
            self.style
        }
    }

    /// Hash identifying this configuration in the output cache
    pub fn fingerprint(&self) -> String {
        fingerprint(self.to_string().as_bytes())
    }

    /// Replace a zero width with the default
    pub fn normalized(mut self) -> Self {
        if self.bar_width == 0 {
            self.bar_width = DEFAULT_BAR_WIDTH;
        }
        self
    }
}

impl fmt::Display for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "style={} display={} width={}",
            self.style, self.display, self.bar_width
        )
    }
}
