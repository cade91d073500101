//! Persisted config file and the cycle-forward/backward operation.
//!
//! The file is a flat TOML mapping:
//! ```text
//! style = "braille"
//! display = "all"
//! width = 10
//! ```
//! Reads go through a typed serde view with every key optional; writes go
//! through `toml_edit` so key order and comments survive a cycle.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use toml_edit::{value, DocumentMut};
use tracing::{debug, warn};

use super::render_config::{BarStyle, DisplayMode, RenderConfig};

/// Bar widths offered by the width axis
pub const WIDTH_OPTIONS: [&str; 7] = ["4", "6", "8", "10", "12", "16", "20"];

const STYLE_OPTIONS: [&str; 4] = ["ascii", "unicode", "braille", "minimal"];
const DISPLAY_OPTIONS: [&str; 5] = ["all", "five_hour", "seven_day", "sonnet", "minimal"];

/// A configurable axis with a fixed option list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Style,
    Display,
    Width,
}

impl Axis {
    /// Key in the config file
    pub fn key(self) -> &'static str {
        match self {
            Axis::Style => "style",
            Axis::Display => "display",
            Axis::Width => "width",
        }
    }

    /// Ordered option list that cycling walks through
    pub fn options(self) -> &'static [&'static str] {
        match self {
            Axis::Style => &STYLE_OPTIONS,
            Axis::Display => &DISPLAY_OPTIONS,
            Axis::Width => &WIDTH_OPTIONS,
        }
    }

    /// Current value of this axis in a resolved config
    fn current(self, config: &RenderConfig) -> String {
        match self {
            Axis::Style => config.style.as_str().to_string(),
            Axis::Display => config.display.as_str().to_string(),
            Axis::Width => config.bar_width.to_string(),
        }
    }

    /// Spell a raw persisted value the way the option list does.
    ///
    /// Values that don't parse are returned as-is so cycling starts over.
    fn canonical(self, raw: &str) -> String {
        match self {
            Axis::Style => raw
                .parse::<BarStyle>()
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|_| raw.to_string()),
            Axis::Display => raw
                .parse::<DisplayMode>()
                .map(|d| d.as_str().to_string())
                .unwrap_or_else(|_| raw.to_string()),
            Axis::Width => raw.trim().to_string(),
        }
    }
}

/// Cycle direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Next,
    Previous,
}

/// Step from `current` to its neighbour in `options`, wrapping around.
///
/// An unrecognized current value is treated as index 0.
pub fn cycle_value(options: &[&'static str], current: &str, direction: Direction) -> &'static str {
    let len = options.len();
    let index = options.iter().position(|o| *o == current).unwrap_or(0);
    let next = match direction {
        Direction::Next => (index + 1) % len,
        Direction::Previous => (index + len - 1) % len,
    };
    options[next]
}

/// Typed view of the persisted config; unknown keys are ignored.
///
/// Values stay loosely typed so one bad key doesn't hide the others.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PersistedValues {
    #[serde(default)]
    pub style: Option<toml::Value>,
    #[serde(default)]
    pub display: Option<toml::Value>,
    /// Integer, or a string holding one
    #[serde(default)]
    pub width: Option<toml::Value>,
}

impl PersistedValues {
    /// Parse file contents, treating a broken file as empty
    pub fn parse(content: &str) -> Self {
        toml::from_str(content).unwrap_or_else(|e| {
            warn!("Ignoring unparsable config file: {}", e);
            Self::default()
        })
    }

    /// Raw persisted value for `axis`, rendered as text
    pub fn raw(&self, axis: Axis) -> Option<String> {
        let v = match axis {
            Axis::Style => self.style.as_ref(),
            Axis::Display => self.display.as_ref(),
            Axis::Width => self.width.as_ref(),
        }?;
        Some(value_text(v))
    }

    /// Overlay persisted values onto `config`
    pub fn apply(&self, config: &mut RenderConfig) {
        if let Some(style) = self.raw(Axis::Style) {
            config.style = BarStyle::parse_lenient(&style);
        }
        if let Some(display) = self.raw(Axis::Display) {
            config.display = DisplayMode::parse_lenient(&display);
        }
        if let Some(width) = self.width.as_ref().and_then(width_from_value) {
            config.bar_width = width;
        }
    }
}

fn value_text(v: &toml::Value) -> String {
    match v {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn width_from_value(v: &toml::Value) -> Option<u16> {
    let width = match v {
        toml::Value::Integer(i) => u16::try_from(*i).ok(),
        toml::Value::String(s) => s.trim().parse::<u16>().ok(),
        _ => None,
    };
    match width {
        Some(w) if w > 0 => Some(w),
        _ => {
            warn!("Ignoring invalid bar width in config file: {}", v);
            None
        }
    }
}

/// Persisted style/display/width selection on local storage
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location (`~/.config/quotabar/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("quotabar").join("config.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read persisted values; a missing or unreadable file is empty
    pub fn load(&self) -> PersistedValues {
        match fs::read_to_string(&self.path) {
            Ok(content) => PersistedValues::parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PersistedValues::default(),
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", self.path, e);
                PersistedValues::default()
            }
        }
    }

    /// Layer persisted values over `base` (defaults + environment)
    pub fn resolve(&self, base: RenderConfig) -> RenderConfig {
        let mut config = base;
        self.load().apply(&mut config);
        config.normalized()
    }

    /// Move one axis to its next/previous option and persist it.
    ///
    /// Returns the new value.
    pub fn cycle(&self, axis: Axis, direction: Direction, base: RenderConfig) -> Result<String> {
        let current = match self.load().raw(axis) {
            Some(raw) => axis.canonical(&raw),
            None => axis.current(&base.normalized()),
        };
        let next = cycle_value(axis.options(), &current, direction);

        let mut doc = self.read_document()?;
        match axis {
            Axis::Width => match next.parse::<i64>() {
                Ok(width) => doc[axis.key()] = value(width),
                Err(_) => doc[axis.key()] = value(next),
            },
            Axis::Style | Axis::Display => doc[axis.key()] = value(next),
        }
        self.write_document(&doc)?;

        debug!("Cycled {} from {} to {}", axis.key(), current, next);
        Ok(next.to_string())
    }

    /// Delete the persisted config. Returns whether a file was removed.
    pub fn reset(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove config file: {:?}", self.path))
            }
        }
    }

    fn read_document(&self) -> Result<DocumentMut> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file: {:?}", self.path))
            }
        };
        Ok(content.parse::<DocumentMut>().unwrap_or_else(|e| {
            warn!("Replacing unparsable config file {:?}: {}", self.path, e);
            DocumentMut::new()
        }))
    }

    /// Write atomically via a temp file in the same directory
    fn write_document(&self, doc: &DocumentMut) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
        }

        let mut temp_name = self.path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(format!(".{}.tmp", std::process::id()));
        let temp_path = self.path.with_file_name(temp_name);
        let _ = fs::remove_file(&temp_path);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .with_context(|| format!("Failed to create temp config file: {:?}", temp_path))?;
        let written = file
            .write_all(doc.to_string().as_bytes())
            .and_then(|_| file.sync_all());
        drop(file);
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e)
                .with_context(|| format!("Failed to write temp config file: {:?}", temp_path));
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e)
                .with_context(|| format!("Failed to rename config file: {:?}", self.path));
        }
        Ok(())
    }
}
