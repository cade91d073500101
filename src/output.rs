//! Output payloads: a bare text line or a `{text, tooltip, class}` object.

use clap::ValueEnum;
use serde::Serialize;
use tracing::warn;

use quotabar_core::UsageError;

/// Fill percentage at which the bar turns `warning`
pub const WARNING_THRESHOLD: u8 = 50;
/// Fill percentage at which the bar turns `critical`
pub const CRITICAL_THRESHOLD: u8 = 80;

/// Emitted when serializing the JSON payload itself fails
const FALLBACK_JSON: &str = r#"{"text":"⚠","tooltip":"output error","class":"error"}"#;

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Space-separated bars for terminal statuslines
    #[default]
    Text,
    /// JSON object for waybar-style status bars
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

/// CSS class consumed by status bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Normal,
    Warning,
    Critical,
    Error,
    Unknown,
}

impl StatusClass {
    /// Class for the primary windows' fill percentages
    pub fn from_fills(fills: &[u8]) -> Self {
        match fills.iter().copied().max().unwrap_or(0) {
            f if f >= CRITICAL_THRESHOLD => StatusClass::Critical,
            f if f >= WARNING_THRESHOLD => StatusClass::Warning,
            _ => StatusClass::Normal,
        }
    }
}

/// A rendered status, independent of output format
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub text: String,
    pub tooltip: String,
    pub class: StatusClass,
}

impl Rendered {
    /// Placeholder for a failed fetch
    pub fn error(err: &UsageError) -> Self {
        Self {
            text: format!("⚠ {}", err.short_label()),
            tooltip: err.to_string(),
            class: StatusClass::Error,
        }
    }

    /// Placeholder for a response without any recognizable window
    pub fn unknown(tooltip: impl Into<String>) -> Self {
        Self {
            text: "? usage".to_string(),
            tooltip: tooltip.into(),
            class: StatusClass::Unknown,
        }
    }

    /// Serialize for the given format
    pub fn emit(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.text.clone(),
            OutputFormat::Json => serde_json::to_string(self).unwrap_or_else(|e| {
                warn!("Failed to serialize output: {}", e);
                FALLBACK_JSON.to_string()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_class_thresholds() {
        assert_eq!(StatusClass::from_fills(&[45, 28]), StatusClass::Normal);
        assert_eq!(StatusClass::from_fills(&[49, 0]), StatusClass::Normal);
        assert_eq!(StatusClass::from_fills(&[10, 50]), StatusClass::Warning);
        assert_eq!(StatusClass::from_fills(&[79, 50]), StatusClass::Warning);
        assert_eq!(StatusClass::from_fills(&[80, 0]), StatusClass::Critical);
        assert_eq!(StatusClass::from_fills(&[]), StatusClass::Normal);
    }

    #[test]
    fn test_emit_json() {
        let rendered = Rendered {
            text: "5h[###-----]".to_string(),
            tooltip: "5-hour: 45% used".to_string(),
            class: StatusClass::Warning,
        };
        assert_eq!(
            rendered.emit(OutputFormat::Json),
            r#"{"text":"5h[###-----]","tooltip":"5-hour: 45% used","class":"warning"}"#
        );
        assert_eq!(rendered.emit(OutputFormat::Text), "5h[###-----]");
    }

    #[test]
    fn test_error_placeholder() {
        let rendered = Rendered::error(&UsageError::AuthUnavailable("empty token".to_string()));
        assert_eq!(rendered.text, "⚠ no token");
        assert_eq!(rendered.tooltip, "auth unavailable: empty token");
        assert_eq!(rendered.class, StatusClass::Error);
        assert!(rendered
            .emit(OutputFormat::Json)
            .ends_with(r#""class":"error"}"#));

        let text = |err: UsageError| Rendered::error(&err).emit(OutputFormat::Text);
        assert_eq!(text(UsageError::ConfigUnavailable("x".into())), "⚠ no creds");
        assert_eq!(text(UsageError::FetchFailed("x".into())), "⚠ offline");
    }
}
