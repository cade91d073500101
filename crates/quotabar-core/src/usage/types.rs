//! Usage data types returned by the OAuth usage endpoint.

use serde::{Deserialize, Serialize};

/// Rolling quota window reported by the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// Five-hour session window
    FiveHour,
    /// Seven-day window across all models
    SevenDay,
    /// Seven-day window for Sonnet only
    SonnetSevenDay,
}

impl WindowKind {
    /// Every window kind, in display order
    pub const ALL: [WindowKind; 3] = [
        WindowKind::FiveHour,
        WindowKind::SevenDay,
        WindowKind::SonnetSevenDay,
    ];

    /// Length of the rolling window in seconds
    pub fn duration_secs(self) -> i64 {
        match self {
            WindowKind::FiveHour => 5 * 3600,
            WindowKind::SevenDay | WindowKind::SonnetSevenDay => 7 * 86400,
        }
    }

    /// Compact label used in front of a bar
    pub fn short_label(self) -> &'static str {
        match self {
            WindowKind::FiveHour => "5h",
            WindowKind::SevenDay => "7d",
            WindowKind::SonnetSevenDay => "sn",
        }
    }

    /// Human-readable name used in tooltips
    pub fn title(self) -> &'static str {
        match self {
            WindowKind::FiveHour => "5-hour",
            WindowKind::SevenDay => "7-day",
            WindowKind::SonnetSevenDay => "7-day Sonnet",
        }
    }
}

/// A single window as it appears in the response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageWindowRaw {
    /// Percentage used (0-100, may be fractional or null)
    #[serde(default)]
    pub utilization: Option<f64>,
    /// Reset instant (ISO 8601), null when the window is idle
    #[serde(default)]
    pub resets_at: Option<String>,
}

/// Complete response from the usage endpoint (only fields we care about)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    #[serde(default)]
    pub five_hour: Option<UsageWindowRaw>,
    #[serde(default)]
    pub seven_day: Option<UsageWindowRaw>,
    #[serde(default)]
    pub seven_day_sonnet: Option<UsageWindowRaw>,
}

impl UsageSnapshot {
    /// Raw entry for a window kind, if the response carried it
    pub fn raw(&self, kind: WindowKind) -> Option<&UsageWindowRaw> {
        match kind {
            WindowKind::FiveHour => self.five_hour.as_ref(),
            WindowKind::SevenDay => self.seven_day.as_ref(),
            WindowKind::SonnetSevenDay => self.seven_day_sonnet.as_ref(),
        }
    }

    /// Window for a kind; missing fields default to 0% and no reset
    pub fn window(&self, kind: WindowKind) -> QuotaWindow {
        let raw = self.raw(kind);
        QuotaWindow {
            kind,
            utilization: raw.and_then(|r| r.utilization).unwrap_or(0.0),
            resets_at: raw.and_then(|r| r.resets_at.clone()),
        }
    }

    /// Whether the response carried none of the known windows
    pub fn is_empty(&self) -> bool {
        WindowKind::ALL.iter().all(|k| self.raw(*k).is_none())
    }
}

/// Immutable per-fetch view of one quota window
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaWindow {
    pub kind: WindowKind,
    /// Percentage used as reported (not yet clamped)
    pub utilization: f64,
    /// Reset instant as reported; parsed lazily so bad values degrade
    pub resets_at: Option<String>,
}

impl QuotaWindow {
    pub fn duration_secs(&self) -> i64 {
        self.kind.duration_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        assert_eq!(WindowKind::FiveHour.duration_secs(), 18000);
        assert_eq!(WindowKind::SevenDay.duration_secs(), 604800);
        assert_eq!(WindowKind::SonnetSevenDay.duration_secs(), 604800);
    }

    #[test]
    fn test_labels() {
        let short: Vec<_> = WindowKind::ALL.iter().map(|k| k.short_label()).collect();
        assert_eq!(short, vec!["5h", "7d", "sn"]);
        assert_eq!(WindowKind::SonnetSevenDay.title(), "7-day Sonnet");
    }

    #[test]
    fn test_missing_window_defaults() {
        let snapshot = UsageSnapshot::default();
        let window = snapshot.window(WindowKind::SevenDay);
        assert_eq!(window.utilization, 0.0);
        assert!(window.resets_at.is_none());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_null_utilization_defaults_to_zero() {
        let snapshot = UsageSnapshot {
            five_hour: Some(UsageWindowRaw {
                utilization: None,
                resets_at: Some("2026-01-01T00:00:00Z".to_string()),
            }),
            ..Default::default()
        };
        let window = snapshot.window(WindowKind::FiveHour);
        assert_eq!(window.utilization, 0.0);
        assert_eq!(window.resets_at.as_deref(), Some("2026-01-01T00:00:00Z"));
        assert!(!snapshot.is_empty());
    }
}
