//! Position math for a rolling quota window.
//!
//! Turns a [`QuotaWindow`] and "now" into a fill percentage, the share of
//! the window already elapsed, and a compact time-until-reset label. Bad or
//! missing reset instants never fail; they fall back to `time = 0` and
//! [`REMAINING_UNKNOWN`].

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::usage::QuotaWindow;

/// Label shown when the reset instant is missing or unparsable
pub const REMAINING_UNKNOWN: &str = "--";

/// Derived display state for one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowProgress {
    /// Percentage consumed, 0-100
    pub fill: u8,
    /// Percentage of the window duration elapsed, 0-100
    pub time: u8,
    /// Time until reset ("now", "42m", "3h", "5d" or "--")
    pub remaining: String,
}

/// Compute progress for a window at `now`
pub fn compute(window: &QuotaWindow, now: DateTime<Utc>) -> WindowProgress {
    let fill = fill_percent(window.utilization);

    let Some(reset) = window.resets_at.as_deref().and_then(parse_reset) else {
        return WindowProgress {
            fill,
            time: 0,
            remaining: REMAINING_UNKNOWN.to_string(),
        };
    };

    let secs_until = (reset - now).num_seconds();
    WindowProgress {
        fill,
        time: time_percent(window.duration_secs(), secs_until),
        remaining: remaining_label(secs_until),
    }
}

/// `floor(utilization)` clamped to 0-100; NaN counts as 0
pub fn fill_percent(utilization: f64) -> u8 {
    if utilization.is_nan() {
        return 0;
    }
    utilization.floor().clamp(0.0, 100.0) as u8
}

/// Elapsed share of a window given seconds until its reset
pub fn time_percent(duration_secs: i64, secs_until_reset: i64) -> u8 {
    if duration_secs <= 0 {
        return 0;
    }
    let elapsed = duration_secs.saturating_sub(secs_until_reset);
    (elapsed.saturating_mul(100) / duration_secs).clamp(0, 100) as u8
}

/// Bucket seconds-until-reset into one truncated unit
pub fn remaining_label(secs: i64) -> String {
    if secs < 0 {
        "now".to_string()
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86400)
    }
}

/// Parse an RFC 3339 instant; a zone-less timestamp is taken as UTC
fn parse_reset(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
