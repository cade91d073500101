//! `cycle` and `clear-cache` subcommands.

use anyhow::Result;
use tracing::warn;

use quotabar_core::cache::{clear_all, clear_output, CacheStore};
use quotabar_core::config::{Axis, ConfigStore};

use crate::config::{CycleAxis, CycleDirection, Settings};

/// Run `cycle <axis> [direction]` and return the line to print.
///
/// Changing the persisted config drops the output cache; the fetch cache
/// stays warm.
pub fn cycle<C: CacheStore>(
    axis: CycleAxis,
    direction: Option<CycleDirection>,
    settings: &Settings,
    store: &ConfigStore,
    cache: &C,
) -> Result<String> {
    let axis = match axis {
        CycleAxis::Style => Axis::Style,
        CycleAxis::Display => Axis::Display,
        CycleAxis::Width => Axis::Width,
        CycleAxis::Reset => {
            store.reset()?;
            invalidate_output(cache);
            return Ok(format!("reset: {}", store.resolve(settings.env_render)));
        }
        CycleAxis::Status => return Ok(status(settings, store)),
    };

    let direction = direction.unwrap_or_default().into();
    let value = store.cycle(axis, direction, settings.env_render)?;
    invalidate_output(cache);
    Ok(format!("{}: {}", axis.key(), value))
}

/// Current effective values, one per line
pub fn status(settings: &Settings, store: &ConfigStore) -> String {
    format!(
        "style: {}\ndisplay: {}\nwidth: {}\nconfig: {}",
        settings.render.style,
        settings.render.display,
        settings.render.bar_width,
        store.path().display()
    )
}

/// Remove every cache tier
pub fn clear_cache<C: CacheStore>(cache: &C) -> Result<String> {
    clear_all(cache)?;
    Ok("cache cleared".to_string())
}

fn invalidate_output<C: CacheStore>(cache: &C) {
    if let Err(e) = clear_output(cache) {
        warn!("Failed to clear output cache: {:#}", e);
    }
}
