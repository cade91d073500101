//! Render driver: config → cache → fetch → windows → bars → cache → output.
//!
//! One pass per invocation. All state that outlives the process lives in
//! the injected [`CacheStore`].

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use quotabar_core::cache::{fingerprint, output_key, CacheEntry, CacheStore, FETCH_KEY};
use quotabar_core::config::{DisplayMode, RenderConfig};
use quotabar_core::render::render_segment;
use quotabar_core::usage::{parse_usage_response, UsageSnapshot, UsageSource, WindowKind};
use quotabar_core::window::{self, WindowProgress, REMAINING_UNKNOWN};
use quotabar_core::UsageError;

use crate::output::{OutputFormat, Rendered, StatusClass};

/// Orchestrates a single render
pub struct Driver<C, S> {
    cache: C,
    source: S,
    render: RenderConfig,
    ttl_secs: u64,
    use_cache: bool,
}

impl<C: CacheStore, S: UsageSource> Driver<C, S> {
    pub fn new(cache: C, source: S, render: RenderConfig, ttl_secs: u64) -> Self {
        Self {
            cache,
            source,
            render,
            ttl_secs,
            use_cache: true,
        }
    }

    /// Enable or bypass both cache tiers
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    /// Produce the output payload for `format`. Never fails: fetch errors
    /// become an `error` placeholder, which is not cached.
    pub fn run(&self, format: OutputFormat, now: DateTime<Utc>) -> String {
        let config_fingerprint = self.render.fingerprint();
        let key = output_key(format.as_str());

        if self.use_cache {
            if let Some(entry) = self.cache.get_fresh(&key, now, &config_fingerprint) {
                debug!("Output cache hit ({})", key);
                return entry.payload;
            }
        }

        let (snapshot, fetched_at) = match self.snapshot(now) {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!("Usage unavailable: {}", e);
                return Rendered::error(&e).emit(format);
            }
        };

        let payload = self.compose(&snapshot, now).emit(format);

        if self.use_cache {
            // aged by the data it shows, so it never outlives the fetch tier
            let entry =
                CacheEntry::new(payload.as_str(), config_fingerprint, self.ttl_secs, fetched_at);
            if let Err(e) = self.cache.put(&key, &entry) {
                warn!("Failed to write output cache: {:#}", e);
            }
        }

        payload
    }

    /// Usage snapshot from the fetch tier, or from the source on a miss,
    /// with the time it was fetched
    fn snapshot(
        &self,
        now: DateTime<Utc>,
    ) -> Result<(UsageSnapshot, DateTime<Utc>), UsageError> {
        let source_fingerprint = fingerprint(self.source.source_id().as_bytes());

        if self.use_cache {
            if let Some(entry) = self.cache.get_fresh(FETCH_KEY, now, &source_fingerprint) {
                match parse_usage_response(&entry.payload) {
                    Ok(snapshot) => {
                        debug!("Fetch cache hit");
                        return Ok((snapshot, entry.computed_at));
                    }
                    Err(e) => debug!("Discarding unusable fetch cache entry: {}", e),
                }
            }
        }

        let body = self.source.fetch()?;
        let snapshot = parse_usage_response(&body)?;

        if self.use_cache {
            let entry = CacheEntry::new(body, source_fingerprint, self.ttl_secs, now);
            if let Err(e) = self.cache.put(FETCH_KEY, &entry) {
                warn!("Failed to write fetch cache: {:#}", e);
            }
        }

        Ok((snapshot, now))
    }

    /// Build bars, tooltip and class from a snapshot
    pub fn compose(&self, snapshot: &UsageSnapshot, now: DateTime<Utc>) -> Rendered {
        if snapshot.is_empty() {
            return Rendered::unknown("Usage response contained no known windows");
        }

        let style = self.render.effective_style();
        let progress = |kind: WindowKind| window::compute(&snapshot.window(kind), now);

        let text = self
            .render
            .display
            .windows()
            .iter()
            // "all" lists what the account reports; single-window modes always show
            .filter(|kind| self.render.display != DisplayMode::All || snapshot.raw(**kind).is_some())
            .map(|kind| render_segment(*kind, &progress(*kind), self.render.bar_width, style))
            .collect::<Vec<_>>()
            .join(" ");

        let tooltip = WindowKind::ALL
            .iter()
            .filter(|kind| snapshot.raw(**kind).is_some())
            .map(|kind| tooltip_line(*kind, &progress(*kind)))
            .collect::<Vec<_>>()
            .join("\n");

        let class = StatusClass::from_fills(&[
            progress(WindowKind::FiveHour).fill,
            progress(WindowKind::SevenDay).fill,
        ]);

        Rendered {
            text,
            tooltip,
            class,
        }
    }
}

/// "5-hour: 45% used, resets in 2h"
fn tooltip_line(kind: WindowKind, progress: &WindowProgress) -> String {
    let reset = match progress.remaining.as_str() {
        REMAINING_UNKNOWN => String::new(),
        "now" => ", resets now".to_string(),
        remaining => format!(", resets in {}", remaining),
    };
    format!("{}: {}% used{}", kind.title(), progress.fill, reset)
}
