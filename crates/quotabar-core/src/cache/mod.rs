//! Two cache tiers sharing one freshness rule.
//!
//! - the **fetch** tier holds the raw endpoint body, fingerprinted by the
//!   upstream identity so config changes never force a refetch;
//! - the **output** tier holds the final rendered payload per output
//!   format, fingerprinted by the active [`RenderConfig`](crate::config::RenderConfig).
//!
//! An entry is served only while `0 <= now - computed_at < ttl` and its
//! fingerprint matches. Each key is a single slot that is overwritten on
//! refresh; there is no eviction.

mod file;
mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Key of the raw fetch tier
pub const FETCH_KEY: &str = "fetch";

/// Prefix of output tier keys (`output-text`, `output-json`)
pub const OUTPUT_KEY_PREFIX: &str = "output-";

/// Output tier key for a format name
pub fn output_key(format: &str) -> String {
    format!("{}{}", OUTPUT_KEY_PREFIX, format)
}

/// Known output tier keys, for invalidation
pub const OUTPUT_KEYS: [&str; 2] = ["output-text", "output-json"];

/// SHA-256 hex digest used as a cache fingerprint
pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// One cached value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub computed_at: DateTime<Utc>,
    pub ttl_secs: u64,
    pub fingerprint: String,
    pub payload: String,
}

impl CacheEntry {
    pub fn new(
        payload: impl Into<String>,
        fingerprint: impl Into<String>,
        ttl_secs: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            computed_at: now,
            ttl_secs,
            fingerprint: fingerprint.into(),
            payload: payload.into(),
        }
    }

    /// Whether this entry may be served at `now` for `fingerprint`.
    ///
    /// An entry stamped after `now` (clock stepped back) is stale.
    pub fn is_fresh(&self, now: DateTime<Utc>, fingerprint: &str) -> bool {
        let age = (now - self.computed_at).num_seconds();
        let ttl = i64::try_from(self.ttl_secs).unwrap_or(i64::MAX);
        (0..ttl).contains(&age) && self.fingerprint == fingerprint
    }
}

/// Key-value storage for cache entries
pub trait CacheStore {
    /// Stored entry for `key`, fresh or not
    fn get(&self, key: &str) -> Option<CacheEntry>;

    /// Store (overwrite) the entry for `key`
    fn put(&self, key: &str, entry: &CacheEntry) -> Result<()>;

    /// Remove the entry for `key`; a missing entry is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// Entry for `key` only if it is fresh for `fingerprint`
    fn get_fresh(&self, key: &str, now: DateTime<Utc>, fingerprint: &str) -> Option<CacheEntry> {
        self.get(key).filter(|entry| entry.is_fresh(now, fingerprint))
    }
}

impl<C: CacheStore + ?Sized> CacheStore for &C {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        (**self).get(key)
    }

    fn put(&self, key: &str, entry: &CacheEntry) -> Result<()> {
        (**self).put(key, entry)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Drop rendered output so the next render recomputes it
pub fn clear_output<C: CacheStore + ?Sized>(cache: &C) -> Result<()> {
    for key in OUTPUT_KEYS {
        cache.remove(key)?;
    }
    Ok(())
}

/// Drop every tier, forcing a refetch and rerender
pub fn clear_all<C: CacheStore + ?Sized>(cache: &C) -> Result<()> {
    cache.remove(FETCH_KEY)?;
    clear_output(cache)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_fresh_within_ttl() {
        let entry = CacheEntry::new("x", "fp", 60, t0());
        assert!(entry.is_fresh(t0(), "fp"));
        assert!(entry.is_fresh(t0() + Duration::seconds(59), "fp"));
        assert!(!entry.is_fresh(t0() + Duration::seconds(60), "fp"));
    }

    #[test]
    fn test_future_entry_is_stale() {
        let entry = CacheEntry::new("x", "fp", 60, t0() + Duration::days(1));
        assert!(!entry.is_fresh(t0(), "fp"));

        let entry = CacheEntry::new("x", "fp", 60, t0() + Duration::seconds(5));
        assert!(!entry.is_fresh(t0(), "fp"));
        assert!(entry.is_fresh(t0() + Duration::seconds(5), "fp"));
    }

    #[test]
    fn test_fingerprint_mismatch_is_stale() {
        let entry = CacheEntry::new("x", "fp", 60, t0());
        assert!(!entry.is_fresh(t0(), "other"));
    }

    #[test]
    fn test_zero_ttl_never_fresh() {
        let entry = CacheEntry::new("x", "fp", 0, t0());
        assert!(!entry.is_fresh(t0(), "fp"));
    }

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let a = fingerprint(b"style=unicode");
        assert_eq!(a.len(), 64);
        assert_eq!(a, fingerprint(b"style=unicode"));
        assert_ne!(a, fingerprint(b"style=ascii"));
    }

    #[test]
    fn test_clear_output_keeps_fetch_tier() {
        let cache = MemoryCache::new();
        let entry = CacheEntry::new("x", "fp", 60, t0());
        cache.put(FETCH_KEY, &entry).unwrap();
        cache.put(&output_key("text"), &entry).unwrap();
        cache.put(&output_key("json"), &entry).unwrap();

        clear_output(&cache).unwrap();
        assert!(cache.get(FETCH_KEY).is_some());
        assert!(cache.get("output-text").is_none());
        assert!(cache.get("output-json").is_none());

        clear_all(&cache).unwrap();
        assert!(cache.get(FETCH_KEY).is_none());
    }

    #[test]
    fn test_get_fresh_through_reference() {
        let cache = MemoryCache::new();
        let by_ref = &cache;
        by_ref
            .put("k", &CacheEntry::new("v", "fp", 10, t0()))
            .unwrap();
        assert!(by_ref.get_fresh("k", t0(), "fp").is_some());
        assert!(by_ref.get_fresh("k", t0() + Duration::seconds(10), "fp").is_none());
    }
}
