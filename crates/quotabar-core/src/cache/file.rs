//! File-backed cache: one JSON file per key in a cache directory.

use anyhow::{bail, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{CacheEntry, CacheStore};

/// Cache entries stored as `{dir}/{key}.json`
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default directory (`~/.cache/quotabar`, or the temp dir without a home)
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("quotabar")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for a key. Only alphanumeric, `-` and `_` are allowed.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            bail!("Invalid cache key: '{}'", key);
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        let path = self.path_for(key).ok()?;
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Discarding corrupt cache entry {:?}: {}", path, e);
                None
            }
        }
    }

    /// Writes through a per-process temp file and renames it into place, so
    /// concurrent invocations leave a complete entry from one of them.
    fn put(&self, key: &str, entry: &CacheEntry) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create cache directory: {:?}", self.dir))?;

        let json = serde_json::to_string(entry).context("Failed to serialize cache entry")?;
        let temp_path = self
            .dir
            .join(format!("{}.json.{}.tmp", key, std::process::id()));
        let _ = fs::remove_file(&temp_path);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .with_context(|| format!("Failed to create temp cache file: {:?}", temp_path))?;
        let written = file.write_all(json.as_bytes());
        drop(file);
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e)
                .with_context(|| format!("Failed to write temp cache file: {:?}", temp_path));
        }

        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e).with_context(|| format!("Failed to rename cache file: {:?}", path));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove cache file: {:?}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry() -> CacheEntry {
        CacheEntry::new(
            r#"{"five_hour":null}"#,
            "abc",
            60,
            Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_put_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("cache"));

        assert!(cache.get("fetch").is_none());
        cache.put("fetch", &entry()).unwrap();
        assert_eq!(cache.get("fetch"), Some(entry()));
        assert!(dir.path().join("cache").join("fetch.json").exists());

        cache.remove("fetch").unwrap();
        assert!(cache.get("fetch").is_none());
        // removing twice is fine
        cache.remove("fetch").unwrap();
    }

    #[test]
    fn test_put_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());

        cache.put("output-text", &entry()).unwrap();
        let mut newer = entry();
        newer.payload = "5h[###-----]".to_string();
        cache.put("output-text", &newer).unwrap();

        assert_eq!(cache.get("output-text").unwrap().payload, "5h[###-----]");
        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_corrupt_entry_is_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        fs::write(dir.path().join("fetch.json"), "{ truncated").unwrap();
        assert!(cache.get("fetch").is_none());
    }

    #[test]
    fn test_failed_put_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        // a directory where the entry should go makes the rename fail
        fs::create_dir(dir.path().join("fetch.json")).unwrap();
        fs::write(dir.path().join("fetch.json").join("keep"), "").unwrap();

        assert!(cache.put("fetch", &entry()).is_err());
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["fetch.json".to_string()]);
    }

    #[test]
    fn test_rejects_path_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        assert!(cache.put("../escape", &entry()).is_err());
        assert!(cache.put("a/b", &entry()).is_err());
        assert!(cache.put("", &entry()).is_err());
        assert!(cache.get("../escape").is_none());
    }
}
