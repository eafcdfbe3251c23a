//! Persistent cache for Scryfall search results and scraped detail pages
//!
//! Entries are JSON files in the cache directory, named after a slug of the
//! request (query string or page URL). An entry is fresh while its file is
//! younger than the TTL. Stale entries stay on disk until overwritten.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Default freshness window for cached responses
pub const DEFAULT_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Persistent cache of Scryfall responses keyed by request slug
pub struct QueryCache {
    cache_dir: PathBuf,
    ttl: Duration,
}

impl QueryCache {
    /// Create a cache rooted at `cache_dir`. The directory is created on the
    /// first write.
    pub fn new(cache_dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ttl,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Full path of the entry stored under `key`
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Get a fresh entry, or `None` if it is absent, stale or unreadable
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, SystemTime::now())
    }

    /// Same as [`get`](Self::get) with an explicit "now"
    pub fn get_at<T: DeserializeOwned>(&self, key: &str, now: SystemTime) -> Option<T> {
        let path = self.entry_path(key);
        let written = std::fs::metadata(&path).and_then(|m| m.modified()).ok()?;

        if !is_fresh(written, now, self.ttl) {
            log::debug!("Cache entry {} is stale", path.display());
            return None;
        }

        let json = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&json) {
            Ok(value) => {
                log::debug!("Cache hit for {}", key);
                Some(value)
            }
            Err(e) => {
                log::warn!("Failed to parse cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Store an entry, creating the cache directory if needed
    pub fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.cache_dir)?;
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(self.entry_path(key), json)?;
        log::debug!("Cached {}", key);
        Ok(())
    }

    /// Delete every other entry whose file name starts with `key`.
    ///
    /// Returns the number of files removed. A missing cache directory is not
    /// an error.
    pub fn invalidate_siblings(&self, key: &str) -> usize {
        let current = format!("{}.json", key);
        let entries = match std::fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(_) => return 0,
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if !file_name.starts_with(key) || file_name == current {
                continue;
            }
            let path = entry.path();
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    log::info!("Deleted old cache file: {}", path.display());
                    removed += 1;
                }
                Err(e) => log::warn!("Failed to delete cache file {}: {}", path.display(), e),
            }
        }
        removed
    }
}

/// An entry written at `written` is fresh at `now` iff its age is below `ttl`.
/// Timestamps in the future count as fresh.
pub fn is_fresh(written: SystemTime, now: SystemTime, ttl: Duration) -> bool {
    match now.duration_since(written) {
        Ok(age) => age < ttl,
        Err(_) => true,
    }
}

/// Turn a request (query string or URL) into a file-name-safe cache key.
///
/// Lower-cases, drops a leading `http://`/`https://` and collapses every run
/// of characters outside `[a-z0-9_-]` into a single `_`.
pub fn slugify(request: &str) -> String {
    let lowered = request.to_lowercase();
    let stripped = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);

    let mut slug = String::with_capacity(stripped.len());
    let mut in_run = false;
    for c in stripped.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' {
            slug.push(c);
            in_run = false;
        } else if !in_run {
            slug.push('_');
            in_run = true;
        }
    }
    slug
}
