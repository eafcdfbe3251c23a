//! Runtime settings and data file locations

use crate::cache::QueryCache;
use crate::fetcher::{Fetcher, DEFAULT_DELAY, SCRYFALL_API};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default format tutors are tracked for
pub const DEFAULT_FORMAT: &str = "commander";

/// Returns the default data directory: ~/.local/share/tutor_index
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tutor_index")
}

/// Cache freshness window for a whole number of hours. Saturates instead of
/// overflowing on absurd values.
pub fn cache_ttl_from_hours(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(3600))
}

/// Locations of every file the pipeline reads or writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scryfall bulk card dump, the known-card universe
    pub fn bulk_cards(&self) -> PathBuf {
        self.root.join("bulk.json")
    }

    /// Scraped related searches per tutor
    pub fn scraped_tutors(&self) -> PathBuf {
        self.root.join("tutorsWithSearches.json")
    }

    /// Hand-curated overrides (optional)
    pub fn overrides(&self) -> PathBuf {
        self.root.join("customTutorSearches.json")
    }

    pub fn merged_tutors(&self) -> PathBuf {
        self.root.join("tutorsWithMergedSearches.json")
    }

    pub fn resolved_tutors(&self) -> PathBuf {
        self.root.join("tutorsWithFetchedRelatedCards.json")
    }

    /// The persisted reverse index
    pub fn reverse_index(&self) -> PathBuf {
        self.root.join("tutoredByMap.json")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }
}

/// Resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub paths: DataPaths,
    pub api_base: String,
    pub delay: Duration,
    pub cache_ttl: Duration,
    pub format: String,
}

impl Settings {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            paths: DataPaths::new(data_dir),
            api_base: SCRYFALL_API.to_string(),
            delay: DEFAULT_DELAY,
            cache_ttl: crate::cache::DEFAULT_TTL,
            format: DEFAULT_FORMAT.to_string(),
        }
    }

    /// A fetcher backed by the data directory's cache
    pub fn fetcher(&self) -> Fetcher {
        let cache = QueryCache::new(self.paths.cache_dir(), self.cache_ttl);
        Fetcher::new(self.api_base.clone(), cache, self.delay)
    }
}
