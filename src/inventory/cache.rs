//! Scan memoization
//!
//! Scans are cached by root and a watermark describing the state of the
//! source (directory mtime or map content hash). The cache is owned by the
//! caller; nothing here is process-global.

use super::{DocumentRecord, RemoteMap};
use crate::config::Config;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use tracing::debug;

/// State of a scan source at the time of the scan
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Watermark {
    /// Modification time of a directory root
    Modified(SystemTime),
    /// Content hash of a remote map
    Content(String),
    /// Source state could not be read
    Unknown,
}

impl Watermark {
    /// Watermark for a directory root
    pub fn of_dir(root: &Path) -> Self {
        std::fs::metadata(root)
            .and_then(|m| m.modified())
            .map(Watermark::Modified)
            .unwrap_or(Watermark::Unknown)
    }

    /// Watermark for a remote map: the SHA-256 of its contents
    pub fn of_map(map: &RemoteMap) -> Self {
        Watermark::Content(map.content_hash().to_string())
    }
}

/// Cache key: source root and its watermark
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Directory root or map file path
    pub root: PathBuf,
    /// Source state the records were built from
    pub watermark: Watermark,
}

impl CacheKey {
    /// Key from an explicit root and watermark
    pub fn new(root: impl Into<PathBuf>, watermark: Watermark) -> Self {
        Self {
            root: root.into(),
            watermark,
        }
    }

    /// Key for a local directory in its current state
    pub fn for_dir(root: &Path) -> Self {
        Self::new(root, Watermark::of_dir(root))
    }

    /// Key for a remote map file with the given contents
    pub fn for_map(path: &Path, map: &RemoteMap) -> Self {
        Self::new(path, Watermark::of_map(map))
    }
}

struct CachedScan {
    records: Vec<DocumentRecord>,
    stored_at: Instant,
}

/// Time-bounded cache of scan results
pub struct ScanCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CachedScan>,
}

impl ScanCache {
    /// Create a cache whose entries expire after `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Create a cache using the configured lifetime
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_ttl())
    }

    /// Lifetime of an entry
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached records for `key`, or the result of `scan` stored under `key`
    pub fn get_or_insert_with<F>(&mut self, key: CacheKey, scan: F) -> &[DocumentRecord]
    where
        F: FnOnce() -> Vec<DocumentRecord>,
    {
        let ttl = self.ttl;
        let fresh = self
            .entries
            .get(&key)
            .is_some_and(|cached| cached.stored_at.elapsed() < ttl);

        if !fresh {
            debug!("Scan cache miss for {:?}", key.root);
            let records = scan();
            self.entries.insert(
                key.clone(),
                CachedScan {
                    records,
                    stored_at: Instant::now(),
                },
            );
        }

        self.entries
            .get(&key)
            .map(|cached| cached.records.as_slice())
            .unwrap_or(&[])
    }

    /// Drop every entry for a root, whatever its watermark
    pub fn invalidate(&mut self, root: &Path) {
        self.entries.retain(|key, _| key.root != root);
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached scans, including expired ones not yet replaced
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
