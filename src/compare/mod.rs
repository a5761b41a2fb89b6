//! Comparison of two document sets
//!
//! This module determines how a document set changed between two versions:
//! - File-level status (NEW, REMOVED, MODIFIED, SAME) keyed by relative path
//! - Text inspection of individual documents on demand
//!
//! Modification is detected by size only. Edits that keep the file size
//! unchanged are reported as SAME.

mod report;

pub use report::{render_csv, render_json, render_text, ReportRow};
pub(crate) use report::csv_field;

use crate::diff::ChangeSummary;
use crate::error::CompareError;
use crate::extract::{extract_text, TextExtractor};
use crate::inventory::path_segments;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Size and modification time of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Full path on disk
    pub path: PathBuf,
    /// Size in bytes, 0 when unreadable
    pub size: u64,
    /// Last modification, or the lookup time when unreadable
    pub modified: DateTime<Local>,
}

/// Status of a file between two versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileStatus {
    /// Only in the current version
    New,
    /// Only in the previous version
    Removed,
    /// In both, with different sizes
    Modified,
    /// In both, with the same size
    Same,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::New => write!(f, "NEW"),
            FileStatus::Removed => write!(f, "REMOVED"),
            FileStatus::Modified => write!(f, "MODIFIED"),
            FileStatus::Same => write!(f, "SAME"),
        }
    }
}

/// One file in a folder comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    /// Relative path, `/`-separated
    pub relative_path: String,
    pub status: FileStatus,
    /// Full path in the previous version
    pub path_v1: Option<PathBuf>,
    /// Full path in the current version
    pub path_v2: Option<PathBuf>,
    /// Size in the previous version, 0 when absent
    pub size_v1: u64,
    /// Size in the current version, 0 when absent
    pub size_v2: u64,
    /// Modification time in the previous version
    pub mtime_v1: Option<DateTime<Local>>,
    /// Modification time in the current version
    pub mtime_v2: Option<DateTime<Local>>,
}

impl ComparisonEntry {
    /// Whether the entry is a PDF worth inspecting for text changes
    pub fn is_inspectable(&self) -> bool {
        matches!(self.status, FileStatus::New | FileStatus::Modified)
            && self.relative_path.to_lowercase().ends_with(".pdf")
    }
}

/// Counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonStats {
    /// Files only in the current version
    pub new: usize,
    /// Files only in the previous version
    pub removed: usize,
    /// Files whose size changed
    pub modified: usize,
    /// Files with the same size in both
    pub same: usize,
}

impl ComparisonStats {
    /// Count entries by status
    pub fn from_entries(entries: &[ComparisonEntry]) -> Self {
        let mut stats = Self::default();
        for entry in entries {
            match entry.status {
                FileStatus::New => stats.new += 1,
                FileStatus::Removed => stats.removed += 1,
                FileStatus::Modified => stats.modified += 1,
                FileStatus::Same => stats.same += 1,
            }
        }
        stats
    }

    /// Number of distinct paths across both versions
    pub fn total(&self) -> usize {
        self.new + self.removed + self.modified + self.same
    }
}

/// A validated comparison request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonRequest {
    /// Two folder versions
    Folders { v1: PathBuf, v2: PathBuf },
    /// Two renditions of a single document
    Documents { v1: PathBuf, v2: PathBuf },
}

impl ComparisonRequest {
    /// Check that both inputs exist and are of the same kind
    pub fn resolve(v1: &Path, v2: &Path) -> Result<Self, CompareError> {
        for path in [v1, v2] {
            if !path.exists() {
                return Err(CompareError::NotFound(path.to_path_buf()));
            }
        }

        match (v1.is_dir(), v2.is_dir()) {
            (true, true) => Ok(Self::Folders {
                v1: v1.to_path_buf(),
                v2: v2.to_path_buf(),
            }),
            (false, false) if v1.is_file() && v2.is_file() => Ok(Self::Documents {
                v1: v1.to_path_buf(),
                v2: v2.to_path_buf(),
            }),
            _ => Err(CompareError::KindMismatch {
                left: v1.to_path_buf(),
                left_kind: kind_of(v1),
                right: v2.to_path_buf(),
                right_kind: kind_of(v2),
            }),
        }
    }
}

fn kind_of(path: &Path) -> &'static str {
    if path.is_dir() {
        "folder"
    } else if path.is_file() {
        "document"
    } else {
        "special file"
    }
}

/// Text of both renditions of a document and what changed between them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentComparison {
    /// Extracted text of the previous version
    pub text_v1: String,
    /// Extracted text of the current version
    pub text_v2: String,
    /// Significant lines removed and added
    pub summary: ChangeSummary,
}

impl DocumentComparison {
    /// Build from already extracted texts
    pub fn from_texts(text_v1: String, text_v2: String) -> Self {
        let summary = ChangeSummary::compute(&text_v1, &text_v2);
        Self {
            text_v1,
            text_v2,
            summary,
        }
    }
}

/// Map every file under `dir` by its `/`-separated relative path.
///
/// A missing directory yields an empty map. Files whose metadata cannot be
/// read are kept with size 0 and the current time.
pub fn get_file_info(dir: &Path) -> BTreeMap<String, FileInfo> {
    let mut files = BTreeMap::new();
    if !dir.exists() {
        return files;
    }

    for entry in walkdir::WalkDir::new(dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {:?}: {}", dir, e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(dir) else {
            continue;
        };

        let (size, modified) = size_and_mtime(entry.metadata(), entry.path(), Local::now());

        files.insert(
            path_segments(rel).join("/"),
            FileInfo {
                path: entry.path().to_path_buf(),
                size,
                modified,
            },
        );
    }

    files
}

/// Size and modification time from a metadata lookup.
///
/// An unreadable file keeps its place in the comparison with size 0 and `now`.
fn size_and_mtime<E: Display>(
    metadata: Result<Metadata, E>,
    path: &Path,
    now: DateTime<Local>,
) -> (u64, DateTime<Local>) {
    match metadata {
        Ok(meta) => (
            meta.len(),
            meta.modified().map(DateTime::from).unwrap_or(now),
        ),
        Err(e) => {
            warn!("Failed to stat {:?}: {}", path, e);
            (0, now)
        }
    }
}

/// Compare two file maps; one entry per path in either map, ordered by path
pub fn compare_file_maps(
    v1: &BTreeMap<String, FileInfo>,
    v2: &BTreeMap<String, FileInfo>,
) -> Vec<ComparisonEntry> {
    let keys: BTreeSet<&String> = v1.keys().chain(v2.keys()).collect();

    keys.into_iter()
        .map(|key| {
            let a = v1.get(key);
            let b = v2.get(key);

            let status = match (a, b) {
                (Some(a), Some(b)) if a.size != b.size => FileStatus::Modified,
                (Some(_), Some(_)) => FileStatus::Same,
                (None, Some(_)) => FileStatus::New,
                _ => FileStatus::Removed,
            };

            ComparisonEntry {
                relative_path: key.clone(),
                status,
                path_v1: a.map(|f| f.path.clone()),
                path_v2: b.map(|f| f.path.clone()),
                size_v1: a.map_or(0, |f| f.size),
                size_v2: b.map_or(0, |f| f.size),
                mtime_v1: a.map(|f| f.modified),
                mtime_v2: b.map(|f| f.modified),
            }
        })
        .collect()
}

/// Compare two folder versions by relative path and size
pub fn compare_folders(dir_v1: &Path, dir_v2: &Path) -> Vec<ComparisonEntry> {
    let v1 = get_file_info(dir_v1);
    let v2 = get_file_info(dir_v2);
    debug!("Comparing {} files against {} files", v1.len(), v2.len());

    let entries = compare_file_maps(&v1, &v2);
    let stats = ComparisonStats::from_entries(&entries);
    info!(
        "Compared {:?} and {:?}: {} new, {} removed, {} modified, {} same",
        dir_v1, dir_v2, stats.new, stats.removed, stats.modified, stats.same
    );
    entries
}

/// Entries worth inspecting for text changes
pub fn inspectable(entries: &[ComparisonEntry]) -> Vec<&ComparisonEntry> {
    entries.iter().filter(|e| e.is_inspectable()).collect()
}

/// Extract and compare the text of two document renditions
pub fn compare_documents(
    extractor: &dyn TextExtractor,
    v1: &Path,
    v2: &Path,
    max_pages: Option<usize>,
) -> DocumentComparison {
    DocumentComparison::from_texts(
        extract_text(extractor, v1, max_pages),
        extract_text(extractor, v2, max_pages),
    )
}

/// Explain the text changes behind one folder comparison entry.
///
/// A side missing from its version contributes empty text.
pub fn inspect_entry(
    extractor: &dyn TextExtractor,
    entry: &ComparisonEntry,
    max_pages: Option<usize>,
) -> DocumentComparison {
    let text_of = |path: &Option<PathBuf>| match path {
        Some(p) if p.exists() => extract_text(extractor, p, max_pages),
        _ => String::new(),
    };
    DocumentComparison::from_texts(text_of(&entry.path_v1), text_of(&entry.path_v2))
}
