//! Document inventory
//!
//! This module turns a document tree into annotated records:
//! - Walking a local directory or consuming a remote mirror map
//! - Interpreting `project/YYYYMMDD/owner/` path segments
//! - Deriving version, base name and classification per document
//! - Merging review annotations from the external store

mod annotation;
mod cache;
mod remote;

pub use annotation::{AnnotationEntry, AnnotationStore, JsonAnnotationStore, ReviewStatus};
pub use cache::{CacheKey, ScanCache, Watermark};
pub use remote::RemoteMap;

use crate::classify::{categorize, subcategorize, Category};
use crate::naming::{
    extension_of, extract_base_name, extract_version, validate_date_folder, version_number,
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;
use std::fs::Metadata;
use std::path::{Component, Path};
use tracing::{debug, info, warn};

/// Project assigned to documents outside a project folder
pub const DEFAULT_PROJECT: &str = "General";

/// Owner assigned when the path carries no owner folder
pub const DEFAULT_OWNER: &str = "Unknown";

/// Compute a stable hash for content
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// One document observed in a scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Relative path, `/`-separated, unique within a scan
    pub id: String,
    /// First path segment, or the default project for top-level files
    pub project: String,
    /// Validated date folder (`YYYY-MM-DD`)
    pub date_folder: Option<String>,
    /// Date folder, or the scan date when there is none
    pub date: String,
    /// Owner folder below the date folder, or the default owner
    pub owner: String,
    /// Final path segment
    pub file_name: String,
    /// Uppercased extension
    pub extension: String,
    /// Local path, or the relative key for remote documents
    pub full_path: String,
    /// Viewing link in the remote mirror
    pub remote_link: Option<String>,
    /// Creation time; `None` for remote documents
    pub created: Option<DateTime<Local>>,
    /// Modification time, or the scan time for remote documents
    pub modified: DateTime<Local>,
    /// Version tag such as `V2`
    pub version: String,
    /// Numeric part of `version`, used to rank revisions
    pub version_number: u64,
    /// File name without extension and revision suffix
    pub base_name: String,
    pub category: Category,
    /// Structural element label, `GENERAL` when none applies
    pub subcategory: String,
    /// Review workflow state from the annotation store
    pub status: ReviewStatus,
    pub reviewed: bool,
    /// Free-text reviewer notes
    pub notes: String,
    /// Free-text document description
    pub description: String,
}

/// Positional interpretation of the folders above a document
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathLayout {
    project: String,
    date_folder: Option<String>,
    owner: String,
}

/// A document found by a walk, before classification and annotation
#[derive(Debug, Clone)]
struct RawDocument {
    id: String,
    layout: PathLayout,
    file_name: String,
    full_path: String,
    created: Option<DateTime<Local>>,
    modified: DateTime<Local>,
}

/// Builds annotated inventories from local trees or remote maps
pub struct InventoryBuilder<'a> {
    allowed_extensions: Vec<String>,
    default_project: String,
    default_owner: String,
    annotations: &'a dyn AnnotationStore,
    links: Option<&'a RemoteMap>,
    scan_time: DateTime<Local>,
}

impl<'a> InventoryBuilder<'a> {
    /// Create a builder reading annotations from `annotations`
    pub fn new(annotations: &'a dyn AnnotationStore) -> Self {
        Self {
            allowed_extensions: crate::config::default_allowed_extensions(),
            default_project: DEFAULT_PROJECT.to_string(),
            default_owner: DEFAULT_OWNER.to_string(),
            annotations,
            links: None,
            scan_time: Local::now(),
        }
    }

    /// Restrict documents to these extensions (case-insensitive, no dot)
    pub fn with_extensions(mut self, extensions: &[String]) -> Self {
        self.allowed_extensions = extensions.iter().map(|e| e.to_uppercase()).collect();
        self
    }

    /// Project and owner used when the path does not provide them
    pub fn with_defaults(mut self, project: &str, owner: &str) -> Self {
        self.default_project = project.to_string();
        self.default_owner = owner.to_string();
        self
    }

    /// Attach remote links to records by file name
    pub fn with_remote_links(mut self, links: &'a RemoteMap) -> Self {
        self.links = Some(links);
        self
    }

    /// Fix the time used for date and metadata fallbacks
    pub fn with_scan_time(mut self, scan_time: DateTime<Local>) -> Self {
        self.scan_time = scan_time;
        self
    }

    /// Walk a local directory tree. Unreadable entries are skipped or defaulted.
    pub fn scan_directory(&self, root: &Path) -> Vec<DocumentRecord> {
        if !root.is_dir() {
            warn!("Inventory root {:?} is not a directory", root);
            return Vec::new();
        }

        let mut raw = Vec::new();

        for entry in walkdir::WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !e.file_name().to_str().unwrap_or("").starts_with('.')
            })
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {:?}: {}", root, e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            if !self.is_allowed(&file_name) {
                continue;
            }

            let Ok(rel_path) = entry.path().strip_prefix(root) else {
                continue;
            };
            let segments = path_segments(rel_path);
            let dirs = &segments[..segments.len().saturating_sub(1)];

            let (created, modified) = file_times(entry.metadata(), entry.path(), self.scan_time);

            raw.push(RawDocument {
                id: segments.join("/"),
                layout: self.interpret(dirs),
                file_name,
                full_path: entry.path().to_string_lossy().to_string(),
                created,
                modified,
            });
        }

        info!("Scanned {} documents under {:?}", raw.len(), root);
        self.finish(raw)
    }

    /// Build an inventory from a remote mirror map instead of a local tree
    pub fn scan_remote(&self, map: &RemoteMap) -> Vec<DocumentRecord> {
        let mut records = Vec::new();

        for (rel_key, link) in map.iter() {
            let segments: Vec<String> = rel_key
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            let Some(file_name) = segments.last().cloned() else {
                continue;
            };
            if !self.is_allowed(&file_name) {
                debug!("Skipping remote entry {}", rel_key);
                continue;
            }

            let dirs = &segments[..segments.len() - 1];
            let mut record = self.annotate(RawDocument {
                id: rel_key.to_string(),
                layout: self.interpret(dirs),
                file_name,
                full_path: rel_key.to_string(),
                created: None,
                modified: self.scan_time,
            });
            // Remote entries carry their own link
            if !link.is_empty() {
                record.remote_link = Some(link.to_string());
            }
            records.push(record);
        }

        records.sort_by(|a, b| a.id.cmp(&b.id));
        info!("Loaded {} documents from remote map", records.len());
        records
    }

    fn is_allowed(&self, file_name: &str) -> bool {
        let ext = extension_of(file_name);
        !ext.is_empty() && self.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext))
    }

    fn interpret(&self, dirs: &[String]) -> PathLayout {
        let project = dirs
            .first()
            .cloned()
            .unwrap_or_else(|| self.default_project.clone());

        let mut date_folder = None;
        let mut owner = self.default_owner.clone();

        // Owner folders only exist below a date-shaped folder
        if let Some(segment) = dirs.get(1) {
            if segment.len() == 8 && segment.chars().all(|c| c.is_ascii_digit()) {
                date_folder = validate_date_folder(segment);
                if let Some(name) = dirs.get(2) {
                    owner = name.clone();
                }
            }
        }

        PathLayout {
            project,
            date_folder,
            owner,
        }
    }

    fn finish(&self, raw: Vec<RawDocument>) -> Vec<DocumentRecord> {
        let mut records: Vec<DocumentRecord> = raw.into_iter().map(|r| self.annotate(r)).collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    fn annotate(&self, raw: RawDocument) -> DocumentRecord {
        let annotation = self.annotations.get(&raw.id);

        // Path context is the relative id so the scan root never influences the category
        let category = categorize(&raw.file_name, &raw.id, &annotation.description);
        let subcategory = subcategorize(&raw.file_name, category);
        let version = extract_version(&raw.file_name);
        let remote_link = self
            .links
            .and_then(|links| links.find_link(&raw.file_name))
            .map(str::to_string);
        let date = raw
            .layout
            .date_folder
            .clone()
            .unwrap_or_else(|| self.scan_time.format("%Y-%m-%d").to_string());

        DocumentRecord {
            version_number: version_number(&version),
            base_name: extract_base_name(&raw.file_name),
            extension: extension_of(&raw.file_name),
            id: raw.id,
            project: raw.layout.project,
            date_folder: raw.layout.date_folder,
            date,
            owner: raw.layout.owner,
            file_name: raw.file_name,
            full_path: raw.full_path,
            remote_link,
            created: raw.created,
            modified: raw.modified,
            version,
            category,
            subcategory,
            status: annotation.status,
            reviewed: annotation.reviewed,
            notes: annotation.notes,
            description: annotation.description,
        }
    }
}

/// Creation and modification times from a metadata lookup.
///
/// An unreadable file is still inventoried, stamped with `scan_time`.
fn file_times<E: Display>(
    metadata: Result<Metadata, E>,
    path: &Path,
    scan_time: DateTime<Local>,
) -> (Option<DateTime<Local>>, DateTime<Local>) {
    match metadata {
        Ok(meta) => (
            Some(meta.created().map(DateTime::from).unwrap_or(scan_time)),
            meta.modified().map(DateTime::from).unwrap_or(scan_time),
        ),
        Err(e) => {
            warn!("Failed to read metadata for {:?}: {}", path, e);
            (Some(scan_time), scan_time)
        }
    }
}

/// Normal path components as strings
pub(crate) fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect()
}

/// Latest revision of each logical document.
///
/// Records are grouped by project and base name; the highest version number
/// wins and ties keep the earlier record. Output is ordered by project, then
/// base name.
pub fn latest_versions(records: &[DocumentRecord]) -> Vec<&DocumentRecord> {
    let mut latest: BTreeMap<(&str, &str), &DocumentRecord> = BTreeMap::new();

    for record in records {
        let key = (record.project.as_str(), record.base_name.as_str());
        match latest.get(&key) {
            Some(current) if current.version_number >= record.version_number => {}
            _ => {
                latest.insert(key, record);
            }
        }
    }

    latest.into_values().collect()
}

/// Criteria for narrowing an inventory
#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    pub project: Option<String>,
    pub category: Option<Category>,
    pub status: Option<ReviewStatus>,
}

impl InventoryFilter {
    /// Check whether a record passes every criterion that is set
    pub fn matches(&self, record: &DocumentRecord) -> bool {
        self.project.as_ref().map_or(true, |p| &record.project == p)
            && self.category.map_or(true, |c| record.category == c)
            && self.status.map_or(true, |s| record.status == s)
    }
}

/// Counts over an inventory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    /// Number of records
    pub total: usize,
    /// Records per category
    pub by_category: BTreeMap<Category, usize>,
    /// Records per review status
    pub by_status: BTreeMap<ReviewStatus, usize>,
    /// Number of distinct projects
    pub projects: usize,
}

impl InventorySummary {
    /// Tally a set of records
    pub fn from_records<'r>(records: impl IntoIterator<Item = &'r DocumentRecord>) -> Self {
        let mut summary = Self::default();
        let mut projects: HashSet<&str> = HashSet::new();

        for record in records {
            summary.total += 1;
            *summary.by_category.entry(record.category).or_insert(0) += 1;
            *summary.by_status.entry(record.status).or_insert(0) += 1;
            projects.insert(record.project.as_str());
        }

        summary.projects = projects.len();
        summary
    }
}
