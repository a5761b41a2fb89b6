//! Review annotations attached to documents
//!
//! Annotations live in an external key-value store keyed by document id.
//! The inventory only reads a snapshot of that store.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Review status of a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReviewStatus {
    /// Not reviewed yet
    #[default]
    #[serde(alias = "Pendiente")]
    Pending,
    /// Under review
    #[serde(alias = "En Revisión", alias = "En Revision")]
    InReview,
    /// Approved
    #[serde(alias = "Aprobado")]
    Approved,
    /// Rejected
    #[serde(alias = "Rechazado")]
    Rejected,
    /// Superseded
    #[serde(alias = "Obsoleto")]
    Obsolete,
}

impl ReviewStatus {
    /// Every status in workflow order
    pub const ALL: [ReviewStatus; 5] = [
        ReviewStatus::Pending,
        ReviewStatus::InReview,
        ReviewStatus::Approved,
        ReviewStatus::Rejected,
        ReviewStatus::Obsolete,
    ];
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewStatus::Pending => write!(f, "Pending"),
            ReviewStatus::InReview => write!(f, "InReview"),
            ReviewStatus::Approved => write!(f, "Approved"),
            ReviewStatus::Rejected => write!(f, "Rejected"),
            ReviewStatus::Obsolete => write!(f, "Obsolete"),
        }
    }
}

impl std::str::FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '_', '-'], "");
        ReviewStatus::ALL
            .into_iter()
            .find(|status| status.to_string().to_lowercase() == wanted)
            .ok_or_else(|| format!("Unknown status: {}", s))
    }
}

/// Review metadata for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationEntry {
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub reviewed: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub description: String,
}

/// Stored shape of an annotation: older stores kept a bare note string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StoredAnnotation {
    Entry(AnnotationEntry),
    LegacyNote(String),
}

impl From<StoredAnnotation> for AnnotationEntry {
    fn from(stored: StoredAnnotation) -> Self {
        match stored {
            StoredAnnotation::Entry(entry) => entry,
            StoredAnnotation::LegacyNote(notes) => AnnotationEntry {
                notes,
                ..Default::default()
            },
        }
    }
}

fn parse_entry(id: &str, value: Value) -> AnnotationEntry {
    match serde_json::from_value::<StoredAnnotation>(value.clone()) {
        Ok(stored) => stored.into(),
        Err(e) => {
            warn!("Malformed annotation for {}: {}", id, e);
            salvage_entry(&value)
        }
    }
}

/// Keep the well-typed fields of a malformed entry
fn salvage_entry(value: &Value) -> AnnotationEntry {
    fn field<T: serde::de::DeserializeOwned>(value: &Value, name: &str) -> Option<T> {
        value
            .get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    AnnotationEntry {
        status: field(value, "status").unwrap_or_default(),
        reviewed: field(value, "reviewed").unwrap_or_default(),
        notes: field(value, "notes").unwrap_or_default(),
        description: field(value, "description").unwrap_or_default(),
    }
}

/// Read access to the annotation store
pub trait AnnotationStore {
    /// Annotation for a document id, defaults when absent
    fn get(&self, id: &str) -> AnnotationEntry;
}

/// Snapshot of a JSON annotation file (`{"<id>": entry | "note"}`)
#[derive(Debug, Clone, Default)]
pub struct JsonAnnotationStore {
    entries: HashMap<String, AnnotationEntry>,
}

impl JsonAnnotationStore {
    /// Load the store from disk. A missing or unreadable file is an empty store.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!("No annotation store at {:?}", path);
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read annotation store {:?}: {}", path, e);
                return Self::default();
            }
        };

        match Self::from_json(&content) {
            Ok(store) => store,
            Err(e) => {
                warn!("Failed to parse annotation store {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Parse a store from JSON text, normalizing legacy entries.
    ///
    /// Only a document that is not a JSON object fails. Each malformed entry
    /// keeps whichever of its fields are valid and defaults the rest.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        let raw: HashMap<String, Value> = serde_json::from_str(content)?;
        let entries = raw
            .into_iter()
            .map(|(id, value)| {
                let entry = parse_entry(&id, value);
                (id, entry)
            })
            .collect();
        Ok(Self { entries })
    }

    /// Number of annotated documents
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AnnotationStore for JsonAnnotationStore {
    fn get(&self, id: &str) -> AnnotationEntry {
        self.entries.get(id).cloned().unwrap_or_default()
    }
}

impl AnnotationStore for HashMap<String, AnnotationEntry> {
    fn get(&self, id: &str) -> AnnotationEntry {
        HashMap::get(self, id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_note_migration() {
        let store = JsonAnnotationStore::from_json(
            r#"{
                "A/plano.pdf": "revisar cotas",
                "A/losa.pdf": {"status": "Aprobado", "reviewed": true, "notes": "ok"}
            }"#,
        )
        .unwrap();

        let legacy = store.get("A/plano.pdf");
        assert_eq!(legacy.notes, "revisar cotas");
        assert_eq!(legacy.status, ReviewStatus::Pending);
        assert!(!legacy.reviewed);

        let entry = store.get("A/losa.pdf");
        assert_eq!(entry.status, ReviewStatus::Approved);
        assert!(entry.reviewed);
        assert_eq!(entry.description, "");
    }

    #[test]
    fn test_malformed_entry_keeps_the_rest() {
        let store = JsonAnnotationStore::from_json(
            r#"{
                "A/plano.pdf": {"status": "Aprobado", "notes": "ok"},
                "A/losa.pdf": {"status": null},
                "A/viga.pdf": {"status": "Desconocido", "notes": "ver cotas", "reviewed": true},
                "A/zapata.pdf": 42
            }"#,
        )
        .unwrap();

        assert_eq!(store.len(), 4);
        assert_eq!(store.get("A/plano.pdf").status, ReviewStatus::Approved);
        assert_eq!(store.get("A/plano.pdf").notes, "ok");
        assert_eq!(store.get("A/losa.pdf"), AnnotationEntry::default());

        let viga = store.get("A/viga.pdf");
        assert_eq!(viga.status, ReviewStatus::Pending);
        assert_eq!(viga.notes, "ver cotas");
        assert!(viga.reviewed);

        assert_eq!(store.get("A/zapata.pdf"), AnnotationEntry::default());
    }

    #[test]
    fn test_load_with_one_bad_entry() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(
            &path,
            r#"{"A/plano.pdf": {"status": "Aprobado", "notes": "ok"}, "A/losa.pdf": {"status": null}}"#,
        )
        .unwrap();

        let store = JsonAnnotationStore::load(&path);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("A/plano.pdf").status, ReviewStatus::Approved);
    }

    #[test]
    fn test_missing_entry_defaults() {
        let store = JsonAnnotationStore::default();
        assert_eq!(store.get("nothing"), AnnotationEntry::default());
        assert!(store.is_empty());
    }

    #[test]
    fn test_status_aliases() {
        let store = JsonAnnotationStore::from_json(
            r#"{"a": {"status": "En Revisión"}, "b": {"status": "Obsolete"}}"#,
        )
        .unwrap();
        assert_eq!(store.get("a").status, ReviewStatus::InReview);
        assert_eq!(store.get("b").status, ReviewStatus::Obsolete);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(JsonAnnotationStore::load(&path).is_empty());
        assert!(JsonAnnotationStore::load(&dir.path().join("missing.json")).is_empty());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("in review".parse::<ReviewStatus>().unwrap(), ReviewStatus::InReview);
        assert_eq!("approved".parse::<ReviewStatus>().unwrap(), ReviewStatus::Approved);
        assert!("done".parse::<ReviewStatus>().is_err());
    }
}
