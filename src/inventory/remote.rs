//! Remote mirror map
//!
//! A cloud mirror of the document tree is described by a flat JSON object
//! mapping each relative path (`/`-separated) to a viewing link.

use super::content_hash;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Relative path to remote link, ordered by path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteMap {
    links: BTreeMap<String, String>,
    hash: String,
}

impl RemoteMap {
    /// Load a map file. A missing or unparseable file is an empty map.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No remote map at {:?}: {}", path, e);
                return Self::default();
            }
        };

        match Self::from_json(&content) {
            Ok(map) => map,
            Err(e) => {
                warn!("Failed to parse remote map {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Parse a map from JSON text
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        let links: BTreeMap<String, String> = serde_json::from_str(content)?;
        Ok(Self {
            links,
            hash: content_hash(content.as_bytes()),
        })
    }

    /// Build a map from path/link pairs
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let links: BTreeMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let hash = content_hash(
            links
                .iter()
                .map(|(k, v)| format!("{}\t{}\n", k, v))
                .collect::<String>()
                .as_bytes(),
        );
        Self { links, hash }
    }

    /// Iterate over (relative path, link) pairs in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.links.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Link for an exact relative path
    pub fn get(&self, rel_path: &str) -> Option<&str> {
        self.links.get(rel_path).map(String::as_str)
    }

    /// Find a link by file name.
    ///
    /// Local and remote trees are not always laid out identically, so any key
    /// that is the file name itself or ends with `/<file_name>` matches.
    pub fn find_link(&self, file_name: &str) -> Option<&str> {
        let suffix = format!("/{}", file_name);
        self.links
            .iter()
            .find(|(key, _)| key.as_str() == file_name || key.ends_with(&suffix))
            .map(|(_, link)| link.as_str())
    }

    /// SHA-256 of the map contents, used as a cache watermark
    pub fn content_hash(&self) -> &str {
        &self.hash
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
