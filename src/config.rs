//! Configuration for a document root

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory under the document root holding configuration
pub const CONFIG_DIR: &str = ".doccontrol";

/// Configuration for a document root being analyzed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Extensions of files treated as documents (without dot)
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Annotation store (JSON), relative to the document root
    #[serde(default = "default_annotations_file")]
    pub annotations_file: String,

    /// Remote mirror map (JSON), relative to the document root
    #[serde(default = "default_remote_map_file")]
    pub remote_map_file: String,

    /// Maximum removed/added lines listed in a change summary
    #[serde(default = "default_summary_limit")]
    pub summary_limit: usize,

    /// Maximum pages read per PDF (all pages when unset or 0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,

    /// Lifetime of cached scans in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Project for documents outside a project folder
    #[serde(default = "default_project")]
    pub default_project: String,

    /// Owner for documents without an owner folder
    #[serde(default = "default_owner")]
    pub default_owner: String,
}

pub fn default_allowed_extensions() -> Vec<String> {
    ["pdf", "dwg", "rvt", "xlsx", "doc", "docx"]
        .iter()
        .map(|e| e.to_string())
        .collect()
}

fn default_annotations_file() -> String {
    "notes.json".to_string()
}

fn default_remote_map_file() -> String {
    "drive_map.json".to_string()
}

fn default_summary_limit() -> usize {
    10
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_project() -> String {
    crate::inventory::DEFAULT_PROJECT.to_string()
}

fn default_owner() -> String {
    crate::inventory::DEFAULT_OWNER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
            annotations_file: default_annotations_file(),
            remote_map_file: default_remote_map_file(),
            summary_limit: default_summary_limit(),
            max_pages: None,
            cache_ttl_secs: default_cache_ttl_secs(),
            default_project: default_project(),
            default_owner: default_owner(),
        }
    }
}

impl Config {
    /// Path of the configuration file for a document root
    pub fn path_for(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join("config.toml")
    }

    /// Load configuration from the document root or return defaults
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = Self::path_for(root);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration under the document root
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_dir = root.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create {:?}", config_dir))?;

        let config_path = Self::path_for(root);
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Annotation store location for a document root
    pub fn annotations_path(&self, root: &Path) -> PathBuf {
        root.join(&self.annotations_file)
    }

    /// Remote map location for a document root
    pub fn remote_map_path(&self, root: &Path) -> PathBuf {
        root.join(&self.remote_map_file)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Value of a single key rendered as text
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "allowed_extensions" => self.allowed_extensions.join(", "),
            "annotations_file" => self.annotations_file.clone(),
            "remote_map_file" => self.remote_map_file.clone(),
            "summary_limit" => self.summary_limit.to_string(),
            "max_pages" => self
                .max_pages
                .map(|p| p.to_string())
                .unwrap_or_else(|| "all".to_string()),
            "cache_ttl_secs" => self.cache_ttl_secs.to_string(),
            "default_project" => self.default_project.clone(),
            "default_owner" => self.default_owner.clone(),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.allowed_extensions.len(), 6);
        assert_eq!(config.summary_limit, 10);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.max_pages, None);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();
        std::fs::write(
            Config::path_for(dir.path()),
            "summary_limit = 5\nmax_pages = 3\n",
        )
        .unwrap();

        let config = Config::load_or_default(dir.path()).unwrap();
        assert_eq!(config.summary_limit, 5);
        assert_eq!(config.max_pages, Some(3));
        assert_eq!(config.annotations_file, "notes.json");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            default_owner: "Desconocido".to_string(),
            ..Config::default()
        };
        config.save(dir.path()).unwrap();

        let loaded = Config::load_or_default(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();
        std::fs::write(Config::path_for(dir.path()), "summary_limit = \"ten\"").unwrap();
        assert!(Config::load_or_default(dir.path()).is_err());
    }

    #[test]
    fn test_get() {
        let config = Config::default();
        assert_eq!(config.get("max_pages").as_deref(), Some("all"));
        assert_eq!(config.get("summary_limit").as_deref(), Some("10"));
        assert_eq!(config.get("nope"), None);
    }
}
