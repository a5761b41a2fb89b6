//! DocControl - Engineering document control
//!
//! This library classifies engineering documents by their names and folder
//! layout, builds annotated inventories, and explains how a document set
//! changed between two versions.

pub mod classify;
pub mod cli;
pub mod compare;
pub mod config;
pub mod diff;
pub mod error;
pub mod extract;
pub mod inventory;
pub mod naming;

/// Re-export commonly used types
pub use classify::{categorize, subcategorize, Category};
pub use compare::{compare_folders, ComparisonEntry, ComparisonRequest, FileStatus};
pub use config::Config;
pub use diff::{generate_html_diff, summarize_changes, ChangeSummary};
pub use error::{CompareError, ExtractError};
pub use extract::{extract_text, PdfTextExtractor, TextExtractor};
pub use inventory::{DocumentRecord, InventoryBuilder};

/// Application-wide error type
pub use anyhow::Result;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "doccontrol";
