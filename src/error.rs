//! Typed errors surfaced to callers

use std::path::PathBuf;
use thiserror::Error;

/// Invalid comparison request
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("Path does not exist: {0:?}")]
    NotFound(PathBuf),

    #[error("Both inputs must be folders or both must be documents: {left:?} is a {left_kind}, {right:?} is a {right_kind}")]
    KindMismatch {
        left: PathBuf,
        left_kind: &'static str,
        right: PathBuf,
        right_kind: &'static str,
    },
}

/// Failure while extracting text from a document
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Parse(String),

    #[error("PDF parser panicked (malformed font or structure)")]
    Panicked,
}
