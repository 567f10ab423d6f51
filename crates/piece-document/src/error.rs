use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by document persistence and search.
///
/// Edits, navigation and queries never fail: out-of-range requests are ignored or
/// clamped.
pub enum DocumentError {
    #[error("cannot open '{}': {source}", .path.display())]
    /// The file exists but could not be opened or created.
    Open {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    #[error("cannot read '{}': {source}", .path.display())]
    /// Reading an opened file failed.
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    #[error("cannot write '{}': {source}", .path.display())]
    /// Writing document content failed partway; the file may be truncated.
    Write {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    #[error("invalid search pattern: {0}")]
    /// A search query failed to compile.
    InvalidPattern(#[from] regex::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DocumentError>;
