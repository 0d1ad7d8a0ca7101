//! Error types for mmd-html operations.
//!
//! Rendering itself never fails; these cover the edges where a tree is
//! loaded or checked, and the CLI's file handling.

use thiserror::Error;

/// Errors that can occur while loading or validating a document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    #[error("Unknown option value: {0}")]
    UnknownValue(String),
}

pub type Result<T> = std::result::Result<T, Error>;
