//! Per-item error records for batch operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use burrow_core::FsError;

/// An error that occurred for one item of a file operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    /// The path that caused the error.
    pub path: PathBuf,
    /// A human-readable error message.
    pub message: String,
}

impl OperationError {
    /// Create a new operation error.
    pub fn new(path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Record a typed error against the item it happened to.
    pub fn from_fs(path: PathBuf, error: &FsError) -> Self {
        Self::new(path, error.to_string())
    }
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}
