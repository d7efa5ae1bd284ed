//! Outcome types for batch and background operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::Display;

use burrow_core::FsError;

use crate::OperationError;

/// The type of operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum OperationType {
    Copy,
    Move,
    Delete,
    Compress,
    Extract,
}

/// Result of a completed batch operation.
///
/// Items are processed best-effort: one failure never stops the batch, it is
/// counted in `failed` and recorded in `errors`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationComplete {
    /// The type of operation.
    pub operation_type: OperationType,
    /// Number of items successfully processed.
    pub succeeded: usize,
    /// Number of items that failed.
    pub failed: usize,
    /// Paths created or left behind by successful items.
    pub outputs: Vec<PathBuf>,
    /// Errors that occurred.
    pub errors: Vec<OperationError>,
}

impl OperationComplete {
    /// Start an empty result for an operation.
    pub fn new(operation_type: OperationType) -> Self {
        Self {
            operation_type,
            succeeded: 0,
            failed: 0,
            outputs: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Count one successful item.
    pub fn record_success(&mut self, output: Option<PathBuf>) {
        self.succeeded += 1;
        self.outputs.extend(output);
    }

    /// Count one failed item.
    pub fn record_failure(&mut self, path: PathBuf, error: &FsError) {
        tracing::warn!(
            operation = %self.operation_type,
            path = %path.display(),
            "{error}"
        );
        self.failed += 1;
        self.errors.push(OperationError::from_fs(path, error));
    }

    /// Check if the operation was fully successful.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Get a human-readable summary of the operation.
    pub fn summary(&self) -> String {
        let action = match self.operation_type {
            OperationType::Copy => "Copied",
            OperationType::Move => "Moved",
            OperationType::Delete => "Deleted",
            OperationType::Compress => "Compressed",
            OperationType::Extract => "Extracted",
        };

        if self.failed == 0 {
            format!("{} {} items", action, self.succeeded)
        } else {
            format!("{} {} items, {} failed", action, self.succeeded, self.failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let mut complete = OperationComplete::new(OperationType::Copy);
        complete.record_success(Some(PathBuf::from("/tmp/a")));
        complete.record_success(None);
        assert!(complete.is_success());
        assert_eq!(complete.summary(), "Copied 2 items");
        assert_eq!(complete.outputs.len(), 1);

        complete.record_failure(PathBuf::from("/tmp/b"), &FsError::ClipboardEmpty);
        assert!(!complete.is_success());
        assert_eq!(complete.summary(), "Copied 2 items, 1 failed");
        assert_eq!(complete.errors[0].path, PathBuf::from("/tmp/b"));
    }

    #[test]
    fn test_operation_type_display() {
        assert_eq!(OperationType::Move.to_string(), "Move");
        assert_eq!(OperationType::Extract.to_string(), "Extract");
    }
}
