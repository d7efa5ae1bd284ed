//! Error types for file operations and session transitions.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by listing, file operations and session transitions.
#[derive(Debug, Error)]
pub enum FsError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Path is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// An entry with that name already exists.
    #[error("Already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// A file name was rejected before touching the filesystem.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Paste requested with nothing on the clipboard.
    #[error("Clipboard is empty")]
    ClipboardEmpty,

    /// Paste requested without a current directory.
    #[error("No destination directory")]
    NoDestination,

    /// A directory cannot be copied or moved into its own subtree.
    #[error("Cannot place {source_path} inside itself ({destination})")]
    DestinationInsideSource {
        source_path: PathBuf,
        destination: PathBuf,
    },

    /// The path is not something that can be extracted.
    #[error("Not a zip archive: {path}")]
    NotAnArchive { path: PathBuf },

    /// An archive entry would resolve outside the extraction directory.
    #[error("Archive entry '{entry}' escapes {target}")]
    UnsafeArchiveEntry { entry: String, target: PathBuf },

    /// The archive could not be read or written.
    #[error("Archive error at {path}: {message}")]
    Archive { path: PathBuf, message: String },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A session action was attempted in the wrong mode.
    #[error("Cannot {action} while {mode}")]
    InvalidState { action: &'static str, mode: String },

    /// A selection action was attempted with nothing selected.
    #[error("Nothing is selected")]
    EmptySelection,
}

impl FsError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an archive error from any displayable cause.
    pub fn archive(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Archive {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error must abort a whole operation instead of skipping one item.
    pub fn is_security_violation(&self) -> bool {
        matches!(self, Self::UnsafeArchiveEntry { .. })
    }
}

/// Convenience alias used across the workspace.
pub type FsResult<T> = Result<T, FsError>;
