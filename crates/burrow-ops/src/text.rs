//! Plain-text documents for the built-in editor.

use std::fs;
use std::path::{Path, PathBuf};

use burrow_core::{FsError, FsResult};

/// A text file loaded for editing.
#[derive(Debug, Clone)]
pub struct TextDocument {
    path: PathBuf,
    content: String,
    modified: bool,
}

impl TextDocument {
    /// Load a UTF-8 file.
    pub fn open(path: impl Into<PathBuf>) -> FsResult<Self> {
        let path = path.into();
        let bytes = fs::read(&path).map_err(|e| FsError::io(&path, e))?;
        let content = String::from_utf8(bytes).map_err(|e| {
            FsError::io(
                &path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;
        Ok(Self {
            path,
            content,
            modified: false,
        })
    }

    /// Path of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether there are unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Replace the text, marking the document modified if it changed.
    pub fn set_content(&mut self, content: impl Into<String>) {
        let content = content.into();
        if content != self.content {
            self.content = content;
            self.modified = true;
        }
    }

    /// Write the text back to disk.
    pub fn save(&mut self) -> FsResult<()> {
        fs::write(&self.path, self.content.as_bytes()).map_err(|e| FsError::io(&self.path, e))?;
        self.modified = false;
        tracing::debug!(path = %self.path.display(), bytes = self.content.len(), "saved");
        Ok(())
    }
}
