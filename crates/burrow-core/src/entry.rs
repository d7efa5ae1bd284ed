//! Catalog entries describing one file or directory in a listing.

use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::error::{FsError, FsResult};

/// Type of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Directory (or a link resolving to one).
    Directory,
    /// Anything that is not a directory.
    File,
}

/// A single file or directory as presented in a listing.
///
/// Entries are rebuilt on every listing and never patched in place, except for
/// the transient `selected` flag which a session keeps in sync with its
/// selection set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCatalogEntry {
    /// Absolute path of the entry.
    pub path: PathBuf,

    /// Display name (last path component).
    pub name: CompactString,

    /// Directory or file.
    pub kind: EntryKind,

    /// Size in bytes, always 0 for directories.
    pub size: u64,

    /// Last modification time in milliseconds since the Unix epoch.
    pub modified_ms: i64,

    /// Whether the entry is part of the current selection.
    #[serde(default)]
    pub selected: bool,
}

impl FileCatalogEntry {
    /// Build an entry by reading metadata for `path`.
    ///
    /// Links are followed so a link to a directory lists as a directory; a
    /// dangling link falls back to the link's own metadata.
    pub fn from_path(path: impl Into<PathBuf>) -> FsResult<Self> {
        let path = path.into();
        let metadata = fs::metadata(&path)
            .or_else(|_| fs::symlink_metadata(&path))
            .map_err(|e| FsError::io(&path, e))?;
        Ok(Self::from_metadata(path, &metadata))
    }

    /// Build an entry from already-fetched metadata.
    pub fn from_metadata(path: PathBuf, metadata: &Metadata) -> Self {
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let size = match kind {
            EntryKind::Directory => 0,
            EntryKind::File => metadata.len(),
        };
        let modified_ms = metadata.modified().map(epoch_millis).unwrap_or(0);
        let name = display_name(&path);

        Self {
            path,
            name,
            kind,
            size,
            modified_ms,
            selected: false,
        }
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Check if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Lower-cased extension, empty when there is none.
    pub fn extension(&self) -> String {
        extension_of(&self.path)
    }

    /// Human-readable size; empty for directories.
    pub fn display_size(&self) -> String {
        if self.is_dir() {
            return String::new();
        }
        humansize::format_size(self.size, humansize::BINARY)
    }

    /// Modification time formatted as `YYYY-MM-DD HH:MM` in local time.
    pub fn display_date(&self) -> String {
        DateTime::from_timestamp_millis(self.modified_ms)
            .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }

    /// Best-effort MIME type used when handing the file to another application.
    pub fn mime_type(&self) -> &'static str {
        mime_type_for(&self.extension())
    }
}

/// Name shown for `path`: its last component, or the whole path for roots.
pub fn display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::from(name.to_string_lossy()),
        None => CompactString::from(path.to_string_lossy()),
    }
}

/// Lower-cased extension of `path`, empty when there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// MIME type for a lower-cased extension.
pub fn mime_type_for(extension: &str) -> &'static str {
    match extension {
        "txt" | "log" => "text/plain",
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        "apk" => "application/vnd.android.package-archive",
        "zip" => "application/zip",
        _ => "*/*",
    }
}

fn epoch_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
        Err(e) => -i64::try_from(e.duration().as_millis()).unwrap_or(i64::MAX),
    }
}
