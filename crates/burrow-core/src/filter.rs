//! MIME-based filtering for picking a file on behalf of another application.

use serde::{Deserialize, Serialize};

use crate::entry::FileCatalogEntry;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "3gp"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "aac", "m4a", "wma"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "log", "json", "xml", "md", "csv", "ini", "cfg"];

/// Which entries a picker shows for a requested MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PickerFilter {
    mime: String,
}

impl PickerFilter {
    /// Create a filter for a MIME pattern such as `image/*` or `application/pdf`.
    pub fn new(mime: impl Into<String>) -> Self {
        Self {
            mime: mime.into().trim().to_ascii_lowercase(),
        }
    }

    /// The MIME pattern this filter was built from.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Directories always pass so the user can keep navigating.
    pub fn accepts(&self, entry: &FileCatalogEntry) -> bool {
        if entry.is_dir() {
            return true;
        }
        let ext = entry.extension();
        let ext = ext.as_str();
        let mime = self.mime.as_str();

        if mime.is_empty() || mime == "*/*" {
            true
        } else if mime.starts_with("image/") {
            IMAGE_EXTENSIONS.contains(&ext)
        } else if mime.starts_with("video/") {
            VIDEO_EXTENSIONS.contains(&ext)
        } else if mime.starts_with("audio/") {
            AUDIO_EXTENSIONS.contains(&ext)
        } else if mime.starts_with("text/") {
            TEXT_EXTENSIONS.contains(&ext)
        } else if mime == "application/pdf" {
            ext == "pdf"
        } else if mime == "application/zip" {
            ext == "zip"
        } else {
            true
        }
    }
}

impl From<String> for PickerFilter {
    fn from(mime: String) -> Self {
        Self::new(mime)
    }
}

impl From<PickerFilter> for String {
    fn from(filter: PickerFilter) -> Self {
        filter.mime
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::entry::EntryKind;

    fn file(name: &str) -> FileCatalogEntry {
        FileCatalogEntry {
            path: PathBuf::from("/x").join(name),
            name: name.into(),
            kind: EntryKind::File,
            size: 1,
            modified_ms: 0,
            selected: false,
        }
    }

    #[test]
    fn test_image_filter() {
        let filter = PickerFilter::new("image/*");
        assert!(filter.accepts(&file("cat.PNG")));
        assert!(!filter.accepts(&file("notes.txt")));
    }

    #[test]
    fn test_directories_always_pass() {
        let filter = PickerFilter::new("application/pdf");
        let mut dir = file("papers");
        dir.kind = EntryKind::Directory;
        assert!(filter.accepts(&dir));
        assert!(filter.accepts(&file("paper.pdf")));
        assert!(!filter.accepts(&file("paper.zip")));
    }

    #[test]
    fn test_wildcard_and_unknown() {
        assert!(PickerFilter::new("*/*").accepts(&file("anything.bin")));
        assert!(PickerFilter::new("application/x-custom").accepts(&file("anything.bin")));
    }
}
