//! Rename operation.

use std::fs;
use std::path::{Path, PathBuf};

use burrow_core::{FsError, FsResult};

/// Rename an entry within its parent directory, reporting plain success.
pub fn rename_entry(source: &Path, new_name: &str) -> bool {
    match try_rename(source, new_name) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(path = %source.display(), new_name, "rename failed: {e}");
            false
        }
    }
}

/// Rename an entry within its parent directory and return the new path.
///
/// An existing entry with the new name is never replaced.
pub fn try_rename(source: &Path, new_name: &str) -> FsResult<PathBuf> {
    validate_filename(new_name)?;

    let parent = source.parent().unwrap_or(Path::new(""));
    let new_path = parent.join(new_name);

    if new_path == source {
        return Ok(new_path);
    }
    if fs::symlink_metadata(&new_path).is_ok() {
        return Err(FsError::AlreadyExists { path: new_path });
    }

    fs::rename(source, &new_path).map_err(|e| FsError::io(source, e))?;
    Ok(new_path)
}

/// Validate a single path component before handing it to the filesystem.
pub fn validate_filename(name: &str) -> FsResult<()> {
    let invalid = |reason: &str| {
        Err(FsError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return invalid("name cannot be empty");
    }
    if name.len() > 255 {
        return invalid("name is too long (max 255 bytes)");
    }
    if name == "." || name == ".." {
        return invalid("'.' and '..' are reserved names");
    }
    for c in ['/', '\0'] {
        if name.contains(c) {
            return invalid("name contains a path separator or NUL");
        }
    }
    #[cfg(windows)]
    for c in ['\\', ':', '*', '?', '"', '<', '>', '|'] {
        if name.contains(c) {
            return invalid("name contains a character Windows rejects");
        }
    }

    Ok(())
}
