//! File and directory creation operations.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use burrow_core::{FsError, FsResult};

use crate::rename::validate_filename;

/// Create an empty directory named `name` inside `dir`.
pub fn create_folder(dir: &Path, name: &str) -> bool {
    report("create folder", dir, name, try_create_folder(dir, name))
}

/// Create an empty file named `name` inside `dir`.
pub fn create_file(dir: &Path, name: &str) -> bool {
    report("create file", dir, name, try_create_file(dir, name))
}

/// Create a directory, failing if anything already has that name.
pub fn try_create_folder(dir: &Path, name: &str) -> FsResult<PathBuf> {
    let path = free_child(dir, name)?;
    fs::create_dir(&path).map_err(|e| FsError::io(&path, e))?;
    Ok(path)
}

/// Create an empty file, failing if anything already has that name.
pub fn try_create_file(dir: &Path, name: &str) -> FsResult<PathBuf> {
    let path = free_child(dir, name)?;
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| FsError::io(&path, e))?;
    Ok(path)
}

fn free_child(dir: &Path, name: &str) -> FsResult<PathBuf> {
    validate_filename(name)?;
    let path = dir.join(name);
    if fs::symlink_metadata(&path).is_ok() {
        return Err(FsError::AlreadyExists { path });
    }
    Ok(path)
}

fn report(action: &str, dir: &Path, name: &str, result: FsResult<PathBuf>) -> bool {
    match result {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "{action}");
            true
        }
        Err(e) => {
            tracing::warn!(dir = %dir.display(), name, "{action} failed: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_folder_and_file() {
        let temp = TempDir::new().unwrap();
        assert!(create_folder(temp.path(), "projects"));
        assert!(temp.path().join("projects").is_dir());

        assert!(create_file(temp.path(), "todo.txt"));
        assert_eq!(fs::read(temp.path().join("todo.txt")).unwrap(), b"");
    }

    #[test]
    fn test_create_never_overwrites() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("todo.txt"), b"keep me").unwrap();

        assert!(!create_file(temp.path(), "todo.txt"));
        assert!(!create_folder(temp.path(), "todo.txt"));
        assert_eq!(fs::read(temp.path().join("todo.txt")).unwrap(), b"keep me");
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nowhere");
        assert!(!create_folder(&missing, "x"));
        assert!(!create_file(&missing, "x.txt"));
        assert!(!missing.exists());
    }
}
