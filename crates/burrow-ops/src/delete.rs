//! Recursive deletion.

use std::fs;
use std::path::{Path, PathBuf};

use burrow_core::{FsError, FsResult};

use crate::progress::{OperationComplete, OperationType};

/// Delete a file or a whole directory tree, reporting plain success.
pub fn delete_recursive(path: &Path) -> bool {
    match try_delete_recursive(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), "delete failed: {e}");
            false
        }
    }
}

/// Delete depth-first, stopping at the first child that cannot be removed.
///
/// Whatever was not reached stays on disk. Links are removed, never followed.
pub fn try_delete_recursive(path: &Path) -> FsResult<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| FsError::io(path, e))?;

    if metadata.is_dir() {
        let entries = fs::read_dir(path).map_err(|e| FsError::io(path, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| FsError::io(path, e))?;
            try_delete_recursive(&entry.path())?;
        }
        fs::remove_dir(path).map_err(|e| FsError::io(path, e))
    } else {
        fs::remove_file(path).map_err(|e| FsError::io(path, e))
    }
}

/// Delete every target, continuing past failures.
pub fn delete_all(targets: &[PathBuf]) -> OperationComplete {
    let mut complete = OperationComplete::new(OperationType::Delete);
    for target in targets {
        tracing::debug!(path = %target.display(), "delete");
        match try_delete_recursive(target) {
            Ok(()) => complete.record_success(None),
            Err(e) => complete.record_failure(target.clone(), &e),
        }
    }
    complete
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_delete_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::write(root.join("a/file.txt"), b"x").unwrap();
        fs::write(root.join("a/b/c/deep.txt"), b"y").unwrap();

        assert!(delete_recursive(&root));
        assert!(!root.exists());
    }

    #[test]
    fn test_delete_missing_fails() {
        let temp = TempDir::new().unwrap();
        assert!(!delete_recursive(&temp.path().join("ghost")));
    }

    #[test]
    fn test_delete_all_continues() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        let b = temp.path().join("b.txt");
        fs::write(&a, b"a").unwrap();
        fs::write(&b, b"b").unwrap();

        let complete = delete_all(&[a.clone(), temp.path().join("ghost"), b.clone()]);
        assert_eq!(complete.succeeded, 2);
        assert_eq!(complete.failed, 1);
        assert!(!a.exists());
        assert!(!b.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_removes_link_not_target() {
        let temp = TempDir::new().unwrap();
        let keep = temp.path().join("keep");
        fs::create_dir(&keep).unwrap();
        fs::write(keep.join("precious.txt"), b"!").unwrap();
        let holder = temp.path().join("holder");
        fs::create_dir(&holder).unwrap();
        std::os::unix::fs::symlink(&keep, holder.join("link")).unwrap();

        assert!(delete_recursive(&holder));
        assert!(keep.join("precious.txt").exists());
    }
}
