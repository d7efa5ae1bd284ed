//! Move operations.

use std::fs;
use std::path::{Path, PathBuf};

use burrow_core::FsResult;

use crate::conflict::{ensure_free, resolve_unique_name};
use crate::copy::{copy_item, ensure_not_inside, source_name};
use crate::delete::try_delete_recursive;
use crate::progress::{OperationComplete, OperationType};

/// Move every source into `destination`, each under a collision-free name.
pub fn move_all(sources: &[PathBuf], destination: &Path) -> OperationComplete {
    let mut complete = OperationComplete::new(OperationType::Move);
    for source in sources {
        match move_into(source, destination) {
            Ok(target) => complete.record_success(Some(target)),
            Err(e) => complete.record_failure(source.clone(), &e),
        }
    }
    complete
}

/// Move one file or directory into `destination` and return its new path.
pub fn move_into(source: &Path, destination: &Path) -> FsResult<PathBuf> {
    let name = source_name(source)?;
    ensure_not_inside(source, destination)?;

    let target = resolve_unique_name(destination, &name);
    ensure_free(&target)?;
    tracing::debug!(from = %source.display(), to = %target.display(), "move");
    move_item(source, &target)?;
    Ok(target)
}

/// Move a single item to an exact target path.
///
/// Tries a rename first (same filesystem), then falls back to copying and
/// deleting the source. Once the copy landed the move counts as done even if
/// part of the source could not be removed.
pub fn move_item(source: &Path, dest: &Path) -> FsResult<()> {
    if fs::rename(source, dest).is_ok() {
        return Ok(());
    }

    copy_item(source, dest)?;
    if let Err(e) = try_delete_recursive(source) {
        tracing::warn!(
            source = %source.display(),
            "moved by copy but source was left behind: {e}"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_move_into() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("music");
        fs::create_dir_all(src.join("album")).unwrap();
        fs::write(src.join("album/track.mp3"), b"la la").unwrap();
        let out = temp.path().join("out");
        fs::create_dir(&out).unwrap();

        let target = move_into(&src, &out).unwrap();
        assert_eq!(target, out.join("music"));
        assert!(!src.exists());
        assert_eq!(fs::read(out.join("music/album/track.mp3")).unwrap(), b"la la");
    }

    #[test]
    fn test_move_into_same_directory_renames() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.txt");
        fs::write(&src, b"a").unwrap();

        let target = move_into(&src, temp.path()).unwrap();
        assert_eq!(target, temp.path().join("a(1).txt"));
        assert!(!src.exists());
    }

    #[test]
    fn test_move_all_counts() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        fs::write(&a, b"a").unwrap();
        let out = temp.path().join("out");
        fs::create_dir(&out).unwrap();

        let complete = move_all(&[a, temp.path().join("ghost.txt")], &out);
        assert_eq!(complete.succeeded, 1);
        assert_eq!(complete.failed, 1);
        assert_eq!(complete.outputs, vec![out.join("a.txt")]);
    }
}
