//! Copy operations.

use std::fs;
use std::path::{Path, PathBuf};

use burrow_core::{FsError, FsResult};

use crate::conflict::{ensure_free, resolve_unique_name};
use crate::progress::{OperationComplete, OperationType};

/// Copy every source into `destination`, each under a collision-free name.
pub fn copy_all(sources: &[PathBuf], destination: &Path) -> OperationComplete {
    let mut complete = OperationComplete::new(OperationType::Copy);
    for source in sources {
        match copy_into(source, destination) {
            Ok(target) => complete.record_success(Some(target)),
            Err(e) => complete.record_failure(source.clone(), &e),
        }
    }
    complete
}

/// Copy one file or directory into `destination` and return the path written.
pub fn copy_into(source: &Path, destination: &Path) -> FsResult<PathBuf> {
    let name = source_name(source)?;
    ensure_not_inside(source, destination)?;

    let target = resolve_unique_name(destination, &name);
    ensure_free(&target)?;
    tracing::debug!(from = %source.display(), to = %target.display(), "copy");
    copy_item(source, &target)?;
    Ok(target)
}

/// Copy a single item (file, directory or link) to an exact target path.
pub fn copy_item(source: &Path, dest: &Path) -> FsResult<u64> {
    let metadata = fs::symlink_metadata(source).map_err(|e| FsError::io(source, e))?;
    if metadata.file_type().is_symlink() {
        copy_symlink(source, dest)
    } else if metadata.is_dir() {
        copy_dir_recursive(source, dest)
    } else {
        copy_file(source, dest)
    }
}

/// Copy a single file byte for byte.
pub fn copy_file(source: &Path, dest: &Path) -> FsResult<u64> {
    fs::copy(source, dest).map_err(|e| FsError::io(source, e))
}

/// Recursively copy a directory.
///
/// Links inside the tree are recreated rather than followed, so a link cycle
/// cannot make the walk unbounded.
pub fn copy_dir_recursive(source: &Path, dest: &Path) -> FsResult<u64> {
    if !dest.exists() {
        fs::create_dir_all(dest).map_err(|e| FsError::io(dest, e))?;
    }

    let mut total_bytes = 0u64;
    let entries = fs::read_dir(source).map_err(|e| FsError::io(source, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| FsError::io(source, e))?;
        let path = entry.path();
        let dest_path = dest.join(entry.file_name());
        total_bytes += copy_item(&path, &dest_path)?;
    }

    Ok(total_bytes)
}

#[cfg(unix)]
fn copy_symlink(source: &Path, dest: &Path) -> FsResult<u64> {
    let target = fs::read_link(source).map_err(|e| FsError::io(source, e))?;
    std::os::unix::fs::symlink(&target, dest).map_err(|e| FsError::io(dest, e))?;
    Ok(0)
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, dest: &Path) -> FsResult<u64> {
    if source.is_dir() {
        return Err(FsError::NotADirectory {
            path: source.to_path_buf(),
        });
    }
    copy_file(source, dest)
}

/// File name of a source path, rejecting roots and `..`.
pub(crate) fn source_name(source: &Path) -> FsResult<String> {
    source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| FsError::InvalidName {
            name: source.display().to_string(),
            reason: "path has no file name".into(),
        })
}

/// Reject placing a directory into itself or one of its descendants.
pub(crate) fn ensure_not_inside(source: &Path, destination: &Path) -> FsResult<()> {
    if !source.is_dir() {
        return Ok(());
    }
    let source_abs = fs::canonicalize(source).unwrap_or_else(|_| source.to_path_buf());
    let dest_abs = fs::canonicalize(destination).unwrap_or_else(|_| destination.to_path_buf());
    if dest_abs.starts_with(&source_abs) {
        return Err(FsError::DestinationInsideSource {
            source_path: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }
    Ok(())
}
