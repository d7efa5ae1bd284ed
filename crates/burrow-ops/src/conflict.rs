//! Unique-name resolution for copy, move and archive targets.

use std::fs;
use std::path::{Path, PathBuf};

use burrow_core::{FsError, FsResult};

/// Number of suffixed candidates tried before giving up.
pub const UNIQUE_NAME_ATTEMPTS: u32 = 999;

/// Split a file name into base and extension (extension keeps its dot).
///
/// A leading dot does not start an extension, so `.bashrc` has none.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    }
}

/// Pick a path inside `dir` for `desired` that does not collide with an existing entry.
///
/// For "file.txt", tries "file(1).txt", "file(2).txt", ... up to
/// [`UNIQUE_NAME_ATTEMPTS`]. When every candidate is taken the last one tried
/// is returned anyway.
pub fn resolve_unique_name(dir: &Path, desired: &str) -> PathBuf {
    let mut candidate = dir.join(desired);
    if !is_taken(&candidate) {
        return candidate;
    }

    let (base, ext) = split_name(desired);
    for i in 1..=UNIQUE_NAME_ATTEMPTS {
        candidate = dir.join(format!("{base}({i}){ext}"));
        if !is_taken(&candidate) {
            return candidate;
        }
    }

    tracing::warn!(
        dir = %dir.display(),
        name = desired,
        "no free name after {UNIQUE_NAME_ATTEMPTS} attempts"
    );
    candidate
}

/// Fail with `AlreadyExists` if `target` is occupied, so an exhausted
/// [`resolve_unique_name`] never leads to an overwrite.
pub(crate) fn ensure_free(target: &Path) -> FsResult<()> {
    if is_taken(target) {
        return Err(FsError::AlreadyExists {
            path: target.to_path_buf(),
        });
    }
    Ok(())
}

/// A dangling link still occupies its name.
fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
