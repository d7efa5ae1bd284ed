//! Directory listing and breadcrumb computation.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use compact_str::CompactString;

use burrow_core::{ExplorerConfig, FileCatalogEntry, FsError, FsResult, PickerFilter, display_name};

/// Display name of the filesystem root in a breadcrumb chain.
pub const ROOT_NAME: &str = "root";

/// What a listing includes.
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Include entries whose name starts with a dot.
    pub show_hidden: bool,
    /// Only include files this filter accepts.
    pub filter: Option<PickerFilter>,
}

impl ListOptions {
    /// Options matching an explorer configuration.
    pub fn from_config(config: &ExplorerConfig) -> Self {
        Self {
            show_hidden: config.show_hidden,
            filter: config.picker_filter.clone(),
        }
    }

    fn includes(&self, entry: &FileCatalogEntry) -> bool {
        if !self.show_hidden && entry.name.starts_with('.') {
            return false;
        }
        self.filter.as_ref().is_none_or(|f| f.accepts(entry))
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            show_hidden: true,
            filter: None,
        }
    }
}

/// One step of the path from the root to the current directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    /// Directory this crumb navigates to.
    pub path: PathBuf,
    /// Name to show; [`ROOT_NAME`] for the filesystem root.
    pub name: CompactString,
}

/// List a directory: directories first, then files, each group by name ignoring case.
///
/// Entries whose metadata cannot be read are skipped.
pub fn list_directory(dir: &Path, options: &ListOptions) -> FsResult<Vec<FileCatalogEntry>> {
    let metadata = fs::metadata(dir).map_err(|e| FsError::io(dir, e))?;
    if !metadata.is_dir() {
        return Err(FsError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let read_dir = fs::read_dir(dir).map_err(|e| FsError::io(dir, e))?;
    let mut entries: Vec<FileCatalogEntry> = read_dir
        .filter_map(|entry| match entry {
            Ok(entry) => match FileCatalogEntry::from_path(entry.path()) {
                Ok(catalog) => Some(catalog),
                Err(e) => {
                    tracing::debug!("skipping entry: {e}");
                    None
                }
            },
            Err(e) => {
                tracing::debug!(dir = %dir.display(), "skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| options.includes(entry))
        .collect();

    sort_entries(&mut entries);
    Ok(entries)
}

/// Sort entries the way listings present them.
///
/// Names equal ignoring case fall back to the exact name so the order is total.
pub fn sort_entries(entries: &mut [FileCatalogEntry]) {
    entries.sort_by(compare_entries);
}

fn compare_entries(a: &FileCatalogEntry, b: &FileCatalogEntry) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Ancestor chain of `dir`, root first, ending with `dir` itself.
pub fn breadcrumbs(dir: &Path) -> Vec<Breadcrumb> {
    let mut crumbs: Vec<Breadcrumb> = dir
        .ancestors()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|path| Breadcrumb {
            path: path.to_path_buf(),
            name: if path.parent().is_none() {
                CompactString::const_new(ROOT_NAME)
            } else {
                display_name(path)
            },
        })
        .collect();
    crumbs.reverse();
    crumbs
}
