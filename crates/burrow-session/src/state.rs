//! Observable state of one explorer session.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use strum::Display;

use burrow_core::FileCatalogEntry;

use crate::listing::Breadcrumb;

/// Interaction mode of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum SessionMode {
    #[default]
    #[strum(to_string = "browsing")]
    Browsing,
    #[strum(to_string = "multi-selecting")]
    MultiSelecting,
}

/// Everything a view needs to render the current directory.
#[derive(Debug, Clone, Default)]
pub struct ExplorerState {
    /// Directory being shown; canonical once the first navigation succeeded.
    pub current_directory: Option<PathBuf>,
    /// Entries of the current directory, directories first.
    pub files: Vec<FileCatalogEntry>,
    /// Path from the root to the current directory, root first.
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Browsing or multi-selecting.
    pub mode: SessionMode,
    /// Selected paths in the order they were selected. Always a subset of `files`.
    pub selected: IndexSet<PathBuf>,
    /// A navigation is listing a directory.
    pub is_loading: bool,
    /// A pull-to-refresh is listing the current directory.
    pub is_refreshing: bool,
    /// Outcome of the last pull-to-refresh, until the caller clears it.
    pub refresh_success: Option<bool>,
    /// Last failure to show the user, until the caller clears it.
    pub error_message: Option<String>,
    /// "Used X / Total Y" for the volume, or empty when unknown.
    pub storage_info: String,
}

impl ExplorerState {
    /// Check if the session is multi-selecting.
    pub fn is_multi_select_mode(&self) -> bool {
        self.mode == SessionMode::MultiSelecting
    }

    /// Check if `path` is in the selection.
    pub fn is_selected(&self, path: &Path) -> bool {
        self.selected.contains(path)
    }

    /// Whether `path` is one of the listed entries.
    pub fn is_listed(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f.path == path)
    }

    /// Find the listed entry for `path`.
    pub fn entry(&self, path: &Path) -> Option<&FileCatalogEntry> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Selected paths, oldest selection first.
    pub fn selected_paths(&self) -> Vec<PathBuf> {
        self.selected.iter().cloned().collect()
    }

    pub(crate) fn clear_selection(&mut self) {
        self.mode = SessionMode::Browsing;
        self.selected.clear();
        self.sync_selected_flags();
    }

    /// Mirror the selection set onto each entry's `selected` flag.
    pub(crate) fn sync_selected_flags(&mut self) {
        for file in &mut self.files {
            file.selected = self.selected.contains(&file.path);
        }
    }
}
