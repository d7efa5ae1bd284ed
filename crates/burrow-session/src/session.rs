//! The explorer session: one navigable, selectable view of the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use burrow_core::{ExplorerConfig, FileCatalogEntry, FsError, FsResult};
use burrow_ops::{
    ArchiveComplete, ArchiveJob, ClipboardStore, ClipboardWatch, OperationComplete, delete_all,
    delete_recursive, paste, rename_entry, start_compress, start_extract,
};

use crate::listing::{ListOptions, breadcrumbs, list_directory};
use crate::state::{ExplorerState, SessionMode};
use crate::storage::storage_info;

/// A single explorer tab.
///
/// Sessions own their state exclusively; the clipboard is the only thing
/// shared between them.
#[derive(Debug)]
pub struct ExplorerSession {
    state: ExplorerState,
    clipboard: ClipboardStore,
    config: ExplorerConfig,
    options: ListOptions,
    initialized: bool,
}

impl ExplorerSession {
    /// Create a session that has not listed anything yet. Call
    /// [`Self::load_initial`] or [`Self::navigate`] to show a directory.
    pub fn new(clipboard: ClipboardStore, config: ExplorerConfig) -> Self {
        let options = ListOptions::from_config(&config);
        Self {
            state: ExplorerState::default(),
            clipboard,
            config,
            options,
            initialized: false,
        }
    }

    /// Current observable state.
    pub fn state(&self) -> &ExplorerState {
        &self.state
    }

    /// Configuration the session was created with.
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// The clipboard shared with other sessions.
    pub fn clipboard(&self) -> &ClipboardStore {
        &self.clipboard
    }

    /// Check if there is something to paste.
    pub fn has_clipboard_content(&self) -> bool {
        self.clipboard.has_content()
    }

    /// Watch the shared clipboard's has-content flag.
    pub fn watch_clipboard(&self) -> ClipboardWatch {
        self.clipboard.subscribe()
    }

    /// Open the first usable starting directory. Only the first call has any effect.
    ///
    /// Tries `saved`, then the configured start directory, then the home directory.
    pub fn load_initial(&mut self, saved: Option<&Path>) -> bool {
        if self.initialized {
            return false;
        }
        self.initialized = true;

        let candidates = saved
            .map(Path::to_path_buf)
            .into_iter()
            .chain(self.config.start_directory.clone())
            .chain(dirs::home_dir())
            .collect::<Vec<_>>();

        let start = candidates
            .iter()
            .find(|dir| fs::read_dir(dir).is_ok())
            .or(candidates.last())
            .cloned();

        let Some(start) = start else {
            self.state.error_message = Some("No starting directory available".to_string());
            return false;
        };

        let navigated = self.navigate(&start);
        self.update_storage_info();
        navigated
    }

    /// Show `directory`.
    ///
    /// On failure the previous listing is kept and the error is surfaced
    /// through `error_message`.
    pub fn navigate(&mut self, directory: impl AsRef<Path>) -> bool {
        let directory = directory.as_ref();
        self.state.is_loading = true;

        match self.read(directory) {
            Ok((dir, files)) => {
                self.apply_listing(dir, files);
                true
            }
            Err(e) => {
                tracing::warn!(dir = %directory.display(), "navigation failed: {e}");
                self.state.is_loading = false;
                self.state.error_message = Some(e.to_string());
                false
            }
        }
    }

    /// Show the parent of the current directory, if it can be read.
    pub fn navigate_up(&mut self) -> bool {
        let Some(parent) = self
            .state
            .current_directory
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
        else {
            return false;
        };

        match self.read(&parent) {
            Ok((dir, files)) => {
                self.apply_listing(dir, files);
                true
            }
            Err(e) => {
                tracing::debug!(dir = %parent.display(), "parent not readable: {e}");
                false
            }
        }
    }

    /// Re-list the current directory.
    pub fn refresh(&mut self) -> bool {
        match self.state.current_directory.clone() {
            Some(dir) => self.navigate(dir),
            None => false,
        }
    }

    /// Re-list the current directory as a user-initiated refresh.
    ///
    /// Uses `is_refreshing` instead of `is_loading` and records the outcome in
    /// `refresh_success`.
    pub fn pull_refresh(&mut self) -> bool {
        let Some(dir) = self.state.current_directory.clone() else {
            return false;
        };
        self.state.is_refreshing = true;

        let ok = match self.read(&dir) {
            Ok((dir, files)) => {
                self.apply_listing(dir, files);
                true
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "refresh failed: {e}");
                self.state.error_message = Some(e.to_string());
                false
            }
        };

        self.state.is_refreshing = false;
        self.state.refresh_success = Some(ok);
        ok
    }

    /// Forget the last pull-to-refresh outcome once it has been shown.
    pub fn clear_refresh_success(&mut self) {
        self.state.refresh_success = None;
    }

    /// Dismiss the current error message.
    pub fn clear_error(&mut self) {
        self.state.error_message = None;
    }

    /// Start multi-selection with `path` as the first selected entry.
    pub fn enter_multi_select(&mut self, path: &Path) -> FsResult<()> {
        self.require_mode(SessionMode::Browsing, "enter multi-select")?;
        self.require_listed(path)?;

        self.state.mode = SessionMode::MultiSelecting;
        self.state.selected.clear();
        self.state.selected.insert(path.to_path_buf());
        self.state.sync_selected_flags();
        Ok(())
    }

    /// Leave multi-selection, dropping the selection.
    pub fn exit_multi_select(&mut self) {
        self.state.clear_selection();
    }

    /// Add or remove `path`. Emptying the selection does not leave multi-select.
    pub fn toggle_selection(&mut self, path: &Path) -> FsResult<()> {
        self.require_mode(SessionMode::MultiSelecting, "toggle selection")?;

        if !self.state.selected.shift_remove(path) {
            self.require_listed(path)?;
            self.state.selected.insert(path.to_path_buf());
        }
        self.state.sync_selected_flags();
        Ok(())
    }

    /// Select every listed entry.
    pub fn select_all(&mut self) -> FsResult<()> {
        self.require_mode(SessionMode::MultiSelecting, "select all")?;
        self.state.selected = self.state.files.iter().map(|f| f.path.clone()).collect();
        self.state.sync_selected_flags();
        Ok(())
    }

    /// Empty the selection while staying in multi-select.
    pub fn deselect_all(&mut self) -> FsResult<()> {
        self.require_mode(SessionMode::MultiSelecting, "deselect all")?;
        self.state.selected.clear();
        self.state.sync_selected_flags();
        Ok(())
    }

    /// Put the selection on the clipboard for copying. Returns the number of items.
    pub fn copy_selection(&mut self) -> FsResult<usize> {
        let paths = self.take_selection("copy selection")?;
        let count = paths.len();
        self.clipboard.set_copy(paths);
        Ok(count)
    }

    /// Put the selection on the clipboard for moving. Returns the number of items.
    pub fn cut_selection(&mut self) -> FsResult<usize> {
        let paths = self.take_selection("cut selection")?;
        let count = paths.len();
        self.clipboard.set_cut(paths);
        Ok(count)
    }

    /// Paste the clipboard into the current directory, then refresh.
    pub fn paste(&mut self) -> FsResult<OperationComplete> {
        let result = paste(&self.clipboard, self.state.current_directory.as_deref());
        self.refresh();
        result
    }

    /// Delete every selected entry, leave multi-select and refresh.
    pub fn delete_selection(&mut self) -> FsResult<OperationComplete> {
        self.require_mode(SessionMode::MultiSelecting, "delete selection")?;
        let targets = self.state.selected_paths();
        let complete = delete_all(&targets);
        self.exit_multi_select();
        self.refresh();
        Ok(complete)
    }

    /// Delete a single entry and refresh.
    pub fn delete_one(&mut self, path: &Path) -> bool {
        let deleted = delete_recursive(path);
        self.refresh();
        deleted
    }

    /// Rename an entry in place, refreshing on success.
    pub fn rename(&mut self, path: &Path, new_name: &str) -> bool {
        let renamed = rename_entry(path, new_name);
        if renamed {
            self.refresh();
        }
        renamed
    }

    /// Create a folder in the current directory.
    pub fn create_folder(&mut self, name: &str) -> bool {
        self.create_with(name, burrow_ops::create_folder)
    }

    /// Create an empty file in the current directory.
    pub fn create_file(&mut self, name: &str) -> bool {
        self.create_with(name, burrow_ops::create_file)
    }

    /// Start compressing a directory. Pass the outcome to [`Self::finish_archive`].
    ///
    /// Works with or without a Tokio runtime; see [`ArchiveJob`].
    pub fn compress(&self, path: impl Into<PathBuf>) -> ArchiveJob {
        start_compress(path)
    }

    /// Start extracting a zip archive. Pass the outcome to [`Self::finish_archive`].
    pub fn extract(&self, path: impl Into<PathBuf>) -> ArchiveJob {
        start_extract(path)
    }

    /// Take in a finished archive job: refresh and report whether it succeeded.
    pub fn finish_archive(&mut self, outcome: &ArchiveComplete) -> bool {
        if let Some(error) = &outcome.error {
            tracing::warn!(
                operation = %outcome.operation_type,
                source = %outcome.source.display(),
                "archive job failed: {error}"
            );
        }
        self.refresh();
        outcome.is_success()
    }

    /// Recompute the storage summary for the current directory or the configured root.
    pub fn update_storage_info(&mut self) {
        let target = self
            .config
            .storage_root
            .clone()
            .or_else(|| self.state.current_directory.clone());
        self.state.storage_info = target
            .as_deref()
            .and_then(storage_info)
            .map(|info| info.to_string())
            .unwrap_or_default();
    }

    fn read(&self, dir: &Path) -> FsResult<(PathBuf, Vec<FileCatalogEntry>)> {
        let dir = fs::canonicalize(dir).map_err(|e| FsError::io(dir, e))?;
        let files = list_directory(&dir, &self.options)?;
        Ok((dir, files))
    }

    fn apply_listing(&mut self, dir: PathBuf, files: Vec<FileCatalogEntry>) {
        tracing::debug!(dir = %dir.display(), entries = files.len(), "listed");
        self.state.breadcrumbs = breadcrumbs(&dir);
        self.state.current_directory = Some(dir);
        self.state.files = files;
        self.state.clear_selection();
        self.state.is_loading = false;
    }

    fn create_with(&mut self, name: &str, create: fn(&Path, &str) -> bool) -> bool {
        let Some(dir) = self.state.current_directory.clone() else {
            return false;
        };
        let created = create(&dir, name);
        if created {
            self.refresh();
        }
        created
    }

    fn take_selection(&mut self, action: &'static str) -> FsResult<Vec<PathBuf>> {
        self.require_mode(SessionMode::MultiSelecting, action)?;
        if self.state.selected.is_empty() {
            return Err(FsError::EmptySelection);
        }
        let paths = self.state.selected_paths();
        self.exit_multi_select();
        Ok(paths)
    }

    fn require_mode(&self, mode: SessionMode, action: &'static str) -> FsResult<()> {
        if self.state.mode == mode {
            Ok(())
        } else {
            Err(FsError::InvalidState {
                action,
                mode: self.state.mode.to_string(),
            })
        }
    }

    fn require_listed(&self, path: &Path) -> FsResult<()> {
        if self.state.is_listed(path) {
            Ok(())
        } else {
            Err(FsError::NotFound {
                path: path.to_path_buf(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session_in(dir: &Path) -> ExplorerSession {
        let mut session = ExplorerSession::new(ClipboardStore::new(), ExplorerConfig::default());
        assert!(session.navigate(dir));
        session
    }

    fn listed(session: &ExplorerSession, name: &str) -> PathBuf {
        session
            .state()
            .files
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.path.clone())
            .unwrap()
    }

    #[test]
    fn test_selection_requires_multi_select() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), b"").unwrap();
        let mut session = session_in(temp.path());
        let a = listed(&session, "a.txt");

        assert!(matches!(
            session.toggle_selection(&a),
            Err(FsError::InvalidState { .. })
        ));
        assert!(matches!(
            session.copy_selection(),
            Err(FsError::InvalidState { .. })
        ));

        session.enter_multi_select(&a).unwrap();
        assert!(matches!(
            session.enter_multi_select(&a),
            Err(FsError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_enter_requires_listed_path() {
        let temp = TempDir::new().unwrap();
        let mut session = session_in(temp.path());
        let err = session
            .enter_multi_select(&temp.path().join("ghost"))
            .unwrap_err();
        assert!(matches!(err, FsError::NotFound { .. }));
        assert_eq!(session.state().mode, SessionMode::Browsing);
    }

    #[test]
    fn test_toggle_back_to_empty_stays_in_multi_select() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), b"").unwrap();
        let mut session = session_in(temp.path());
        let a = listed(&session, "a.txt");

        session.enter_multi_select(&a).unwrap();
        assert!(session.state().files[0].selected);
        session.toggle_selection(&a).unwrap();

        assert!(session.state().selected.is_empty());
        assert!(session.state().is_multi_select_mode());
        assert!(!session.state().files[0].selected);
        assert!(matches!(
            session.cut_selection(),
            Err(FsError::EmptySelection)
        ));
    }

    #[test]
    fn test_select_all_and_copy() {
        let temp = TempDir::new().unwrap();
        for name in ["a.txt", "b.txt", "c"] {
            fs::write(temp.path().join(name), b"").unwrap();
        }
        let mut session = session_in(temp.path());
        let a = listed(&session, "a.txt");

        session.enter_multi_select(&a).unwrap();
        session.select_all().unwrap();
        assert_eq!(session.state().selected.len(), 3);

        assert_eq!(session.copy_selection().unwrap(), 3);
        assert_eq!(session.state().mode, SessionMode::Browsing);
        assert!(session.state().selected.is_empty());
        assert!(session.has_clipboard_content());
        assert!(!session.clipboard().is_cut());
    }

    #[test]
    fn test_navigate_up_and_breadcrumbs() {
        let temp = TempDir::new().unwrap();
        let inner = temp.path().join("inner");
        fs::create_dir(&inner).unwrap();

        let mut session = session_in(&inner);
        assert_eq!(
            session.state().breadcrumbs.last().map(|c| c.name.as_str()),
            Some("inner")
        );
        assert!(session.navigate_up());
        assert_eq!(
            session.state().current_directory.as_deref(),
            Some(fs::canonicalize(temp.path()).unwrap().as_path())
        );
    }

    #[test]
    fn test_navigate_missing_keeps_state() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), b"").unwrap();
        let mut session = session_in(temp.path());
        let before = session.state().current_directory.clone();

        assert!(!session.navigate(temp.path().join("missing")));
        assert_eq!(session.state().current_directory, before);
        assert_eq!(session.state().files.len(), 1);
        assert!(session.state().error_message.is_some());
        assert!(!session.state().is_loading);

        session.clear_error();
        assert!(session.state().error_message.is_none());
    }

    #[test]
    fn test_pull_refresh_records_outcome() {
        let temp = TempDir::new().unwrap();
        let mut session = session_in(temp.path());
        fs::write(temp.path().join("late.txt"), b"").unwrap();

        assert!(session.pull_refresh());
        assert_eq!(session.state().refresh_success, Some(true));
        assert!(!session.state().is_refreshing);
        assert_eq!(session.state().files.len(), 1);

        session.clear_refresh_success();
        assert_eq!(session.state().refresh_success, None);
    }

    #[test]
    fn test_create_and_rename_refresh() {
        let temp = TempDir::new().unwrap();
        let mut session = session_in(temp.path());

        assert!(session.create_folder("docs"));
        assert!(session.create_file("todo.txt"));
        assert!(!session.create_file("todo.txt"));
        assert_eq!(session.state().files.len(), 2);

        let todo = listed(&session, "todo.txt");
        assert!(session.rename(&todo, "done.txt"));
        let names: Vec<&str> = session.state().files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["docs", "done.txt"]);
    }

    #[test]
    fn test_load_initial_once() {
        let temp = TempDir::new().unwrap();
        let mut session = ExplorerSession::new(ClipboardStore::new(), ExplorerConfig::default());
        assert!(session.load_initial(Some(temp.path())));
        assert_eq!(
            session.state().current_directory.as_deref(),
            Some(fs::canonicalize(temp.path()).unwrap().as_path())
        );
        assert!(!session.load_initial(None));
    }

    #[test]
    fn test_load_initial_falls_back_to_start_directory() {
        let temp = TempDir::new().unwrap();
        let start = temp.path().join("start");
        fs::create_dir(&start).unwrap();
        let config = ExplorerConfig::builder()
            .start_directory(start.clone())
            .build()
            .unwrap();

        let mut session = ExplorerSession::new(ClipboardStore::new(), config);
        assert!(session.load_initial(Some(&temp.path().join("gone"))));
        assert_eq!(
            session.state().current_directory.as_deref(),
            Some(fs::canonicalize(&start).unwrap().as_path())
        );
    }
}
