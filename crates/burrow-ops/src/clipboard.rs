//! Shared single-slot clipboard for copy/cut/paste across sessions.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::Display;
use tokio::sync::watch;

/// Clipboard mode determines paste behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ClipboardMode {
    /// Items were copied; pasting keeps the sources.
    Copy,
    /// Items were cut; pasting moves them.
    Cut,
}

/// Pending paste payload. Never holds an empty path list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ClipboardPayload")]
pub struct ClipboardData {
    paths: Vec<PathBuf>,
    mode: ClipboardMode,
}

#[derive(Deserialize)]
struct ClipboardPayload {
    paths: Vec<PathBuf>,
    mode: ClipboardMode,
}

impl TryFrom<ClipboardPayload> for ClipboardData {
    type Error = &'static str;

    fn try_from(payload: ClipboardPayload) -> Result<Self, Self::Error> {
        Self::new(payload.paths, payload.mode).ok_or("clipboard payload has no paths")
    }
}

impl ClipboardData {
    /// Build a payload, or `None` when there are no paths.
    pub fn new(paths: impl IntoIterator<Item = PathBuf>, mode: ClipboardMode) -> Option<Self> {
        let paths: Vec<PathBuf> = paths.into_iter().collect();
        if paths.is_empty() {
            None
        } else {
            Some(Self { paths, mode })
        }
    }

    /// Source paths in the order they were put on the clipboard.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Copy or cut.
    pub fn mode(&self) -> ClipboardMode {
        self.mode
    }

    /// Get the number of items in the clipboard.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the payload holds no paths.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Handle to the shared clipboard slot.
///
/// Clones share the same slot. Every write replaces the slot wholesale and
/// wakes all [`ClipboardWatch`] subscribers.
#[derive(Debug, Clone)]
pub struct ClipboardStore {
    slot: Arc<watch::Sender<Option<ClipboardData>>>,
}

impl ClipboardStore {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { slot: Arc::new(tx) }
    }

    /// Put paths on the clipboard for copying.
    pub fn set_copy(&self, paths: impl IntoIterator<Item = PathBuf>) {
        self.replace(ClipboardData::new(paths, ClipboardMode::Copy));
    }

    /// Put paths on the clipboard for moving.
    pub fn set_cut(&self, paths: impl IntoIterator<Item = PathBuf>) {
        self.replace(ClipboardData::new(paths, ClipboardMode::Cut));
    }

    /// Current payload, if any.
    pub fn get(&self) -> Option<ClipboardData> {
        self.slot.borrow().clone()
    }

    /// True only when the slot holds a cut payload.
    pub fn is_cut(&self) -> bool {
        matches!(
            self.slot.borrow().as_ref().map(ClipboardData::mode),
            Some(ClipboardMode::Cut)
        )
    }

    /// Whether a paste would have anything to do.
    pub fn has_content(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Clear the clipboard.
    pub fn clear(&self) {
        self.replace(None);
    }

    /// Observe the has-content value, starting from the current one.
    pub fn subscribe(&self) -> ClipboardWatch {
        ClipboardWatch {
            rx: self.slot.subscribe(),
        }
    }

    fn replace(&self, data: Option<ClipboardData>) {
        tracing::debug!(
            mode = ?data.as_ref().map(ClipboardData::mode),
            items = data.as_ref().map_or(0, ClipboardData::len),
            "clipboard updated"
        );
        self.slot.send_replace(data);
    }
}

impl Default for ClipboardStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriber to clipboard changes.
#[derive(Debug, Clone)]
pub struct ClipboardWatch {
    rx: watch::Receiver<Option<ClipboardData>>,
}

impl ClipboardWatch {
    /// Latest has-content value.
    pub fn has_content(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Wait for the next clipboard write and return the new has-content value.
    ///
    /// Returns `None` once every store handle has been dropped.
    pub async fn changed(&mut self) -> Option<bool> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().is_some())
    }
}
