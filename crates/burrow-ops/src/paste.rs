//! Paste: apply the clipboard to a destination directory.

use std::path::Path;

use burrow_core::{FsError, FsResult};

use crate::clipboard::{ClipboardMode, ClipboardStore};
use crate::copy::copy_all;
use crate::move_op::move_all;
use crate::progress::OperationComplete;

/// Paste the clipboard into `destination`.
///
/// Fails without touching anything when the clipboard is empty or there is no
/// destination. Otherwise every item is copied or moved best-effort; after a
/// cut the clipboard is cleared whether or not every item made it.
pub fn paste(
    clipboard: &ClipboardStore,
    destination: Option<&Path>,
) -> FsResult<OperationComplete> {
    let data = clipboard.get().ok_or(FsError::ClipboardEmpty)?;
    let destination = destination.ok_or(FsError::NoDestination)?;

    tracing::debug!(
        mode = %data.mode(),
        items = data.len(),
        destination = %destination.display(),
        "paste"
    );

    let complete = match data.mode() {
        ClipboardMode::Copy => copy_all(data.paths(), destination),
        ClipboardMode::Cut => {
            let complete = move_all(data.paths(), destination);
            clipboard.clear();
            complete
        }
    };

    Ok(complete)
}
