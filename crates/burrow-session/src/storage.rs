//! Storage usage of the volume holding a directory.

use std::fmt;
use std::path::{Path, PathBuf};

use humansize::{BINARY, format_size};
use sysinfo::Disks;

/// Capacity of one mounted volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageInfo {
    pub mount_point: PathBuf,
    pub total: u64,
    pub available: u64,
}

impl StorageInfo {
    /// Bytes in use.
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.available)
    }
}

impl fmt::Display for StorageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Used {} / Total {}",
            format_size(self.used(), BINARY),
            format_size(self.total, BINARY)
        )
    }
}

/// Usage of the volume `path` lives on, picked by the longest matching mount point.
pub fn storage_info(path: &Path) -> Option<StorageInfo> {
    let disks = Disks::new_with_refreshed_list();
    let info = disks
        .list()
        .iter()
        .filter(|disk| path.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(|disk| StorageInfo {
            mount_point: disk.mount_point().to_path_buf(),
            total: disk.total_space(),
            available: disk.available_space(),
        });
    if info.is_none() {
        tracing::debug!(path = %path.display(), "no mounted volume contains path");
    }
    info
}
