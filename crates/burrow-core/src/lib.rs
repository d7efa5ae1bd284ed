//! Core types for burrow.
//!
//! This crate provides the data structures shared by the operation engine and
//! the explorer sessions: catalog entries, the error taxonomy, configuration
//! and the picker MIME filter.

mod config;
mod entry;
mod error;
mod filter;

pub use config::{ExplorerConfig, ExplorerConfigBuilder};
pub use entry::{EntryKind, FileCatalogEntry, display_name, extension_of, mime_type_for};
pub use error::{FsError, FsResult};
pub use filter::PickerFilter;
