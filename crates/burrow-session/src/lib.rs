//! Explorer sessions for burrow.
//!
//! A session lists one directory at a time, tracks breadcrumbs and a
//! multi-selection, and drives the operations engine against the current
//! directory. Every session is driven through `&mut self`; sessions share
//! nothing except the [`ClipboardStore`](burrow_ops::ClipboardStore) they
//! were given.

mod listing;
mod session;
mod state;
mod storage;

pub use listing::{Breadcrumb, ListOptions, ROOT_NAME, breadcrumbs, list_directory, sort_entries};
pub use session::ExplorerSession;
pub use state::{ExplorerState, SessionMode};
pub use storage::{StorageInfo, storage_info};
