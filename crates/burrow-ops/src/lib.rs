//! File operations engine for burrow.
//!
//! This crate provides the synchronous file operations (copy, move, delete,
//! rename, create, paste) with best-effort batch semantics, the shared
//! clipboard slot, and zip compression/extraction jobs that run on a
//! background worker and report completion exactly once.

mod archive;
mod clipboard;
mod conflict;
mod copy;
mod create;
mod delete;
mod move_op;
mod operation;
mod paste;
mod progress;
mod rename;
mod text;

pub use archive::{
    ArchiveComplete, ArchiveJob, compress_to_zip, contained_path, extract_zip, is_zip,
    start_compress, start_extract,
};
pub use clipboard::{ClipboardData, ClipboardMode, ClipboardStore, ClipboardWatch};
pub use conflict::{UNIQUE_NAME_ATTEMPTS, resolve_unique_name, split_name};
pub use copy::{copy_all, copy_dir_recursive, copy_file, copy_into, copy_item};
pub use create::{create_file, create_folder, try_create_file, try_create_folder};
pub use delete::{delete_all, delete_recursive, try_delete_recursive};
pub use move_op::{move_all, move_into, move_item};
pub use operation::OperationError;
pub use paste::paste;
pub use progress::{OperationComplete, OperationType};
pub use rename::{rename_entry, try_rename, validate_filename};
pub use text::TextDocument;
