//! Filesystem operations: modularized.

mod copy;
mod create;
mod empty;
mod helpers;
mod kind;
mod metadata;
mod mv;
mod remove;
mod space;
mod util;

pub use copy::{copy, copy_dir, copy_file};
pub use create::{create_dir, create_file, ensure_dir, ensure_file};
pub use empty::{empty, empty_dir, empty_file};
pub use helpers::{hint_for, io_error_with_help};
pub use kind::{PathKind, probe};
pub use metadata::{preserve_metadata, preserve_times, preserve_xattrs};
pub use mv::{move_dir, move_file, move_path};
pub use remove::{delete, delete_dir, delete_file};
