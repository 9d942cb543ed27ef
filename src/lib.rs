//! fsops library crate.
//!
//! Convenience file and directory operations built on one recursive walker:
//! create with parents, copy preserving modes, move with a cross-device
//! fallback, delete, empty, list and stream trees, unique paths and JSON files.
//!
//! Every operation is synchronous and returns [`Result`]. The [`callback`]
//! module offers completion-callback forms that run on the rayon pool.
//!
//! ```no_run
//! use fsops::{WalkOptions, list_files};
//!
//! let files = list_files("src", &WalkOptions::new().recursive(true).sorted())?;
//! for f in files {
//!     println!("{}", f.display());
//! }
//! # Ok::<(), fsops::FsError>(())
//! ```

pub mod callback;
pub mod cli;
pub mod config;
mod errors;
pub mod fs_ops;
pub mod json;
pub mod list;
pub mod mode;
pub mod output;
pub mod paths;
pub mod platform;
pub mod shutdown;
pub mod walk;

pub use errors::{FsError, Result};
pub use mode::Mode;

pub use fs_ops::{
    PathKind, copy, copy_dir, copy_file, create_dir, create_file, delete, delete_dir, delete_file,
    empty, empty_dir, empty_file, ensure_dir, ensure_file, move_dir, move_file, move_path, probe,
};
pub use json::{Indent, read_json, write_json};
pub use list::{list_all, list_dirs, list_files};
pub use paths::{DEFAULT_UNIQUE_START, is_within, normalize, split_extension_chain, unique_path};
pub use walk::{
    AbortHandle, Entry, EntryKind, Step, Walk, WalkOptions, WalkTask, walk_all_sync, walk_dirs_sync,
    walk_files_sync,
};

pub use config::{CONFIG_ENV, Config, ConfigSource, LogLevel, default_config_path, load_config};
