//! Materialized traversals.

use std::path::Path;

use crate::errors::Result;
use crate::walk::{EntryKind, Walk, WalkOptions};

/// Every entry under `root`, in dispatch order (or sorted, when the options
/// carry a sort).
pub fn list_all<R>(root: impl AsRef<Path>, opts: &WalkOptions<R>) -> Result<Vec<R>> {
    Walk::new(root, opts)?.collect()
}

/// Regular files only; the kind check runs before the caller's filter.
pub fn list_files<R>(root: impl AsRef<Path>, opts: &WalkOptions<R>) -> Result<Vec<R>> {
    list_all(root, &opts.restrict(EntryKind::File))
}

/// Directories only.
pub fn list_dirs<R>(root: impl AsRef<Path>, opts: &WalkOptions<R>) -> Result<Vec<R>> {
    list_all(root, &opts.restrict(EntryKind::Dir))
}
