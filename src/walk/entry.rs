//! A single node discovered by the traversal engine.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use crate::mode::Mode;
use crate::platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    /// Sockets, FIFOs, devices.
    Other,
}

impl EntryKind {
    pub fn from_metadata(meta: &Metadata) -> Self {
        let ft = meta.file_type();
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Dir
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// Path (relative and rooted), a metadata snapshot taken when the entry was
/// read, and the session's `prepend_dir` flag.
#[derive(Debug, Clone)]
pub struct Entry {
    relative: PathBuf,
    full: PathBuf,
    metadata: Metadata,
    prepend_dir: bool,
}

impl Entry {
    pub(crate) fn new(root: &Path, relative: PathBuf, metadata: Metadata, prepend_dir: bool) -> Self {
        let full = root.join(&relative);
        Entry {
            relative,
            full,
            metadata,
            prepend_dir,
        }
    }

    /// Path relative to the traversal root.
    pub fn relative_path(&self) -> &Path {
        &self.relative
    }

    /// Root joined with the relative path.
    pub fn full_path(&self) -> &Path {
        &self.full
    }

    /// What the default mapper emits: the full path under `prepend_dir`,
    /// the relative path otherwise.
    pub fn path(&self) -> &Path {
        if self.prepend_dir {
            &self.full
        } else {
            &self.relative
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn kind(&self) -> EntryKind {
        EntryKind::from_metadata(&self.metadata)
    }

    pub fn is_file(&self) -> bool {
        self.kind() == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind() == EntryKind::Dir
    }

    pub fn is_symlink(&self) -> bool {
        self.kind() == EntryKind::Symlink
    }

    /// Number of components in the relative path; direct children are depth 1.
    pub fn depth(&self) -> usize {
        self.relative.components().count()
    }

    pub fn mode(&self) -> Mode {
        platform::mode_of(&self.metadata)
    }

    pub fn len(&self) -> u64 {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.len() == 0
    }
}
