//! One-stat classification used by the polymorphic operations.

use std::fs;
use std::io;
use std::path::Path;
use tracing::trace;

use super::helpers::io_error_with_help;
use crate::errors::Result;

/// What currently sits at a path. Symlinks are not followed, so a link
/// (dangling or not) is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Dir,
    Other,
    Missing,
}

impl PathKind {
    pub fn of(meta: &fs::Metadata) -> Self {
        let ft = meta.file_type();
        if ft.is_dir() {
            PathKind::Dir
        } else if ft.is_file() {
            PathKind::File
        } else {
            PathKind::Other
        }
    }
}

/// Stat once with `symlink_metadata`; absence is a value, not an error.
pub fn probe(path: impl AsRef<Path>) -> Result<PathKind> {
    let path = path.as_ref();
    let kind = match fs::symlink_metadata(path) {
        Ok(meta) => PathKind::of(&meta),
        Err(e) if e.kind() == io::ErrorKind::NotFound => PathKind::Missing,
        Err(e) => return Err(io_error_with_help("stat", path)(e)),
    };
    trace!(path = %path.display(), ?kind, "probed path");
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn probe_classifies() {
        let td = tempdir().unwrap();
        let f = td.path().join("f");
        fs::write(&f, b"").unwrap();
        assert_eq!(probe(td.path()).unwrap(), PathKind::Dir);
        assert_eq!(probe(&f).unwrap(), PathKind::File);
        assert_eq!(probe(td.path().join("none")).unwrap(), PathKind::Missing);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_other() {
        let td = tempdir().unwrap();
        let link = td.path().join("l");
        std::os::unix::fs::symlink("nowhere", &link).unwrap();
        assert_eq!(probe(&link).unwrap(), PathKind::Other);
    }
}
