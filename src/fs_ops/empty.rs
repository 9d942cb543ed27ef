//! Emptying files and directories. Both create the target when it is missing.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::helpers::io_error_with_help;
use super::kind::{PathKind, probe};
use super::remove::{delete_dir, delete_file};
use crate::errors::{FsError, Result};
use crate::list::list_all;
use crate::walk::WalkOptions;

/// Truncate to zero bytes, creating the file and its parents if needed.
pub fn empty_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if probe(path)? == PathKind::Dir {
        return Err(FsError::NotAFile(path.to_path_buf()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error_with_help("create parent directory", parent))?;
    }
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(io_error_with_help("truncate file", path))?;
    debug!(path = %path.display(), "emptied file");
    Ok(())
}

/// Leave `path` as an existing, empty directory.
pub fn empty_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match probe(path)? {
        PathKind::Missing => {
            fs::create_dir_all(path).map_err(io_error_with_help("create directory", path))?;
            debug!(path = %path.display(), "created empty directory");
            return Ok(());
        }
        PathKind::File | PathKind::Other => return Err(FsError::NotADirectory(path.to_path_buf())),
        PathKind::Dir => {}
    }

    let opts = WalkOptions::new()
        .prepend_dir(true)
        .map(|e| (e.full_path().to_path_buf(), e.is_dir()));
    let children: Vec<(PathBuf, bool)> = list_all(path, &opts)?;
    for (child, is_dir) in &children {
        if *is_dir {
            delete_dir(child)?;
        } else {
            delete_file(child)?;
        }
    }
    debug!(path = %path.display(), removed = children.len(), "emptied directory");
    Ok(())
}

/// Empty whatever is at `path`. A missing path becomes an empty directory.
pub fn empty(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match probe(path)? {
        PathKind::File | PathKind::Other => empty_file(path),
        PathKind::Dir | PathKind::Missing => empty_dir(path),
    }
}
