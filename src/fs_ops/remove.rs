//! Deletion. A path that is already gone counts as deleted.

use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::helpers::io_error_with_help;
use super::kind::{PathKind, probe};
use crate::errors::{FsError, Result};
use crate::walk::{Walk, WalkOptions};

/// Remove one non-directory.
pub fn delete_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match probe(path)? {
        PathKind::Missing => Ok(()),
        PathKind::Dir => Err(FsError::NotAFile(path.to_path_buf())),
        PathKind::File | PathKind::Other => remove_file_quiet(path),
    }
}

/// Remove a directory tree. Contents go first (files, then directories from
/// the deepest level up), then the directory itself.
pub fn delete_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match probe(path)? {
        PathKind::Missing => return Ok(()),
        PathKind::File | PathKind::Other => {
            return Err(FsError::NotADirectory(path.to_path_buf()));
        }
        PathKind::Dir => {}
    }

    let opts = WalkOptions::new()
        .recursive(true)
        .map(|e| (e.full_path().to_path_buf(), e.is_dir(), e.depth()));
    let mut dirs: Vec<(PathBuf, usize)> = Vec::new();
    let mut files: Vec<PathBuf> = Vec::new();
    for item in Walk::new(path, &opts)? {
        let (full, is_dir, depth) = item?;
        if is_dir {
            dirs.push((full, depth));
        } else {
            files.push(full);
        }
    }

    files.par_iter().try_for_each(|f| remove_file_quiet(f))?;
    dirs.sort_by(|a, b| b.1.cmp(&a.1));
    for (dir, _) in &dirs {
        remove_dir_quiet(dir)?;
    }
    remove_dir_quiet(path)?;
    info!(path = %path.display(), files = files.len(), dirs = dirs.len(), "deleted directory tree");
    Ok(())
}

/// Delete whatever is at `path`; nothing there is fine.
pub fn delete(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match probe(path)? {
        PathKind::Missing => Ok(()),
        PathKind::Dir => delete_dir(path),
        PathKind::File | PathKind::Other => remove_file_quiet(path),
    }
}

fn remove_file_quiet(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed file");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error_with_help("remove file", path)(e)),
    }
}

fn remove_dir_quiet(path: &Path) -> Result<()> {
    match fs::remove_dir(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed directory");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error_with_help("remove directory", path)(e)),
    }
}
