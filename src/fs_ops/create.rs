//! Creating files and directories, parents included.
//!
//! An explicit mode is applied with chmod after creation, so it is exact
//! (the umask does not mask it) and it also lands on paths that already
//! existed. Without a mode, new paths get the platform default and existing
//! paths keep whatever they had.

use std::fs;
use std::path::Path;
use tracing::debug;

use super::helpers::io_error_with_help;
use super::kind::{PathKind, probe};
use super::metadata::apply_mode;
use crate::errors::{FsError, Result};
use crate::mode::Mode;

/// `mkdir -p`, then the mode (if any) on the final directory.
pub fn create_dir(path: impl AsRef<Path>, mode: Option<Mode>) -> Result<()> {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(meta) if !meta.is_dir() => return Err(FsError::NotADirectory(path.to_path_buf())),
        _ => {}
    }
    fs::create_dir_all(path).map_err(io_error_with_help("create directory", path))?;
    if let Some(mode) = mode {
        apply_mode(path, mode)?;
    }
    debug!(path = %path.display(), mode = ?mode.map(|m| m.to_string()), "directory ready");
    Ok(())
}

/// Same as [`create_dir`].
pub fn ensure_dir(path: impl AsRef<Path>, mode: Option<Mode>) -> Result<()> {
    create_dir(path, mode)
}

/// Write `data` to `path`, replacing any previous content and creating
/// missing parents.
pub fn create_file(path: impl AsRef<Path>, data: impl AsRef<[u8]>, mode: Option<Mode>) -> Result<()> {
    let path = path.as_ref();
    let data = data.as_ref();
    if probe(path)? == PathKind::Dir {
        return Err(FsError::NotAFile(path.to_path_buf()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error_with_help("create parent directory", parent))?;
    }
    fs::write(path, data).map_err(io_error_with_help("write file", path))?;
    if let Some(mode) = mode {
        apply_mode(path, mode)?;
    }
    debug!(path = %path.display(), bytes = data.len(), "file written");
    Ok(())
}

/// Make sure a file exists without touching existing content.
/// Returns `true` when the file was already there.
pub fn ensure_file(path: impl AsRef<Path>, mode: Option<Mode>) -> Result<bool> {
    let path = path.as_ref();
    match probe(path)? {
        PathKind::Dir => Err(FsError::NotAFile(path.to_path_buf())),
        PathKind::Missing => {
            create_file(path, b"", mode)?;
            Ok(false)
        }
        PathKind::File | PathKind::Other => {
            if let Some(mode) = mode {
                apply_mode(path, mode)?;
            }
            Ok(true)
        }
    }
}
