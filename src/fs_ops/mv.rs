//! Moving files and directories.
//! Tries a rename first; across filesystems it degrades to a free-space
//! check, a copy and a delete of the source.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

use super::copy::{copy, copy_dir, copy_file};
use super::helpers::io_error_with_help;
use super::kind::{PathKind, probe};
use super::remove::{delete, delete_dir, delete_file};
use super::space::ensure_space_for_copy;
use super::util::is_cross_device;
use crate::errors::{FsError, Result};
use crate::paths::{is_within, same_location};
use crate::walk::{Walk, WalkOptions};

/// Move one file to `dst`, creating missing parents.
pub fn move_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    match probe(src)? {
        PathKind::Missing => return Err(FsError::NotFound(src.to_path_buf())),
        PathKind::Dir => return Err(FsError::NotAFile(src.to_path_buf())),
        PathKind::File | PathKind::Other => {}
    }
    let size = fs::symlink_metadata(src).map(|m| m.len()).unwrap_or(0);
    rename_or_fallback(src, dst, || size, || copy_file(src, dst), || delete_file(src))
}

/// Move a directory tree to `dst`, creating missing parents.
pub fn move_dir(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    match probe(src)? {
        PathKind::Missing => return Err(FsError::NotFound(src.to_path_buf())),
        PathKind::File | PathKind::Other => return Err(FsError::NotADirectory(src.to_path_buf())),
        PathKind::Dir => {}
    }
    if same_location(src, dst) {
        debug!(path = %src.display(), "move onto itself; nothing to do");
        return Ok(());
    }
    if is_within(dst, src) {
        return Err(FsError::DestinationInsideSource {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
    }
    rename_or_fallback(src, dst, || tree_size(src), || copy_dir(src, dst), || delete_dir(src))
}

/// Move whatever `src` is.
pub fn move_path(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    match probe(src)? {
        PathKind::Missing => Err(FsError::NotFound(src.to_path_buf())),
        PathKind::Dir => move_dir(src, dst),
        PathKind::File => move_file(src, dst),
        // Links move as links.
        PathKind::Other => rename_or_fallback(src, dst, || 0, || copy(src, dst), || delete(src)),
    }
}

fn rename_or_fallback<S, C, D>(src: &Path, dst: &Path, size: S, copy_fn: C, delete_fn: D) -> Result<()>
where
    S: FnOnce() -> u64,
    C: FnOnce() -> Result<()>,
    D: FnOnce() -> Result<()>,
{
    let parent = dst.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        fs::create_dir_all(parent).map_err(io_error_with_help("create destination parent", parent))?;
    }

    match rename(src, dst) {
        Ok(()) => {
            info!(src = %src.display(), dst = %dst.display(), "renamed");
            Ok(())
        }
        Err(e) if is_cross_device(&e) => {
            warn!(src = %src.display(), dst = %dst.display(), "cross-filesystem move; copying then deleting source");
            let space_dir = parent.unwrap_or_else(|| Path::new("."));
            let fallback = || -> Result<()> {
                ensure_space_for_copy(space_dir, size())?;
                copy_fn()?;
                delete_fn()
            };
            fallback().map_err(|e| FsError::CrossDevice {
                src: src.to_path_buf(),
                dst: dst.to_path_buf(),
                reason: e.to_string(),
            })?;
            info!(src = %src.display(), dst = %dst.display(), "moved across filesystems");
            Ok(())
        }
        Err(e) => Err(io_error_with_help("rename", src)(e)),
    }
}

fn rename(src: &Path, dst: &Path) -> io::Result<()> {
    // Windows: rename doesn't overwrite existing files there.
    #[cfg(windows)]
    if let Ok(meta) = fs::symlink_metadata(dst)
        && meta.is_file()
    {
        fs::remove_file(dst)?;
    }
    fs::rename(src, dst)
}

/// Total bytes of regular files under `root`; an unreadable tree counts as
/// zero here and fails later during the copy.
fn tree_size(root: &Path) -> u64 {
    let opts = WalkOptions::new().recursive(true).map(|e| if e.is_file() { e.len() } else { 0 });
    match Walk::new(root, &opts) {
        Ok(walk) => walk.filter_map(Result::ok).sum(),
        Err(_) => 0,
    }
}
