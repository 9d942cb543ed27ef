//! Copying files and directory trees.
//!
//! Files are copied to a hidden temp sibling, fsynced, then renamed over the
//! destination, so a reader never sees a half-written file at the final path.
//! Trees are copied in three passes driven by the traversal engine:
//! directories parent-first, files in parallel, then directory modes and
//! times deepest-first (a read-only directory must stay writable until its
//! children are in place).

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::helpers::{io_error_keep_kind, io_error_with_help};
use super::kind::{PathKind, probe};
use super::metadata::{preserve_metadata, preserve_xattrs};
use super::util;
use crate::errors::{FsError, Result};
use crate::paths::is_within;
use crate::walk::{Entry, EntryKind, Walk, WalkOptions};

/// Copy one file's bytes, mode and (best-effort) times. Missing parents of
/// `dst` are created; an existing `dst` is replaced.
pub fn copy_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    let meta = fs::metadata(src).map_err(io_error_with_help("stat source file", src))?;
    if meta.is_dir() {
        return Err(FsError::NotAFile(src.to_path_buf()));
    }
    safe_copy_and_rename(src, dst)?;
    preserve_metadata(dst, &meta);
    preserve_xattrs(src, dst);
    debug!(src = %src.display(), dst = %dst.display(), bytes = meta.len(), "copied file");
    Ok(())
}

/// Core: copy src -> temp in dest dir, fsync, then rename temp -> dest.
pub(super) fn safe_copy_and_rename(src: &Path, dest: &Path) -> Result<()> {
    let dest_dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dest_dir).map_err(io_error_with_help("create destination directory", dest_dir))?;

    let tmp_path = util::unique_temp_path(dest_dir);
    if let Err(e) = fs::copy(src, &tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error_with_help("copy to temporary file", src)(e));
    }
    // Durability before the name becomes visible.
    if let Err(e) = util::fsync_file(&tmp_path) {
        debug!(path = %tmp_path.display(), error = %e, "fsync of temporary file failed");
    }

    if let Err(e) = rename_over(&tmp_path, dest) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(())
}

/// Rename that replaces an existing destination on every platform, then
/// fsyncs the destination directory (Unix, best-effort).
pub(super) fn rename_over(from: &Path, to: &Path) -> Result<()> {
    // Windows: rename doesn't overwrite there.
    #[cfg(windows)]
    if let Ok(meta) = fs::symlink_metadata(to)
        && !meta.is_dir()
    {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to).map_err(io_error_keep_kind("rename into place", to))?;
    if let Some(parent) = to.parent() {
        let _ = util::fsync_dir(parent);
    }
    Ok(())
}

/// Copy a directory tree. `dst` and its missing parents are created; `dst`
/// may already exist, in which case colliding files are replaced.
pub fn copy_dir(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    let src_meta = fs::metadata(src).map_err(io_error_with_help("stat source directory", src))?;
    if !src_meta.is_dir() {
        return Err(FsError::NotADirectory(src.to_path_buf()));
    }
    if is_within(dst, src) {
        return Err(FsError::DestinationInsideSource {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
    }

    fs::create_dir_all(dst).map_err(io_error_keep_kind("create destination directory", dst))?;

    let opts = WalkOptions::new().recursive(true).map(Entry::clone);
    let entries: Vec<Entry> = Walk::new(src, &opts)?.collect::<Result<_>>()?;

    let mut dirs: Vec<&Entry> = Vec::new();
    let mut files: Vec<&Entry> = Vec::new();
    let mut links: Vec<&Entry> = Vec::new();
    for e in &entries {
        match e.kind() {
            EntryKind::Dir => dirs.push(e),
            EntryKind::File => files.push(e),
            EntryKind::Symlink => links.push(e),
            EntryKind::Other => {
                warn!(path = %e.full_path().display(), "skipping special file");
            }
        }
    }

    // Pass 1: directories, parent-first (breadth-first dispatch order).
    for d in &dirs {
        let target = dst.join(d.relative_path());
        ensure_plain_dir(&target)?;
    }

    // Pass 2: files in parallel, then links.
    files.par_iter().try_for_each(|f| -> Result<()> {
        let target = dst.join(f.relative_path());
        safe_copy_and_rename(f.full_path(), &target)?;
        preserve_metadata(&target, f.metadata());
        preserve_xattrs(f.full_path(), &target);
        Ok(())
    })?;
    for l in &links {
        copy_symlink(l.full_path(), &dst.join(l.relative_path()))?;
    }

    // Pass 3: directory metadata, deepest first, root last.
    let mut by_depth = dirs.clone();
    by_depth.sort_by_key(|d| std::cmp::Reverse(d.depth()));
    for d in by_depth {
        preserve_metadata(&dst.join(d.relative_path()), d.metadata());
    }
    preserve_metadata(dst, &src_meta);

    info!(
        src = %src.display(),
        dst = %dst.display(),
        dirs = dirs.len(),
        files = files.len(),
        links = links.len(),
        "copied directory tree"
    );
    Ok(())
}

/// Copy whatever `src` is. A symlink is copied as a link.
pub fn copy(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    match probe(src)? {
        PathKind::Missing => Err(FsError::NotFound(src.to_path_buf())),
        PathKind::Dir => copy_dir(src, dst),
        PathKind::File => copy_file(src, dst),
        PathKind::Other => {
            let is_link = fs::symlink_metadata(src)
                .map(|m| m.file_type().is_symlink())
                .unwrap_or(false);
            if is_link {
                copy_symlink(src, dst)
            } else {
                copy_file(src, dst)
            }
        }
    }
}

fn ensure_plain_dir(target: &Path) -> Result<()> {
    match fs::symlink_metadata(target) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(FsError::NotADirectory(target.to_path_buf())),
        Err(_) => fs::create_dir_all(target).map_err(io_error_keep_kind("create directory", target)),
    }
}

/// Recreate a symlink with the same (unresolved) target.
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let target: PathBuf = fs::read_link(src).map_err(io_error_with_help("read link", src))?;
    if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error_keep_kind("create parent directory", parent))?;
    }
    if let Ok(meta) = fs::symlink_metadata(dst)
        && !meta.is_dir()
    {
        fs::remove_file(dst).map_err(io_error_keep_kind("replace existing link", dst))?;
    }
    crate::platform::symlink(&target, dst).map_err(io_error_keep_kind("create symlink", dst))?;
    debug!(src = %src.display(), dst = %dst.display(), target = %target.display(), "copied symlink");
    Ok(())
}
