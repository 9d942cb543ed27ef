//! I/O helper utilities.
//!
//! Classifies `io::Error`s into [`FsError`] variants and adds actionable,
//! platform-aware hints to the generic I/O case.
//!
//! Usage:
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create directory", dir))?;

use std::io;
use std::path::Path;

use crate::errors::FsError;

/// Platform-aware hint appended to `FsError::Io` messages (empty when nothing useful applies).
pub fn hint_for(e: &io::Error) -> String {
    let mut msg = String::new();

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str(" (permission denied; check ownership and write permissions)");
                }
                libc::EXDEV => {
                    msg.push_str(" (cross-filesystem; atomic rename not possible)");
                }
                libc::EBUSY => {
                    msg.push_str(" (resource busy; ensure no other process is using it)");
                }
                libc::ENOENT => {
                    msg.push_str(" (path not found; verify it exists)");
                }
                libc::EEXIST => {
                    msg.push_str(" (already exists; pick a unique name or remove the target)");
                }
                libc::ENOTEMPTY => {
                    msg.push_str(" (directory not empty)");
                }
                libc::ENOSPC => {
                    msg.push_str(" (insufficient space on device)");
                }
                libc::EROFS => {
                    msg.push_str(" (read-only filesystem; cannot write here)");
                }
                libc::ELOOP => {
                    msg.push_str(" (too many symbolic link levels; possible symlink cycle)");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str(" (filename or path too long; shorten path segments)");
                }
                libc::EMFILE | libc::ENFILE => {
                    msg.push_str(" (file descriptor limit reached; close files or raise limits)");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str(" (access denied; check permissions)"),
                17 => msg.push_str(" (not same device; cross-filesystem move)"),
                32 => msg.push_str(" (sharing violation; file is in use)"),
                2 | 3 => msg.push_str(" (path not found; verify it exists)"),
                80 | 183 => msg.push_str(" (already exists; pick a unique name)"),
                112 => msg.push_str(" (insufficient disk space)"),
                19 => msg.push_str(" (write protected / read-only media)"),
                206 => msg.push_str(" (filename or path too long)"),
                4 => msg.push_str(" (too many open files)"),
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {code}]"));
    } else {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                msg.push_str(" (permission denied; check ownership and write permissions)");
            }
            io::ErrorKind::NotFound => {
                msg.push_str(" (path not found; verify it exists)");
            }
            io::ErrorKind::AlreadyExists => {
                msg.push_str(" (already exists; remove or choose a unique name)");
            }
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                msg.push_str(" (busy/timed out; retry later)");
            }
            _ => {}
        }
    }

    msg
}

/// Classify an io::Error for `op` on `path`.
pub fn classify(op: &'static str, path: &Path, e: io::Error) -> FsError {
    match e.kind() {
        io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => FsError::PermissionDenied {
            op,
            path: path.to_path_buf(),
            source: e,
        },
        _ => FsError::Io {
            op,
            path: path.to_path_buf(),
            source: e,
        },
    }
}

/// Adapter returning a closure suitable for `.map_err(...)`.
pub fn io_error_with_help<'a>(
    op: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> FsError + 'a {
    move |e: io::Error| classify(op, path, e)
}

/// Like [`io_error_with_help`] but never collapses to `NotFound`.
/// Used where a missing path is an internal race rather than a caller mistake
/// (e.g. the destination side of a copy).
pub fn io_error_keep_kind<'a>(
    op: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> FsError + 'a {
    move |e: io::Error| match e.kind() {
        io::ErrorKind::PermissionDenied => FsError::PermissionDenied {
            op,
            path: path.to_path_buf(),
            source: e,
        },
        _ => FsError::Io {
            op,
            path: path.to_path_buf(),
            source: e,
        },
    }
}
