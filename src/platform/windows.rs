//! Windows implementations of platform helpers (best-effort).
//!
//! Notes:
//! - Windows lacks POSIX mode semantics; only the read-only attribute is mapped.
//! - We do not attempt ACL management here.

use std::fs::{self, File, Metadata, OpenOptions};
use std::io;
use std::path::Path;

use crate::mode::Mode;

/// Map the write bits onto the read-only attribute.
pub fn set_mode(path: &Path, mode: Mode) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_readonly(mode.is_readonly());
    fs::set_permissions(path, perms)
}

/// Synthesize a mode from the read-only attribute.
pub fn mode_of(meta: &Metadata) -> Mode {
    let base = if meta.is_dir() { 0o777 } else { 0o666 };
    if meta.permissions().readonly() {
        Mode::from(base & !0o222)
    } else {
        Mode::from(base)
    }
}

/// Windows needs to know whether the target is a directory; dangling targets
/// are treated as files.
pub fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    let resolved = link.parent().map(|p| p.join(target)).unwrap_or_else(|| target.to_path_buf());
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

/// Open log file for appending (best-effort; no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}
