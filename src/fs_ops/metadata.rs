//! Metadata preservation for copies.
//! - Copies timestamps (atime, mtime) and permission bits from a source snapshot.
//! - Best-effort: failures are logged and ignored. Permission bits are the
//!   exception when the caller asks for them strictly (see `apply_mode`).

use filetime::{FileTime, set_file_times};
use std::fs;
use std::path::Path;
use tracing::{trace, warn};

use super::helpers::io_error_with_help;
use crate::errors::Result;
use crate::mode::Mode;
use crate::platform;

/// Preserve times and mode on `dest` using an already-fetched `src_meta`.
pub fn preserve_metadata(dest: &Path, src_meta: &fs::Metadata) {
    preserve_times(dest, src_meta);

    let mode = platform::mode_of(src_meta);
    if let Err(e) = platform::set_mode(dest, mode) {
        warn!(path = %dest.display(), mode = %mode, error = %e, "failed to set permissions on destination");
    } else {
        trace!(path = %dest.display(), mode = %mode, "set permissions on destination");
    }
}

/// Copy atime/mtime only.
pub fn preserve_times(dest: &Path, src_meta: &fs::Metadata) {
    #[cfg(unix)]
    let (at, mt) = {
        use std::os::unix::fs::MetadataExt;
        (
            Some(FileTime::from_unix_time(src_meta.atime(), src_meta.atime_nsec() as u32)),
            Some(FileTime::from_unix_time(src_meta.mtime(), src_meta.mtime_nsec() as u32)),
        )
    };
    #[cfg(not(unix))]
    let (at, mt) = (
        src_meta.accessed().ok().map(FileTime::from_system_time),
        src_meta.modified().ok().map(FileTime::from_system_time),
    );

    let (Some(at), Some(mt)) = (at, mt) else {
        trace!(path = %dest.display(), "source times unavailable; skipping");
        return;
    };
    if let Err(e) = set_file_times(dest, at, mt) {
        warn!(path = %dest.display(), error = %e, "failed to set atime/mtime on destination");
    } else {
        trace!(path = %dest.display(), "set atime/mtime on destination");
    }
}

/// Apply `mode` exactly; unlike the preservation helpers this one reports failure.
pub(super) fn apply_mode(path: &Path, mode: Mode) -> Result<()> {
    platform::set_mode(path, mode).map_err(io_error_with_help("set permissions", path))?;
    trace!(path = %path.display(), mode = %mode, "applied mode");
    Ok(())
}

/// Preserve extended attributes (xattrs) from source path to destination path.
/// Requires the "xattrs" feature, otherwise this is a no-op.
pub fn preserve_xattrs(src: &Path, dest: &Path) {
    #[cfg(feature = "xattrs")]
    {
        let names = match xattr::list(src) {
            Ok(names) => names,
            Err(e) => {
                warn!(src = %src.display(), error = %e, "failed to list xattrs; continuing");
                return;
            }
        };
        for name in names {
            let name_disp = name.to_string_lossy();
            match xattr::get(src, &name) {
                Ok(value) => {
                    let value = value.unwrap_or_default();
                    if let Err(e) = xattr::set(dest, &name, &value) {
                        warn!(dest = %dest.display(), xattr = %name_disp, error = %e, "failed to set xattr on destination");
                    } else {
                        trace!(dest = %dest.display(), xattr = %name_disp, size = value.len(), "preserved xattr");
                    }
                }
                Err(e) => {
                    warn!(src = %src.display(), xattr = %name_disp, error = %e, "failed to read xattr from source");
                }
            }
        }
    }
    #[cfg(not(feature = "xattrs"))]
    {
        let _ = (src, dest);
    }
}
