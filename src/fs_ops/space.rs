//! Free-space checks ahead of cross-device copies.

use std::path::Path;
use tracing::debug;

use super::helpers::io_error_with_help;
use crate::errors::{FsError, Result};

/// Headroom kept free on the destination filesystem.
const CUSHION: u64 = 4 * 1024 * 1024;

pub(super) fn format_bytes(n: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let f = n as f64;
    if f >= GB {
        format!("{:.1} GiB", f / GB)
    } else if f >= MB {
        format!("{:.1} MiB", f / MB)
    } else if f >= KB {
        format!("{:.1} KiB", f / KB)
    } else {
        format!("{} B", n)
    }
}

/// Fail with `InsufficientSpace` unless `dst_dir`'s filesystem has room for
/// `required` bytes plus a small cushion.
pub(super) fn ensure_space_for_copy(dst_dir: &Path, required: u64) -> Result<()> {
    let free = fs2::available_space(dst_dir).map_err(io_error_with_help("query free space", dst_dir))?;
    debug!(
        dest = %dst_dir.display(),
        required = %format_bytes(required),
        free = %format_bytes(free),
        "free-space check"
    );
    if free < required.saturating_add(CUSHION) {
        return Err(FsError::InsufficientSpace {
            dest: dst_dir.to_path_buf(),
            required,
            available: free,
        });
    }
    Ok(())
}
