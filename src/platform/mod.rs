//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{mode_of, open_log_file_secure_append, set_mode, symlink};

#[cfg(not(unix))]
pub use windows::{mode_of, open_log_file_secure_append, set_mode, symlink};
