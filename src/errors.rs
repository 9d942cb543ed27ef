//! Typed error definitions for fsops.
//! One enum covers every operation so callers can match on the failure mode
//! instead of string-sniffing io errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the library.
pub type Result<T, E = FsError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("permission denied: {} '{}': {}", .op, .path.display(), .source)]
    PermissionDenied {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} '{}': {}{}", .op, .path.display(), .source, crate::fs_ops::hint_for(.source))]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cross-device move '{}' -> '{}' failed: {}", .src.display(), .dst.display(), .reason)]
    CrossDevice {
        src: PathBuf,
        dst: PathBuf,
        reason: String,
    },

    #[error("destination '{}' is inside source '{}'", .dst.display(), .src.display())]
    DestinationInsideSource { src: PathBuf, dst: PathBuf },

    #[error("insufficient space in '{}': need {} bytes, have {} bytes", .dest.display(), .required, .available)]
    InsufficientSpace {
        dest: PathBuf,
        required: u64,
        available: u64,
    },

    #[error("invalid mode '{0}': expected octal permission bits such as 755 or 0o644")]
    InvalidMode(String),

    #[error("json '{}': {}", .path.display(), .source)]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl FsError {
    /// Stable numeric code per variant; used as the CLI exit status and in structured logs.
    pub fn code(&self) -> i32 {
        match self {
            FsError::NotFound(_) => 2,
            FsError::NotADirectory(_) => 3,
            FsError::NotAFile(_) => 4,
            FsError::PermissionDenied { .. } => 5,
            FsError::Io { .. } => 6,
            FsError::CrossDevice { .. } => 7,
            FsError::DestinationInsideSource { .. } => 8,
            FsError::InsufficientSpace { .. } => 9,
            FsError::InvalidMode(_) => 10,
            FsError::Json { .. } => 11,
        }
    }

    /// True for the "path is absent" case, whichever layer reported it.
    pub fn is_not_found(&self) -> bool {
        match self {
            FsError::NotFound(_) => true,
            FsError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn codes_are_distinct() {
        let errs = [
            FsError::NotFound(PathBuf::from("a")),
            FsError::NotADirectory(PathBuf::from("a")),
            FsError::NotAFile(PathBuf::from("a")),
            FsError::InvalidMode("x".into()),
        ];
        let mut codes: Vec<i32> = errs.iter().map(FsError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errs.len());
    }

    #[test]
    fn display_mentions_path() {
        let err = FsError::NotADirectory(Path::new("/tmp/some/file").to_path_buf());
        assert!(err.to_string().contains("/tmp/some/file"));
    }
}
