//! JSON file helpers.
//!
//! `Indent::Compact` produces the same bytes as a plain `serde_json::to_vec`.
//! Pretty output uses either N spaces or an arbitrary indent string.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::{FsError, Result};
use crate::fs_ops::io_error_with_help;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Indent {
    #[default]
    Compact,
    Spaces(usize),
    Custom(String),
}

impl From<usize> for Indent {
    fn from(n: usize) -> Self {
        Indent::Spaces(n)
    }
}

impl From<&str> for Indent {
    fn from(s: &str) -> Self {
        Indent::Custom(s.to_string())
    }
}

/// Serialize `value` according to `indent`.
pub fn to_json_vec<T: Serialize + ?Sized>(value: &T, indent: &Indent) -> serde_json::Result<Vec<u8>> {
    let unit: Vec<u8> = match indent {
        Indent::Compact => return serde_json::to_vec(value),
        Indent::Spaces(n) => vec![b' '; *n],
        Indent::Custom(s) => s.as_bytes().to_vec(),
    };
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&unit));
    value.serialize(&mut ser)?;
    Ok(out)
}

/// Write `value` as JSON, creating missing parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T, indent: Indent) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_json_vec(value, &indent).map_err(|source| FsError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error_with_help("create parent directory", parent))?;
    }
    fs::write(path, &bytes).map_err(io_error_with_help("write json", path))?;
    debug!(path = %path.display(), bytes = bytes.len(), ?indent, "wrote json");
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(io_error_with_help("read json", path))?;
    serde_json::from_slice(&bytes).map_err(|source| FsError::Json {
        path: path.to_path_buf(),
        source,
    })
}
