//! Path utilities: lexical normalization, containment checks and
//! collision-free name generation.
//!
//! `unique_path` appends `-N` before the *whole* extension chain, so
//! `backup.tar.gz` becomes `backup-2.tar.gz` rather than `backup.tar-2.gz`.
//! Leading dots belong to the stem (`.env` -> `.env-2`).

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::trace;

use crate::errors::Result;
use crate::fs_ops::io_error_with_help;

/// First suffix tried by [`unique_path`] callers that have no preference.
pub const DEFAULT_UNIQUE_START: u64 = 2;

// Conservative filename limits (bytes/characters, platform-specific and approximate).
#[cfg(windows)]
const MAX_FILENAME_LEN: usize = 240;
#[cfg(not(windows))]
const MAX_FILENAME_LEN: usize = 255;

/// Return `path` if nothing exists there, else the first `<stem>-N<.chain>`
/// (N = `start`, `start + 1`, ...) that is free.
///
/// A dangling symlink counts as "exists".
pub fn unique_path(path: impl AsRef<Path>, start: u64) -> Result<PathBuf> {
    let path = path.as_ref();
    if !occupied(path)? {
        return Ok(path.to_path_buf());
    }

    let Some(name) = path.file_name() else {
        // "/" or "..": nothing to suffix, hand it back unchanged.
        return Ok(path.to_path_buf());
    };
    let (stem, chain) = split_extension_chain(name);
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    let mut n = start;
    let mut collisions = 0u32;
    loop {
        let suffix = format!("-{n}");
        let candidate = parent.join(build_name_with_suffix(&stem, chain.as_deref(), &suffix));
        if !occupied(&candidate)? {
            trace!(path = %path.display(), unique = %candidate.display(), "unique_path resolved");
            return Ok(candidate);
        }
        collisions = collisions.saturating_add(1);
        if collisions == 3 {
            trace!(path = %path.display(), "unique_path: multiple collisions, continuing to search");
        }
        n = n.saturating_add(1);
    }
}

fn occupied(p: &Path) -> Result<bool> {
    match fs::symlink_metadata(p) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error_with_help("stat candidate path", p)(e)),
    }
}

/// Split a file name at the first dot that is not part of a leading dot run.
///
/// ```
/// use std::ffi::OsStr;
/// use fsops::paths::split_extension_chain;
///
/// let (stem, chain) = split_extension_chain(OsStr::new("archive.tar.gz"));
/// assert_eq!(stem, "archive");
/// assert_eq!(chain.as_deref(), Some(OsStr::new("tar.gz")));
///
/// let (stem, chain) = split_extension_chain(OsStr::new(".env"));
/// assert_eq!(stem, ".env");
/// assert!(chain.is_none());
/// ```
pub fn split_extension_chain(name: &OsStr) -> (OsString, Option<OsString>) {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        let bytes = name.as_bytes();
        match chain_split_index(bytes) {
            Some(i) => (
                OsStr::from_bytes(&bytes[..i]).to_os_string(),
                Some(OsStr::from_bytes(&bytes[i + 1..]).to_os_string()),
            ),
            None => (name.to_os_string(), None),
        }
    }
    #[cfg(not(unix))]
    {
        // Non-Unicode names keep their full name as the stem.
        let Some(s) = name.to_str() else {
            return (name.to_os_string(), None);
        };
        match chain_split_index(s.as_bytes()) {
            Some(i) => (OsString::from(&s[..i]), Some(OsString::from(&s[i + 1..]))),
            None => (name.to_os_string(), None),
        }
    }
}

fn chain_split_index(bytes: &[u8]) -> Option<usize> {
    let lead = bytes.iter().take_while(|&&b| b == b'.').count();
    let rel = bytes[lead..].iter().position(|&b| b == b'.')?;
    let i = lead + rel;
    // "name." has no real chain
    if i + 1 >= bytes.len() { None } else { Some(i) }
}

/// Measure the approximate length of an OsStr for filename budgeting.
#[cfg(unix)]
fn name_len_units(s: &OsStr) -> usize {
    use std::os::unix::ffi::OsStrExt;
    s.as_bytes().len()
}

#[cfg(not(unix))]
fn name_len_units(s: &OsStr) -> usize {
    s.to_string_lossy().len()
}

/// `stem + suffix + ["." + chain]`, with the stem trimmed so the result fits
/// `MAX_FILENAME_LEN`.
fn build_name_with_suffix(stem: &OsStr, chain: Option<&OsStr>, suffix: &str) -> OsString {
    let mut overhead = name_len_units(OsStr::new(suffix));
    let mut chain_part = OsString::new();
    if let Some(c) = chain {
        overhead = overhead.saturating_add(1 + name_len_units(c));
        chain_part.push(".");
        chain_part.push(c);
    }

    let mut stem_os = stem.to_os_string();
    if name_len_units(&stem_os) + overhead > MAX_FILENAME_LEN {
        let budget = MAX_FILENAME_LEN.saturating_sub(overhead).max(1);
        stem_os = truncate_stem(stem, budget);
    }

    let mut new_name = stem_os;
    new_name.push(suffix);
    new_name.push(&chain_part);
    new_name
}

fn truncate_stem(stem: &OsStr, budget: usize) -> OsString {
    if let Some(stem_str) = stem.to_str() {
        let mut acc = String::new();
        for ch in stem_str.chars() {
            if acc.len() + ch.len_utf8() > budget {
                break;
            }
            acc.push(ch);
        }
        if acc.is_empty() {
            acc.push('f');
        }
        return OsString::from(acc);
    }
    #[cfg(unix)]
    {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};
        let bytes = stem.as_bytes();
        OsString::from_vec(bytes[..bytes.len().min(budget)].to_vec())
    }
    #[cfg(not(unix))]
    {
        let lossy = stem.to_string_lossy();
        truncate_stem(OsStr::new(lossy.as_ref()), budget)
    }
}

/// Lexically resolve `.` and `..` without touching the filesystem.
/// `..` at the root is dropped; leading `..` on relative paths are kept.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.as_ref().components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve as much of `p` as exists on disk (dunce-canonicalized), then
/// append the remaining components lexically.
fn resolve_for_compare(p: &Path) -> PathBuf {
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(p))
            .unwrap_or_else(|_| p.to_path_buf())
    };
    let abs = normalize(abs);

    let mut existing = abs.as_path();
    let mut rest: Vec<&OsStr> = Vec::new();
    loop {
        if let Ok(canon) = dunce::canonicalize(existing) {
            let mut out = canon;
            for c in rest.iter().rev() {
                out.push(c);
            }
            return out;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name);
                existing = parent;
            }
            _ => return abs,
        }
    }
}

/// True when `child` is `parent` itself or lies somewhere beneath it.
pub fn is_within(child: impl AsRef<Path>, parent: impl AsRef<Path>) -> bool {
    let child = resolve_for_compare(child.as_ref());
    let parent = resolve_for_compare(parent.as_ref());
    child.starts_with(&parent)
}

/// Both paths name the same location once resolved.
pub(crate) fn same_location(a: &Path, b: &Path) -> bool {
    resolve_for_compare(a) == resolve_for_compare(b)
}
