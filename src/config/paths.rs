//! Default path helpers and symlink checks.

use dirs::config_dir;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FSOPS_CONFIG";

/// OS-appropriate default config path (`<config_dir>/fsops/config.xml`).
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(mut base) = config_dir() {
        base.push("fsops");
        base.push("config.xml");
        Some(base)
    } else {
        std::env::var("HOME").ok().map(|h| {
            PathBuf::from(h)
                .join(".config")
                .join("fsops")
                .join("config.xml")
        })
    }
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_path_ends_in_fsops_config() {
        if let Some(p) = default_config_path() {
            assert!(p.ends_with("fsops/config.xml"));
        }
    }

    #[test]
    fn plain_dirs_have_no_symlink_ancestor() {
        let td = tempdir().unwrap();
        let p = td.path().join("a").join("log.txt");
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        // tempdir itself may live under a symlinked /tmp on some systems
        let canon = dunce::canonicalize(p.parent().unwrap()).unwrap().join("log.txt");
        assert!(!path_has_symlink_ancestor(&canon).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_parent_is_detected() {
        let td = tempdir().unwrap();
        let real = td.path().join("real");
        fs::create_dir(&real).unwrap();
        let link = td.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        assert!(path_has_symlink_ancestor(&link.join("log.txt")).unwrap());
    }
}
