use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use walkdir::WalkDir;

use fsops::{FsError, copy, copy_dir, copy_file};

/// (relative path, is_dir, content) for every entry under `root`.
fn snapshot(root: &Path) -> Vec<(PathBuf, bool, Vec<u8>)> {
    let mut out: Vec<_> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(Result::unwrap)
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            let is_dir = e.file_type().is_dir();
            let data = if is_dir { Vec::new() } else { fs::read(e.path()).unwrap() };
            (rel, is_dir, data)
        })
        .collect();
    out.sort();
    out
}

fn build_source(root: &Path) {
    for d in ["one", "one/two", "three"] {
        fs::create_dir_all(root.join(d)).unwrap();
    }
    fs::write(root.join("top.bin"), [0u8, 1, 2, 3]).unwrap();
    fs::write(root.join("one/a.txt"), "alpha").unwrap();
    fs::write(root.join("one/two/b.txt"), "beta").unwrap();
    fs::write(root.join("three/c.txt"), "gamma").unwrap();
}

#[test]
fn copy_dir_reproduces_tree_and_keeps_source() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    build_source(&src);
    let before = snapshot(&src);

    let dst = td.path().join("out/nested/dst");
    copy_dir(&src, &dst).unwrap();

    assert_eq!(snapshot(&dst), before);
    assert_eq!(snapshot(&src), before);
}

#[test]
fn copy_dir_of_empty_source_makes_empty_destination() {
    let td = tempdir().unwrap();
    let src = td.path().join("empty");
    fs::create_dir(&src).unwrap();
    let dst = td.path().join("copy");
    copy_dir(&src, &dst).unwrap();
    assert!(dst.is_dir());
    assert_eq!(fs::read_dir(&dst).unwrap().count(), 0);
}

#[test]
fn copy_dir_into_itself_is_refused() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    build_source(&src);
    let err = copy_dir(&src, src.join("one/inside")).unwrap_err();
    assert!(matches!(err, FsError::DestinationInsideSource { .. }));
    assert!(!src.join("one/inside").exists());
}

#[test]
fn copy_dir_source_errors() {
    let td = tempdir().unwrap();
    assert!(copy_dir(td.path().join("missing"), td.path().join("x")).unwrap_err().is_not_found());
    let f = td.path().join("f");
    fs::write(&f, "x").unwrap();
    assert!(matches!(copy_dir(&f, td.path().join("x")), Err(FsError::NotADirectory(_))));
}

#[test]
fn copy_file_creates_parents_and_overwrites() {
    let td = tempdir().unwrap();
    let src = td.path().join("s.txt");
    fs::write(&src, "new").unwrap();
    let dst = td.path().join("p/q/d.txt");
    fs::create_dir_all(dst.parent().unwrap()).unwrap();
    fs::write(&dst, "old content").unwrap();
    copy_file(&src, &dst).unwrap();
    assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
    // No temp files left behind.
    assert_eq!(fs::read_dir(dst.parent().unwrap()).unwrap().count(), 1);
}

#[test]
fn copy_dispatches_on_kind() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    build_source(&src);
    copy(src.join("top.bin"), td.path().join("file_copy")).unwrap();
    copy(&src, td.path().join("tree_copy")).unwrap();
    assert_eq!(fs::read(td.path().join("file_copy")).unwrap(), [0, 1, 2, 3]);
    assert_eq!(snapshot(&td.path().join("tree_copy")), snapshot(&src));
    assert!(copy(td.path().join("missing"), td.path().join("x")).unwrap_err().is_not_found());
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::os::unix::fs::{PermissionsExt, symlink};

    fn bits(p: &Path) -> u32 {
        fs::symlink_metadata(p).unwrap().permissions().mode() & 0o7777
    }

    #[test]
    fn copy_dir_preserves_modes() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        build_source(&src);
        let modes = [
            ("one", 0o700),
            ("one/two", 0o775),
            ("top.bin", 0o776),
            ("one/a.txt", 0o640),
            ("one/two/b.txt", 0o600),
            ("three/c.txt", 0o755),
        ];
        for (rel, m) in modes {
            fs::set_permissions(src.join(rel), fs::Permissions::from_mode(m)).unwrap();
        }

        let dst = td.path().join("dst");
        copy_dir(&src, &dst).unwrap();
        for (rel, m) in modes {
            assert_eq!(bits(&dst.join(rel)), m, "mode of {rel}");
        }
    }

    #[test]
    fn copy_dir_recreates_symlinks() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        build_source(&src);
        symlink("one/a.txt", src.join("alias")).unwrap();
        let dst = td.path().join("dst");
        copy_dir(&src, &dst).unwrap();
        let link = dst.join("alias");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("one/a.txt"));
        assert_eq!(fs::read_to_string(&link).unwrap(), "alpha");
    }
}
