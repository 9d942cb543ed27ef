use assert_fs::TempDir;
use assert_fs::prelude::*;
use std::fs;

use fsops::{FsError, delete, delete_dir, delete_file};

#[test]
fn delete_dir_removes_whole_tree() {
    let td = TempDir::new().unwrap();
    for i in 0..5 {
        td.child(format!("victim/d{i}/nested/f{i}.txt")).write_str("data").unwrap();
    }
    td.child("victim/empty").create_dir_all().unwrap();
    delete_dir(td.child("victim").path()).unwrap();
    assert!(!td.child("victim").exists());
    assert!(td.path().exists());
}

#[test]
fn deleting_missing_paths_succeeds() {
    let td = TempDir::new().unwrap();
    delete_file(td.child("nope").path()).unwrap();
    delete_dir(td.child("nope").path()).unwrap();
    delete(td.child("nope/deeper").path()).unwrap();
}

#[test]
fn kind_mismatch_is_rejected() {
    let td = TempDir::new().unwrap();
    td.child("file").write_str("x").unwrap();
    td.child("dir").create_dir_all().unwrap();
    assert!(matches!(delete_dir(td.child("file").path()), Err(FsError::NotADirectory(_))));
    assert!(matches!(delete_file(td.child("dir").path()), Err(FsError::NotAFile(_))));
}

#[test]
fn delete_dispatches_on_kind() {
    let td = TempDir::new().unwrap();
    td.child("a.txt").write_str("x").unwrap();
    td.child("tree/b.txt").write_str("y").unwrap();
    delete(td.child("a.txt").path()).unwrap();
    delete(td.child("tree").path()).unwrap();
    assert_eq!(fs::read_dir(td.path()).unwrap().count(), 0);
}

#[cfg(unix)]
#[test]
fn delete_dir_does_not_follow_links() {
    let td = TempDir::new().unwrap();
    td.child("outside/keep.txt").write_str("keep").unwrap();
    td.child("victim").create_dir_all().unwrap();
    std::os::unix::fs::symlink(td.child("outside").path(), td.child("victim/link").path()).unwrap();
    delete_dir(td.child("victim").path()).unwrap();
    assert!(!td.child("victim").exists());
    assert_eq!(fs::read_to_string(td.child("outside/keep.txt").path()).unwrap(), "keep");
}
