use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use fsops::{DEFAULT_UNIQUE_START, unique_path};

#[test]
fn free_path_is_returned_unchanged() {
    let td = tempdir().unwrap();
    let p = td.path().join("nothing-here.txt");
    assert_eq!(unique_path(&p, DEFAULT_UNIQUE_START).unwrap(), p);
}

#[test]
fn suffix_goes_before_whole_extension_chain() {
    let td = tempdir().unwrap();
    let p = td.path().join("backup.tar.gz");
    fs::write(&p, b"").unwrap();
    assert_eq!(unique_path(&p, DEFAULT_UNIQUE_START).unwrap(), td.path().join("backup-2.tar.gz"));
}

#[test]
fn increments_past_taken_candidates() {
    let td = tempdir().unwrap();
    for name in ["report.pdf", "report-2.pdf", "report-3.pdf"] {
        fs::write(td.path().join(name), b"").unwrap();
    }
    let got = unique_path(td.path().join("report.pdf"), 2).unwrap();
    assert_eq!(got, td.path().join("report-4.pdf"));
}

#[test]
fn custom_start_index() {
    let td = tempdir().unwrap();
    let p = td.path().join("photo.jpeg");
    fs::write(&p, b"").unwrap();
    assert_eq!(unique_path(&p, 10).unwrap(), td.path().join("photo-10.jpeg"));
}

#[test]
fn dotfiles_and_directories() {
    let td = tempdir().unwrap();
    fs::write(td.path().join(".env"), b"").unwrap();
    fs::create_dir(td.path().join("folder")).unwrap();
    assert_eq!(unique_path(td.path().join(".env"), 2).unwrap(), td.path().join(".env-2"));
    assert_eq!(unique_path(td.path().join("folder"), 2).unwrap(), td.path().join("folder-2"));
}

#[test]
fn callback_form_returns_path() {
    let td = tempdir().unwrap();
    let p = td.path().join("a.b.c");
    fs::write(&p, b"").unwrap();
    let (tx, rx) = std::sync::mpsc::channel::<fsops::Result<PathBuf>>();
    fsops::callback::unique_path(p, 2, move |res| tx.send(res).unwrap());
    let got = rx.recv_timeout(std::time::Duration::from_secs(10)).unwrap().unwrap();
    assert_eq!(got, td.path().join("a-2.b.c"));
}
