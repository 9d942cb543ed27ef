use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs;
use tempfile::tempdir;

use fsops::{FsError, Indent, read_json, write_json};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Manifest {
    name: String,
    files: Vec<String>,
    size: u64,
}

#[test]
fn typed_round_trip_creates_parents() {
    let td = tempdir().unwrap();
    let p = td.path().join("meta/nested/manifest.json");
    let m = Manifest {
        name: "bundle".into(),
        files: vec!["a".into(), "b".into()],
        size: 42,
    };
    write_json(&p, &m, Indent::default()).unwrap();
    let back: Manifest = read_json(&p).unwrap();
    assert_eq!(back, m);
    assert!(!fs::read_to_string(&p).unwrap().contains('\n'));
}

#[test]
fn indentation_by_spaces_and_string() {
    let td = tempdir().unwrap();
    let v = json!({"foo": 1, "baz": ["John", "Mike"]});

    let spaced = td.path().join("spaced.json");
    write_json(&spaced, &v, Indent::from(2usize)).unwrap();
    let text = fs::read_to_string(&spaced).unwrap();
    assert!(text.contains("\n  \"baz\": [\n    \"John\""), "got: {text}");

    let tabbed = td.path().join("tabbed.json");
    write_json(&tabbed, &v, Indent::from("\t")).unwrap();
    let text = fs::read_to_string(&tabbed).unwrap();
    assert!(text.contains("\n\t\"foo\": 1"), "got: {text}");

    assert_eq!(read_json::<Value>(&spaced).unwrap(), v);
    assert_eq!(read_json::<Value>(&tabbed).unwrap(), v);
}

#[test]
fn malformed_json_and_missing_file() {
    let td = tempdir().unwrap();
    let bad = td.path().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();
    assert!(matches!(read_json::<Value>(&bad), Err(FsError::Json { .. })));
    assert!(read_json::<Value>(td.path().join("none.json")).unwrap_err().is_not_found());
}

#[test]
fn callback_round_trip() {
    let td = tempdir().unwrap();
    let p = td.path().join("cb.json");
    let (tx, rx) = std::sync::mpsc::channel();
    fsops::callback::write_json(p.clone(), json!([1, 2, 3]), Indent::Spaces(4), move |res| {
        tx.send(res).unwrap();
    });
    rx.recv_timeout(std::time::Duration::from_secs(10)).unwrap().unwrap();

    let (tx, rx) = std::sync::mpsc::channel();
    fsops::callback::read_json::<Vec<u32>, _>(p, move |res| tx.send(res).unwrap());
    let back = rx.recv_timeout(std::time::Duration::from_secs(10)).unwrap().unwrap();
    assert_eq!(back, [1, 2, 3]);
}
