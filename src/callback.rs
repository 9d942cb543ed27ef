//! Completion-callback forms of every operation.
//!
//! Each function takes owned arguments plus a `done` callback, runs the
//! synchronous operation on the rayon global pool and hands it the result.
//! Walks run on their own driver thread and pace on [`Step`] release.
//!
//! ```no_run
//! use fsops::callback;
//!
//! callback::copy_dir("assets".into(), "build/assets".into(), |res| {
//!     if let Err(e) = res {
//!         eprintln!("copy failed: {e}");
//!     }
//! });
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

use crate::errors::Result;
use crate::json::Indent;
use crate::mode::Mode;
use crate::walk::{EntryKind, Step, WalkOptions, WalkTask, spawn_walk};

macro_rules! callback_op {
    ($($name:ident($($arg:ident: $ty:ty),*) -> $ret:ty;)*) => {
        $(
            #[doc = concat!("Callback form of [`crate::", stringify!($name), "`].")]
            pub fn $name<F>($($arg: $ty,)* done: F)
            where
                F: FnOnce(Result<$ret>) + Send + 'static,
            {
                rayon::spawn(move || done(crate::$name($($arg),*)));
            }
        )*
    };
}

callback_op! {
    create_file(path: PathBuf, data: Vec<u8>, mode: Option<Mode>) -> ();
    ensure_file(path: PathBuf, mode: Option<Mode>) -> bool;
    create_dir(path: PathBuf, mode: Option<Mode>) -> ();
    ensure_dir(path: PathBuf, mode: Option<Mode>) -> ();
    delete_file(path: PathBuf) -> ();
    delete_dir(path: PathBuf) -> ();
    delete(path: PathBuf) -> ();
    empty_file(path: PathBuf) -> ();
    empty_dir(path: PathBuf) -> ();
    empty(path: PathBuf) -> ();
    copy_file(src: PathBuf, dst: PathBuf) -> ();
    copy_dir(src: PathBuf, dst: PathBuf) -> ();
    copy(src: PathBuf, dst: PathBuf) -> ();
    move_file(src: PathBuf, dst: PathBuf) -> ();
    move_dir(src: PathBuf, dst: PathBuf) -> ();
    move_path(src: PathBuf, dst: PathBuf) -> ();
    unique_path(path: PathBuf, start: u64) -> PathBuf;
}

pub fn list_all<R, F>(root: PathBuf, opts: WalkOptions<R>, done: F)
where
    R: Send + 'static,
    F: FnOnce(Result<Vec<R>>) + Send + 'static,
{
    rayon::spawn(move || done(crate::list_all(&root, &opts)));
}

pub fn list_files<R, F>(root: PathBuf, opts: WalkOptions<R>, done: F)
where
    R: Send + 'static,
    F: FnOnce(Result<Vec<R>>) + Send + 'static,
{
    rayon::spawn(move || done(crate::list_files(&root, &opts)));
}

pub fn list_dirs<R, F>(root: PathBuf, opts: WalkOptions<R>, done: F)
where
    R: Send + 'static,
    F: FnOnce(Result<Vec<R>>) + Send + 'static,
{
    rayon::spawn(move || done(crate::list_dirs(&root, &opts)));
}

pub fn read_json<T, F>(path: PathBuf, done: F)
where
    T: DeserializeOwned + Send + 'static,
    F: FnOnce(Result<T>) + Send + 'static,
{
    rayon::spawn(move || done(crate::read_json(&path)));
}

pub fn write_json<T, F>(path: PathBuf, value: T, indent: Indent, done: F)
where
    T: Serialize + Send + 'static,
    F: FnOnce(Result<()>) + Send + 'static,
{
    rayon::spawn(move || done(crate::write_json(&path, &value, indent)));
}

/// Walk every entry. `consumer` gets each item with its [`Step`]; the walk
/// waits until the step is released. Errors, including a bad root, arrive
/// through `consumer` exactly once.
pub fn walk_all<R, F>(root: PathBuf, opts: WalkOptions<R>, consumer: F) -> WalkTask
where
    R: Send + 'static,
    F: FnMut(Result<R>, Step) + Send + 'static,
{
    spawn_walk(root, opts, consumer)
}

pub fn walk_files<R, F>(root: PathBuf, opts: WalkOptions<R>, consumer: F) -> WalkTask
where
    R: Send + 'static,
    F: FnMut(Result<R>, Step) + Send + 'static,
{
    spawn_walk(root, opts.restrict(EntryKind::File), consumer)
}

pub fn walk_dirs<R, F>(root: PathBuf, opts: WalkOptions<R>, consumer: F) -> WalkTask
where
    R: Send + 'static,
    F: FnMut(Result<R>, Step) + Send + 'static,
{
    spawn_walk(root, opts.restrict(EntryKind::Dir), consumer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn done_receives_result() {
        let td = tempdir().unwrap();
        let target = td.path().join("a/b/c");
        let (tx, rx) = mpsc::channel();
        create_file(target.clone(), b"x".to_vec(), None, move |res| {
            tx.send(res.is_ok()).unwrap();
        });
        assert!(rx.recv_timeout(Duration::from_secs(10)).unwrap());
        assert_eq!(std::fs::read(&target).unwrap(), b"x");
    }

    #[test]
    fn errors_reach_done() {
        let td = tempdir().unwrap();
        let (tx, rx) = mpsc::channel();
        copy_dir(td.path().join("missing"), td.path().join("out"), move |res| {
            tx.send(res.unwrap_err().code()).unwrap();
        });
        let code = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(code, crate::FsError::NotFound(PathBuf::new()).code());
    }
}
