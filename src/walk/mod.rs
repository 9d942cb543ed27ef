//! Recursive directory traversal.
//!
//! [`Walk`] is a pull cursor over a traversal session; the push helpers in
//! [`push`] and the callback forms in [`crate::callback`] drive it. Every
//! walk is breadth-first by discovery, runs `filter` before `map`, and
//! checks its [`AbortHandle`] before dispatching each entry.

mod engine;
mod entry;
mod options;
mod push;

pub use entry::{Entry, EntryKind};
pub use options::{Filter, Mapper, Sorter, WalkOptions};
pub use push::{Step, WalkTask, walk_all_sync, walk_dirs_sync, walk_files_sync};
pub(crate) use push::spawn_walk;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::Result;
use engine::Session;

/// Cooperative cancellation token shared between a walk and its consumers.
/// Relaxed ordering is enough for a one-way stop flag.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent.
    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Pull cursor over a directory tree.
///
/// ```no_run
/// use fsops::{Walk, WalkOptions};
///
/// let opts = WalkOptions::new().recursive(true);
/// for path in Walk::new("target", &opts)? {
///     println!("{}", path?.display());
/// }
/// # Ok::<(), fsops::FsError>(())
/// ```
pub struct Walk<R = PathBuf> {
    session: Session,
    filter: Option<Filter>,
    map: Mapper<R>,
    sort: Option<Sorter<R>>,
    sorted: Option<std::vec::IntoIter<R>>,
    dispatched: usize,
    failed: bool,
}

impl<R> Walk<R> {
    /// Open a walk. Fails with `NotFound` for a missing root and
    /// `NotADirectory` when the root is anything else.
    pub fn new(root: impl AsRef<Path>, opts: &WalkOptions<R>) -> Result<Self> {
        Self::with_abort(root.as_ref(), opts, AbortHandle::new())
    }

    pub(crate) fn with_abort(root: &Path, opts: &WalkOptions<R>, abort: AbortHandle) -> Result<Self> {
        let session = Session::open(
            root,
            opts.recursive,
            opts.threads,
            opts.prepend_dir,
            opts.follow_links,
            abort,
        )?;
        Ok(Walk {
            session,
            filter: opts.filter.clone(),
            map: Arc::clone(&opts.map),
            sort: opts.sort.clone(),
            sorted: None,
            dispatched: 0,
            failed: false,
        })
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.session.abort_handle().clone()
    }

    pub fn abort(&self) {
        self.session.abort_handle().abort();
    }

    /// Entries handed to the consumer so far (errors excluded).
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    fn next_accepted(&mut self) -> Option<Result<Entry>> {
        loop {
            match self.session.next_raw()? {
                Ok(entry) => {
                    if self.filter.as_ref().is_none_or(|f| f(&entry)) {
                        return Some(Ok(entry));
                    }
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }

    /// Drain the session into a sorted buffer. An error short-circuits.
    fn buffer_sorted(&mut self, sorter: &Sorter<R>) -> Result<()> {
        let mut buf = Vec::new();
        while let Some(item) = self.next_accepted() {
            buf.push((self.map)(&item?));
        }
        buf.sort_by(|a, b| sorter(a, b));
        self.sorted = Some(buf.into_iter());
        Ok(())
    }
}

impl<R> Iterator for Walk<R> {
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.session.abort_handle().is_aborted() {
            return None;
        }

        if let Some(sorter) = self.sort.clone() {
            if self.sorted.is_none()
                && let Err(e) = self.buffer_sorted(&sorter)
            {
                return Some(Err(e));
            }
            // Abort may have landed while buffering.
            if self.session.abort_handle().is_aborted() {
                return None;
            }
            let item = self.sorted.as_mut()?.next()?;
            self.dispatched += 1;
            return Some(Ok(item));
        }

        match self.next_accepted()? {
            Ok(entry) => {
                self.dispatched += 1;
                Some(Ok((self.map)(&entry)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn fixture() -> tempfile::TempDir {
        let td = tempdir().unwrap();
        for d in ["a", "a/b", "c"] {
            fs::create_dir_all(td.path().join(d)).unwrap();
        }
        for f in ["1", "a/2", "a/b/3"] {
            fs::write(td.path().join(f), b"x").unwrap();
        }
        td
    }

    #[test]
    fn shallow_walk_sees_only_children() {
        let td = fixture();
        let mut got: Vec<PathBuf> = Walk::new(td.path(), &WalkOptions::new())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        got.sort();
        assert_eq!(got, vec![PathBuf::from("1"), PathBuf::from("a"), PathBuf::from("c")]);
    }

    #[test]
    fn breadth_first_with_one_thread() {
        let td = fixture();
        let opts = WalkOptions::new().recursive(true).map(|e| e.depth());
        let depths: Vec<usize> = Walk::new(td.path(), &opts)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(depths.len(), 6);
        assert!(depths.windows(2).all(|w| w[0] <= w[1]), "depths: {depths:?}");
    }

    #[test]
    fn filter_does_not_prune_descent() {
        let td = fixture();
        let opts = WalkOptions::new().recursive(true).filter(|e| e.is_file());
        let mut got: Vec<PathBuf> = Walk::new(td.path(), &opts)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        got.sort();
        assert_eq!(
            got,
            vec![
                PathBuf::from("1"),
                PathBuf::from("a/2"),
                PathBuf::from("a/b/3")
            ]
        );
    }

    #[test]
    fn abort_stops_dispatch() {
        let td = fixture();
        let mut walk = Walk::new(td.path(), &WalkOptions::new().recursive(true)).unwrap();
        assert!(walk.next().is_some());
        assert!(walk.next().is_some());
        walk.abort();
        assert!(walk.next().is_none());
        assert_eq!(walk.dispatched(), 2);
    }

    #[test]
    fn sorted_walk_is_ordered() {
        let td = fixture();
        let opts = WalkOptions::new().recursive(true).sorted();
        let got: Vec<PathBuf> = Walk::new(td.path(), &opts)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        let mut expected = got.clone();
        expected.sort();
        assert_eq!(got, expected);
    }

    #[test]
    fn missing_root_is_not_found() {
        let td = tempdir().unwrap();
        let err = Walk::new(td.path().join("missing"), &WalkOptions::new()).err();
        assert!(matches!(err, Some(crate::FsError::NotFound(_))));
    }

    #[test]
    fn non_directory_root_is_rejected() {
        let td = tempdir().unwrap();
        let f = td.path().join("f");
        fs::write(&f, b"").unwrap();
        assert!(matches!(
            Walk::new(&f, &WalkOptions::new()),
            Err(crate::FsError::NotADirectory(_))
        ));
    }

    #[test]
    fn many_threads_visit_everything() {
        let td = fixture();
        let opts = WalkOptions::new().recursive(true).threads(4);
        let got: Vec<PathBuf> = Walk::new(td.path(), &opts)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(got.len(), 6);
    }
}
