//! Per-call traversal configuration.
//!
//! Options are built with chained setters and never mutated by a running
//! walk. `map` changes the emitted type, so it resets any sort that was set
//! for the previous type.

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::entry::{Entry, EntryKind};

pub type Filter = Arc<dyn Fn(&Entry) -> bool + Send + Sync>;
pub type Mapper<R> = Arc<dyn Fn(&Entry) -> R + Send + Sync>;
pub type Sorter<R> = Arc<dyn Fn(&R, &R) -> Ordering + Send + Sync>;

pub struct WalkOptions<R = PathBuf> {
    pub(crate) recursive: bool,
    pub(crate) prepend_dir: bool,
    pub(crate) threads: usize,
    pub(crate) follow_links: bool,
    pub(crate) filter: Option<Filter>,
    pub(crate) map: Mapper<R>,
    pub(crate) sort: Option<Sorter<R>>,
}

impl WalkOptions<PathBuf> {
    /// Shallow, single-threaded, unfiltered, unsorted; emits `Entry::path()`.
    pub fn new() -> Self {
        WalkOptions {
            recursive: false,
            prepend_dir: false,
            threads: 1,
            follow_links: false,
            filter: None,
            map: Arc::new(|e: &Entry| e.path().to_path_buf()),
            sort: None,
        }
    }
}

impl Default for WalkOptions<PathBuf> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> WalkOptions<R> {
    pub fn recursive(mut self, yes: bool) -> Self {
        self.recursive = yes;
        self
    }

    pub fn prepend_dir(mut self, yes: bool) -> Self {
        self.prepend_dir = yes;
        self
    }

    /// Upper bound on simultaneous directory reads. 0 is treated as 1.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = n.max(1);
        self
    }

    /// Report symlinks by their target's kind and descend into linked
    /// directories. Cycles are detected and not re-entered.
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }

    pub fn filter<F>(mut self, f: F) -> Self
    where
        F: Fn(&Entry) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(f));
        self
    }

    pub fn map<T, F>(self, f: F) -> WalkOptions<T>
    where
        F: Fn(&Entry) -> T + Send + Sync + 'static,
    {
        WalkOptions {
            recursive: self.recursive,
            prepend_dir: self.prepend_dir,
            threads: self.threads,
            follow_links: self.follow_links,
            filter: self.filter,
            map: Arc::new(f),
            sort: None,
        }
    }

    /// Sorting forces the whole result set to be buffered before anything is emitted.
    pub fn sort_by<F>(mut self, f: F) -> Self
    where
        F: Fn(&R, &R) -> Ordering + Send + Sync + 'static,
    {
        self.sort = Some(Arc::new(f));
        self
    }

    pub fn unsorted(mut self) -> Self {
        self.sort = None;
        self
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    pub fn thread_count(&self) -> usize {
        self.threads
    }

    pub fn is_sorted(&self) -> bool {
        self.sort.is_some()
    }

    /// Same options with an extra kind check in front of the user filter.
    pub(crate) fn restrict(&self, kind: EntryKind) -> Self {
        let user = self.filter.clone();
        let mut out = self.clone();
        out.filter = Some(Arc::new(move |e: &Entry| {
            e.kind() == kind && user.as_ref().is_none_or(|f| f(e))
        }));
        out
    }
}

impl<R: Ord> WalkOptions<R> {
    /// Sort by the natural order of the mapped values.
    pub fn sorted(self) -> Self {
        self.sort_by(|a, b| a.cmp(b))
    }
}

impl<R> Clone for WalkOptions<R> {
    fn clone(&self) -> Self {
        WalkOptions {
            recursive: self.recursive,
            prepend_dir: self.prepend_dir,
            threads: self.threads,
            follow_links: self.follow_links,
            filter: self.filter.clone(),
            map: Arc::clone(&self.map),
            sort: self.sort.clone(),
        }
    }
}

impl<R> fmt::Debug for WalkOptions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkOptions")
            .field("recursive", &self.recursive)
            .field("prepend_dir", &self.prepend_dir)
            .field("threads", &self.threads)
            .field("follow_links", &self.follow_links)
            .field("filter", &self.filter.is_some())
            .field("sort", &self.sort.is_some())
            .finish()
    }
}
