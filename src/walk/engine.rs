//! Traversal session: the breadth-first work queue and its worker pool.
//!
//! With one thread, directories are read inline on the caller's thread.
//! With more, up to `threads` reads run on a dedicated rayon pool and report
//! back over a channel; each directory arrives as one batch, so sibling order
//! is kept even though batches interleave.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, trace, warn};

use super::AbortHandle;
use super::entry::Entry;
use crate::errors::{FsError, Result};
use crate::fs_ops::io_error_with_help;

/// Flags a directory read needs; cheap to copy into pool jobs.
#[derive(Debug, Clone, Copy)]
struct ReadFlags {
    prepend_dir: bool,
    follow_links: bool,
}

type Listing = Result<Vec<Entry>>;

struct Pool {
    pool: rayon::ThreadPool,
    tx: Sender<Listing>,
    rx: Receiver<Listing>,
}

pub(crate) struct Session {
    root: PathBuf,
    recursive: bool,
    threads: usize,
    flags: ReadFlags,
    pending: VecDeque<PathBuf>,
    ready: VecDeque<Entry>,
    in_flight: usize,
    abort: AbortHandle,
    pool: Option<Pool>,
    visited: Option<HashSet<PathBuf>>,
    done: bool,
}

impl Session {
    pub(crate) fn open(
        root: &Path,
        recursive: bool,
        threads: usize,
        prepend_dir: bool,
        follow_links: bool,
        abort: AbortHandle,
    ) -> Result<Self> {
        let meta = fs::metadata(root).map_err(io_error_with_help("stat walk root", root))?;
        if !meta.is_dir() {
            return Err(FsError::NotADirectory(root.to_path_buf()));
        }

        let threads = threads.max(1);
        let pool = if threads > 1 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("fsops-walk-{i}"))
                .build()
            {
                Ok(pool) => {
                    let (tx, rx) = mpsc::channel();
                    Some(Pool { pool, tx, rx })
                }
                Err(e) => {
                    warn!(error = %e, threads, "could not build walk pool; reading directories inline");
                    None
                }
            }
        } else {
            None
        };

        let visited = if follow_links {
            let mut set = HashSet::new();
            if let Ok(canon) = dunce::canonicalize(root) {
                set.insert(canon);
            }
            Some(set)
        } else {
            None
        };

        debug!(root = %root.display(), recursive, threads, follow_links, "walk session opened");
        Ok(Session {
            root: root.to_path_buf(),
            recursive,
            threads: if pool.is_some() { threads } else { 1 },
            flags: ReadFlags {
                prepend_dir,
                follow_links,
            },
            pending: VecDeque::from([PathBuf::new()]),
            ready: VecDeque::new(),
            in_flight: 0,
            abort,
            pool,
            visited,
            done: false,
        })
    }

    pub(crate) fn abort_handle(&self) -> &AbortHandle {
        &self.abort
    }

    /// Next discovered entry, before filter/map. Yields at most one error,
    /// after which the session is finished.
    pub(crate) fn next_raw(&mut self) -> Option<Result<Entry>> {
        loop {
            if self.done {
                return None;
            }
            if self.abort.is_aborted() {
                trace!(root = %self.root.display(), "walk aborted");
                self.finish();
                return None;
            }

            if self.pool.is_some() {
                self.fill();
            }
            if let Some(entry) = self.ready.pop_front() {
                return Some(Ok(entry));
            }

            let listing = match &self.pool {
                None => match self.pending.pop_front() {
                    Some(rel) => read_listing(&self.root, &rel, self.flags),
                    None => {
                        self.finish();
                        return None;
                    }
                },
                Some(pool) => {
                    if self.in_flight == 0 {
                        self.finish();
                        return None;
                    }
                    match pool.rx.recv() {
                        Ok(listing) => {
                            self.in_flight -= 1;
                            listing
                        }
                        Err(_) => {
                            self.finish();
                            return None;
                        }
                    }
                }
            };

            match listing {
                Ok(entries) => self.absorb(entries),
                Err(e) => {
                    debug!(root = %self.root.display(), error = %e, "walk failed");
                    self.finish();
                    return Some(Err(e));
                }
            }
        }
    }

    /// Issue reads until `threads` are in flight or the queue is empty.
    fn fill(&mut self) {
        let Some(pool) = &self.pool else { return };
        while self.in_flight < self.threads {
            let Some(rel) = self.pending.pop_front() else { break };
            let tx = pool.tx.clone();
            let root = self.root.clone();
            let flags = self.flags;
            let abort = self.abort.clone();
            pool.pool.spawn(move || {
                // Always answer, so the session never waits on a job that bailed.
                let listing = if abort.is_aborted() {
                    Ok(Vec::new())
                } else {
                    read_listing(&root, &rel, flags)
                };
                let _ = tx.send(listing);
            });
            self.in_flight += 1;
        }
    }

    fn absorb(&mut self, entries: Vec<Entry>) {
        for entry in entries {
            if self.recursive && entry.is_dir() && self.first_visit(&entry) {
                self.pending.push_back(entry.relative_path().to_path_buf());
            }
            self.ready.push_back(entry);
        }
    }

    /// Only consulted when following links; keeps linked cycles from looping.
    fn first_visit(&mut self, entry: &Entry) -> bool {
        let Some(visited) = self.visited.as_mut() else {
            return true;
        };
        match dunce::canonicalize(entry.full_path()) {
            Ok(canon) => {
                let fresh = visited.insert(canon);
                if !fresh {
                    debug!(path = %entry.full_path().display(), "directory already visited; not descending");
                }
                fresh
            }
            Err(_) => false,
        }
    }

    fn finish(&mut self) {
        self.done = true;
        self.pending.clear();
        self.ready.clear();
    }
}

/// Read one directory and stat each child.
fn read_listing(root: &Path, rel: &Path, flags: ReadFlags) -> Listing {
    let dir = root.join(rel);
    let rd = fs::read_dir(&dir).map_err(io_error_with_help("read directory", &dir))?;
    let mut out = Vec::new();
    for item in rd {
        let item = item.map_err(io_error_with_help("read directory entry", &dir))?;
        let child_rel = rel.join(item.file_name());
        let full = root.join(&child_rel);
        let meta = stat_child(&full, flags.follow_links)
            .map_err(io_error_with_help("stat entry", &full))?;
        out.push(Entry::new(root, child_rel, meta, flags.prepend_dir));
    }
    trace!(dir = %dir.display(), count = out.len(), "read directory");
    Ok(out)
}

fn stat_child(full: &Path, follow_links: bool) -> io::Result<fs::Metadata> {
    let lmeta = fs::symlink_metadata(full)?;
    if follow_links && lmeta.file_type().is_symlink() {
        // Dangling links are reported as links.
        return Ok(fs::metadata(full).unwrap_or(lmeta));
    }
    Ok(lmeta)
}
