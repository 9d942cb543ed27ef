//! Push-style drivers of [`Walk`].
//!
//! The sync helpers call the consumer inline and return the dispatch count.
//! The callback driver runs on its own thread and hands every item to the
//! consumer together with a [`Step`]; the next item is not dispatched until
//! that step is released.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, SyncSender};
use std::thread::{self, JoinHandle};
use tracing::debug;

use super::{AbortHandle, EntryKind, Walk, WalkOptions};
use crate::errors::Result;

/// Walk every entry; returns how many were dispatched to `f`.
pub fn walk_all_sync<R, F>(root: impl AsRef<Path>, opts: &WalkOptions<R>, mut f: F) -> Result<usize>
where
    F: FnMut(R, &AbortHandle),
{
    let mut walk = Walk::new(root, opts)?;
    let handle = walk.abort_handle();
    for item in walk.by_ref() {
        f(item?, &handle);
    }
    Ok(walk.dispatched())
}

/// Like [`walk_all_sync`], regular files only.
pub fn walk_files_sync<R, F>(root: impl AsRef<Path>, opts: &WalkOptions<R>, f: F) -> Result<usize>
where
    F: FnMut(R, &AbortHandle),
{
    walk_all_sync(root, &opts.restrict(EntryKind::File), f)
}

/// Like [`walk_all_sync`], directories only.
pub fn walk_dirs_sync<R, F>(root: impl AsRef<Path>, opts: &WalkOptions<R>, f: F) -> Result<usize>
where
    F: FnMut(R, &AbortHandle),
{
    walk_all_sync(root, &opts.restrict(EntryKind::Dir), f)
}

/// Continuation token for one dispatched item.
///
/// Call [`Step::next`] (or just drop the step) to let the walk continue;
/// call [`Step::abort`] to stop it. The step may be moved to another thread
/// and released later.
#[derive(Debug)]
pub struct Step {
    resume: Option<SyncSender<()>>,
    abort: AbortHandle,
}

impl Step {
    pub fn next(mut self) {
        if let Some(tx) = self.resume.take() {
            let _ = tx.try_send(());
        }
    }

    pub fn abort(&self) {
        self.abort.abort();
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }
}

/// Handle to a walk running on its driver thread.
#[derive(Debug)]
pub struct WalkTask {
    handle: JoinHandle<usize>,
    abort: AbortHandle,
}

impl WalkTask {
    pub fn abort(&self) {
        self.abort.abort();
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the walk to finish; returns the number of dispatched entries.
    /// A panic in the consumer is re-raised here.
    pub fn join(self) -> usize {
        match self.handle.join() {
            Ok(n) => n,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

pub(crate) fn spawn_walk<R, F>(
    root: PathBuf,
    opts: WalkOptions<R>,
    mut consumer: F,
) -> WalkTask
where
    R: Send + 'static,
    F: FnMut(Result<R>, Step) + Send + 'static,
{
    let abort = AbortHandle::new();
    let driver_abort = abort.clone();
    let handle = thread::spawn(move || {
        let step_for = |abort: &AbortHandle| {
            let (tx, rx) = mpsc::sync_channel::<()>(1);
            (
                Step {
                    resume: Some(tx),
                    abort: abort.clone(),
                },
                rx,
            )
        };

        let mut walk = match Walk::with_abort(&root, &opts, driver_abort.clone()) {
            Ok(walk) => walk,
            Err(e) => {
                let (step, _rx) = step_for(&driver_abort);
                consumer(Err(e), step);
                return 0;
            }
        };

        for item in walk.by_ref() {
            let (step, rx) = step_for(&driver_abort);
            consumer(item, step);
            // Returns on explicit next() or once the step is dropped.
            let _ = rx.recv();
        }
        debug!(root = %root.display(), dispatched = walk.dispatched(), "callback walk finished");
        walk.dispatched()
    });
    WalkTask { handle, abort }
}
