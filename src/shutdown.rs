//! Process-wide shutdown coordination.
//! Provides a flag set by the ctrlc handler so long-running commands can
//! exit early, plus a slot for the abort handle of the walk currently running.
//!
//! Notes:
//! - Relaxed atomics are sufficient for a one-way "stop" flag.
//! - ctrlc runs its handler on a dedicated thread, so taking a lock is fine.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::walk::AbortHandle;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);
static ACTIVE: Mutex<Option<AbortHandle>> = Mutex::new(None);

/// Request a cooperative shutdown (idempotent). Aborts the registered walk.
pub fn request() {
    SHUTDOWN.store(true, Ordering::Relaxed);
    if let Ok(slot) = ACTIVE.lock()
        && let Some(handle) = slot.as_ref()
    {
        handle.abort();
    }
}

/// Check whether a shutdown has been requested.
#[inline]
pub fn is_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Make `handle` the target of the next shutdown request. If one already
/// arrived, the handle is aborted right away.
pub fn register_abort(handle: AbortHandle) {
    if is_requested() {
        handle.abort();
    }
    if let Ok(mut slot) = ACTIVE.lock() {
        *slot = Some(handle);
    }
}

pub fn clear_abort() {
    if let Ok(mut slot) = ACTIVE.lock() {
        *slot = None;
    }
}

/// Test-only: clear the shutdown flag.
#[cfg(test)]
pub fn reset() {
    SHUTDOWN.store(false, Ordering::Relaxed);
    clear_abort();
}
