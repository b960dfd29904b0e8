//! The per-entity "changed since last read" flag.

use std::sync::atomic::{AtomicBool, Ordering};

/// At-most-once change token.
///
/// Setters [`mark`](Self::mark) it; the `updated()` walk consumes it with
/// [`take`](Self::take), a single atomic swap, so a change that lands
/// between "test" and "clear" is never lost.
#[derive(Debug, Default)]
pub struct ChangeFlag(AtomicBool);

impl ChangeFlag {
    /// Record that the owning entity changed.
    pub fn mark(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Test-and-clear: returns whether a change was pending.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}
