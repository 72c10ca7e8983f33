//! Shared flags for cross-thread search control.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable boolean signal between the command loop and a search thread.
///
/// The ponder worker watches two of these: one for "the expected reply was
/// played" and one for "abandon immediately".
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    #[must_use]
    pub fn new() -> Self {
        StopFlag(Arc::new(AtomicBool::new(false)))
    }

    /// Raise the flag.
    #[inline]
    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
