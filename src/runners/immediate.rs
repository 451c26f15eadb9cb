//! Runner that executes work on the posting thread.

use super::{Work, WorkRunner};
use std::sync::atomic::{AtomicBool, Ordering};

/// Runs every posted unit of work synchronously, before `post` returns.
///
/// Deterministic, which makes it the usual choice for tests that do not need
/// to control when deliveries happen.
#[derive(Debug, Default)]
pub struct ImmediateWorkRunner {
    disposed: AtomicBool,
}

impl ImmediateWorkRunner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkRunner for ImmediateWorkRunner {
    fn post(&self, work: Work) {
        if self.disposed.load(Ordering::Acquire) {
            tracing::trace!("immediate runner disposed, discarding work");
            return;
        }
        work();
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
    }
}
