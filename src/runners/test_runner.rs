//! Runner that holds work until a test drains it.

use super::{Work, WorkRunner};
use crate::sync::lock;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Queues posted work for explicit, manual execution.
///
/// Lets a test observe the state of the world between "a model was emitted"
/// and "the view received it". Work runs outside the queue lock, so work
/// that posts more work (or another thread posting during a drain) is fine.
#[derive(Default)]
pub struct TestWorkRunner {
    inner: Mutex<Queue>,
}

#[derive(Default)]
struct Queue {
    pending: VecDeque<Work>,
    disposed: bool,
}

impl TestWorkRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the oldest pending unit of work, returning whether one ran.
    pub fn run_one(&self) -> bool {
        let next = lock(&self.inner).pending.pop_front();
        match next {
            Some(work) => {
                work();
                true
            }
            None => false,
        }
    }

    /// Run pending work in FIFO order until the queue is empty.
    ///
    /// Work posted while draining is run too. No-op on an empty queue.
    pub fn run_all(&self) {
        while self.run_one() {}
    }

    /// Number of units of work waiting to run.
    pub fn pending(&self) -> usize {
        lock(&self.inner).pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }
}

impl WorkRunner for TestWorkRunner {
    fn post(&self, work: Work) {
        let mut queue = lock(&self.inner);
        if queue.disposed {
            tracing::trace!("test runner disposed, discarding work");
            return;
        }
        queue.pending.push_back(work);
    }

    fn dispose(&self) {
        let mut queue = lock(&self.inner);
        queue.disposed = true;
        queue.pending.clear();
    }
}
