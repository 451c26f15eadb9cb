//! Work runners: where deferred work executes.
//!
//! A controller never calls its view directly. Every model is wrapped in a
//! unit of [`Work`] and posted to a [`WorkRunner`], which decides the
//! execution context:
//!
//! - [`ImmediateWorkRunner`] runs work on the posting thread
//! - [`SingleThreadWorkRunner`] serializes work onto one dedicated thread
//! - [`TestWorkRunner`] queues work until a test drains it
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use tether::runners::{TestWorkRunner, WorkRunner};
//!
//! let runner = TestWorkRunner::new();
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&hits);
//! runner.post(Box::new(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! }));
//! assert_eq!(hits.load(Ordering::SeqCst), 0);
//!
//! runner.run_all();
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

mod immediate;
mod single_thread;
mod test_runner;

use std::io;
use std::sync::Arc;

pub use immediate::ImmediateWorkRunner;
pub use single_thread::SingleThreadWorkRunner;
pub use test_runner::TestWorkRunner;

/// A deferred unit of work.
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// Runs posted work according to its own discipline.
///
/// Implementations must run work in submission order and must not drop work
/// except after [`WorkRunner::dispose`], which discards queued and future
/// work without running it. `dispose` is idempotent.
pub trait WorkRunner: Send + Sync {
    fn post(&self, work: Work);

    fn dispose(&self);
}

impl<T: WorkRunner + ?Sized> WorkRunner for Arc<T> {
    fn post(&self, work: Work) {
        (**self).post(work)
    }

    fn dispose(&self) {
        (**self).dispose()
    }
}

/// Constructors for the built-in runners, returned as shareable handles.
pub struct WorkRunners;

impl WorkRunners {
    /// A runner that executes work on the posting thread.
    pub fn immediate() -> Arc<dyn WorkRunner> {
        Arc::new(ImmediateWorkRunner::new())
    }

    /// A runner backed by one dedicated, named worker thread.
    pub fn single_thread(name: &str) -> io::Result<Arc<dyn WorkRunner>> {
        let runner: Arc<dyn WorkRunner> = Arc::new(SingleThreadWorkRunner::spawn(name)?);
        Ok(runner)
    }
}
