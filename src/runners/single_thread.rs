//! Runner backed by one dedicated worker thread.

use super::{Work, WorkRunner};
use crate::sync::{lock, panic_message};
use crossbeam_channel::Sender;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Serializes all posted work onto one named thread, in submission order.
///
/// `post` never blocks the caller. A unit of work that panics is logged and
/// the worker moves on to the next one. Disposing (or dropping) the runner
/// discards everything still queued and lets the thread exit.
pub struct SingleThreadWorkRunner {
    name: String,
    sender: Mutex<Option<Sender<Work>>>,
    disposed: Arc<AtomicBool>,
}

impl SingleThreadWorkRunner {
    /// Spawn the worker thread.
    pub fn spawn(name: &str) -> io::Result<Self> {
        let (sender, receiver) = crossbeam_channel::unbounded::<Work>();
        let disposed = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&disposed);
        let worker = name.to_string();
        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                for work in receiver.iter() {
                    if flag.load(Ordering::Acquire) {
                        break;
                    }
                    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(work)) {
                        tracing::error!(
                            worker = %worker,
                            panic = %panic_message(payload.as_ref()),
                            "work panicked on worker thread"
                        );
                    }
                }
                tracing::debug!(worker = %worker, "worker thread exiting");
            })?;

        Ok(Self {
            name: name.to_string(),
            sender: Mutex::new(Some(sender)),
            disposed,
        })
    }

    /// Name of the worker thread.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl WorkRunner for SingleThreadWorkRunner {
    fn post(&self, work: Work) {
        let sent = match lock(&self.sender).as_ref() {
            Some(sender) => sender.send(work).is_ok(),
            None => false,
        };
        if !sent {
            tracing::trace!(worker = %self.name, "runner disposed, discarding work");
        }
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
        if lock(&self.sender).take().is_some() {
            tracing::debug!(worker = %self.name, "runner disposed");
        }
    }
}

impl Drop for SingleThreadWorkRunner {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn runs_work_on_named_thread() {
        let runner = SingleThreadWorkRunner::spawn("runner-under-test").unwrap();
        let (tx, rx) = mpsc::channel();

        runner.post(Box::new(move || {
            let name = thread::current().name().map(str::to_string);
            tx.send(name).unwrap();
        }));

        let name = rx.recv_timeout(TIMEOUT).unwrap();
        assert_eq!(name.as_deref(), Some("runner-under-test"));
        assert_eq!(runner.name(), "runner-under-test");
    }

    #[test]
    fn preserves_submission_order() {
        let runner = SingleThreadWorkRunner::spawn("ordered").unwrap();
        let (tx, rx) = mpsc::channel();

        for i in 0..100 {
            let tx = tx.clone();
            runner.post(Box::new(move || tx.send(i).unwrap()));
        }

        let received: Vec<i32> = (0..100).map(|_| rx.recv_timeout(TIMEOUT).unwrap()).collect();
        assert_eq!(received, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn survives_panicking_work() {
        let runner = SingleThreadWorkRunner::spawn("panicky").unwrap();
        let (tx, rx) = mpsc::channel();

        runner.post(Box::new(|| panic!("boom")));
        runner.post(Box::new(move || tx.send("after").unwrap()));

        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "after");
    }

    #[test]
    fn discards_work_after_dispose() {
        let runner = SingleThreadWorkRunner::spawn("disposed").unwrap();
        let (tx, rx) = mpsc::channel::<()>();

        runner.dispose();
        runner.dispose();
        runner.post(Box::new(move || tx.send(()).unwrap()));

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
