//! A minimal loop driven by a pure update function.

use super::{Loop, LoopFactory, ModelObserver};
use crate::core::Disposable;
use crate::sync::lock;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Weak};
use std::thread::{self, ThreadId};

type Update<M, E> = Arc<dyn Fn(&M, E) -> M + Send + Sync>;
type SharedObserver<M> = Arc<dyn Fn(M) + Send + Sync>;

/// Factory for loops that fold each event into the model with `update`.
///
/// The loop has no effects: it exists so a controller can be driven end to
/// end without a full loop engine.
///
/// # Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use tether::loops::{LoopFactory, UpdateLoopFactory};
///
/// let factory = UpdateLoopFactory::new(|model: &String, event: String| format!("{model}{event}"));
/// let running = factory.start_from("init".to_string());
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let _subscription = running.observe(Box::new(move |model| sink.lock().unwrap().push(model)));
///
/// running.dispatch_event("!".to_string());
/// assert_eq!(*seen.lock().unwrap(), vec!["init", "init!"]);
/// ```
pub struct UpdateLoopFactory<M, E> {
    update: Update<M, E>,
}

impl<M, E> UpdateLoopFactory<M, E> {
    pub fn new<U>(update: U) -> Self
    where
        U: Fn(&M, E) -> M + Send + Sync + 'static,
    {
        Self {
            update: Arc::new(update),
        }
    }
}

impl<M, E> Clone for UpdateLoopFactory<M, E> {
    fn clone(&self) -> Self {
        Self {
            update: Arc::clone(&self.update),
        }
    }
}

impl<M, E> LoopFactory<M, E> for UpdateLoopFactory<M, E>
where
    M: Clone + Send + 'static,
    E: Send + 'static,
{
    fn start_from(&self, model: M) -> Arc<dyn Loop<M, E>> {
        Arc::new(UpdateLoop {
            update: Arc::clone(&self.update),
            state: Arc::new(Mutex::new(LoopState {
                model,
                observers: Vec::new(),
                pending: VecDeque::new(),
                notifier: None,
                next_id: 0,
                disposed: false,
            })),
            emission: Mutex::new(()),
        })
    }
}

/// Models are computed under `state` and queued; whoever holds `emission`
/// drains the queue, so observers see models in the order they were computed.
struct UpdateLoop<M, E> {
    update: Update<M, E>,
    state: Arc<Mutex<LoopState<M>>>,
    emission: Mutex<()>,
}

struct LoopState<M> {
    model: M,
    observers: Vec<(u64, SharedObserver<M>)>,
    pending: VecDeque<M>,
    /// Thread currently draining `pending`, if any.
    notifier: Option<ThreadId>,
    next_id: u64,
    disposed: bool,
}

impl<M> LoopState<M> {
    fn notifying_here(&self) -> bool {
        self.notifier == Some(thread::current().id())
    }
}

impl<M: Clone, E> UpdateLoop<M, E> {
    /// Deliver queued models. The caller must hold `emission`.
    fn drain(&self) {
        lock(&self.state).notifier = Some(thread::current().id());
        let _notifying = Notifying(self.state.as_ref());
        loop {
            let (model, observers) = {
                let mut state = lock(&self.state);
                if state.disposed {
                    state.pending.clear();
                    break;
                }
                let Some(model) = state.pending.pop_front() else {
                    break;
                };
                let observers: Vec<SharedObserver<M>> =
                    state.observers.iter().map(|(_, o)| Arc::clone(o)).collect();
                (model, observers)
            };

            // Outside the state lock so observers may dispatch again.
            for observer in observers {
                observer(model.clone());
            }
        }
    }
}

/// Clears the notifier mark even if an observer panics.
struct Notifying<'a, M>(&'a Mutex<LoopState<M>>);

impl<M> Drop for Notifying<'_, M> {
    fn drop(&mut self) {
        lock(self.0).notifier = None;
    }
}

impl<M, E> Loop<M, E> for UpdateLoop<M, E>
where
    M: Clone + Send + 'static,
    E: Send + 'static,
{
    fn dispatch_event(&self, event: E) {
        {
            let mut state = lock(&self.state);
            if state.disposed {
                tracing::trace!("loop disposed, dropping event");
                return;
            }
            let next = (self.update)(&state.model, event);
            state.model = next.clone();
            state.pending.push_back(next);
            if state.notifying_here() {
                // Dispatched from an observer: the running drain delivers it.
                return;
            }
        }

        let _emitting = lock(&self.emission);
        self.drain();
    }

    /// Observers must not subscribe to the same loop from inside a delivery.
    fn observe(&self, observer: ModelObserver<M>) -> Box<dyn Disposable> {
        let observer: SharedObserver<M> = Arc::from(observer);
        let _emitting = lock(&self.emission);
        // Flush older models first so the new observer only sees newer ones.
        self.drain();

        let (id, current) = {
            let mut state = lock(&self.state);
            if state.disposed {
                return Box::new(Subscription::<M> {
                    state: Weak::new(),
                    id: 0,
                });
            }
            let id = state.next_id;
            state.next_id += 1;
            state.observers.push((id, Arc::clone(&observer)));
            (id, state.model.clone())
        };

        observer(current);

        Box::new(Subscription {
            state: Arc::downgrade(&self.state),
            id,
        })
    }

    fn dispose(&self) {
        let reentrant = {
            let mut state = lock(&self.state);
            state.disposed = true;
            state.observers.clear();
            state.pending.clear();
            state.notifying_here()
        };
        // Wait out a delivery in progress on another thread.
        if !reentrant {
            drop(lock(&self.emission));
        }
    }
}

struct Subscription<M> {
    state: Weak<Mutex<LoopState<M>>>,
    id: u64,
}

impl<M: Send> Disposable for Subscription<M> {
    fn dispose(&self) {
        if let Some(state) = self.state.upgrade() {
            lock(&state).observers.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, Receiver, Sender};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn concat() -> UpdateLoopFactory<String, String> {
        UpdateLoopFactory::new(|model: &String, event: String| format!("{model}{event}"))
    }

    fn recording(running: &Arc<dyn Loop<String, String>>) -> (Arc<Mutex<Vec<String>>>, Box<dyn Disposable>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = running.observe(Box::new(move |model| sink.lock().unwrap().push(model)));
        (seen, subscription)
    }

    #[test]
    fn observe_delivers_current_model_first() {
        let running = concat().start_from("init".to_string());
        let (seen, _subscription) = recording(&running);

        assert_eq!(*seen.lock().unwrap(), vec!["init"]);
    }

    #[test]
    fn events_fold_into_model() {
        let running = concat().start_from("a".to_string());
        let (seen, _subscription) = recording(&running);

        running.dispatch_event("b".to_string());
        running.dispatch_event("c".to_string());

        assert_eq!(*seen.lock().unwrap(), vec!["a", "ab", "abc"]);
    }

    #[test]
    fn disposed_subscription_stops_delivery() {
        let running = concat().start_from("a".to_string());
        let (seen, subscription) = recording(&running);

        subscription.dispose();
        running.dispatch_event("b".to_string());

        assert_eq!(*seen.lock().unwrap(), vec!["a"]);
    }

    #[test]
    fn disposed_loop_ignores_events_and_observers() {
        let running = concat().start_from("a".to_string());
        let (seen, _subscription) = recording(&running);

        running.dispose();
        running.dispatch_event("b".to_string());
        let (late, _late_subscription) = recording(&running);

        assert_eq!(*seen.lock().unwrap(), vec!["a"]);
        assert!(late.lock().unwrap().is_empty());
    }

    /// Observer that blocks on `gate` when it sees `model`, after telling `parked`.
    fn parking_observer(
        running: &Arc<dyn Loop<String, String>>,
        model: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    ) -> (Receiver<()>, Sender<()>, Box<dyn Disposable>) {
        let (parked_tx, parked) = bounded(1);
        let (release, gate) = bounded::<()>(1);
        let subscription = running.observe(Box::new(move |seen: String| {
            if seen == model {
                parked_tx.send(()).unwrap();
                gate.recv().unwrap();
            }
            log.lock().unwrap().push(seen);
        }));
        (parked, release, subscription)
    }

    #[test]
    fn concurrent_dispatches_reach_observers_in_update_order() {
        let running = concat().start_from("a".to_string());
        let log = Arc::new(Mutex::new(Vec::new()));
        let (parked, release, _subscription) = parking_observer(&running, "ab", Arc::clone(&log));

        let first = {
            let running = Arc::clone(&running);
            thread::spawn(move || running.dispatch_event("b".to_string()))
        };
        parked.recv().unwrap();
        let second = {
            let running = Arc::clone(&running);
            thread::spawn(move || running.dispatch_event("c".to_string()))
        };
        thread::sleep(Duration::from_millis(50));
        release.send(()).unwrap();
        first.join().unwrap();
        second.join().unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["a", "ab", "abc"]);
    }

    #[test]
    fn dispose_waits_for_delivery_in_progress() {
        let running = concat().start_from("a".to_string());
        let log = Arc::new(Mutex::new(Vec::new()));
        let (parked, release, _subscription) = parking_observer(&running, "ab", Arc::clone(&log));
        let disposed = Arc::new(AtomicBool::new(false));

        let dispatcher = {
            let running = Arc::clone(&running);
            thread::spawn(move || running.dispatch_event("b".to_string()))
        };
        parked.recv().unwrap();
        let disposer = {
            let running = Arc::clone(&running);
            let disposed = Arc::clone(&disposed);
            thread::spawn(move || {
                running.dispose();
                disposed.store(true, Ordering::SeqCst);
            })
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!disposed.load(Ordering::SeqCst));

        release.send(()).unwrap();
        dispatcher.join().unwrap();
        disposer.join().unwrap();
        running.dispatch_event("c".to_string());

        assert!(disposed.load(Ordering::SeqCst));
        assert_eq!(*log.lock().unwrap(), vec!["a", "ab"]);
    }

    #[test]
    fn observer_may_dispatch_from_inside_delivery() {
        let running = concat().start_from("a".to_string());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let target = Arc::downgrade(&running);
        let _subscription = running.observe(Box::new(move |model: String| {
            if model == "ab" {
                if let Some(running) = target.upgrade() {
                    running.dispatch_event("!".to_string());
                }
            }
            sink.lock().unwrap().push(model);
        }));

        running.dispatch_event("b".to_string());

        assert_eq!(*seen.lock().unwrap(), vec!["a", "ab", "ab!"]);
    }

    #[test]
    fn closures_act_as_factories() {
        let inner = concat();
        let factory = move |model: String| inner.start_from(model);
        let running = factory.start_from("x".to_string());
        let (seen, _subscription) = recording(&running);

        assert_eq!(*seen.lock().unwrap(), vec!["x"]);
    }
}
