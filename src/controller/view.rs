//! The two handles that tie a controller to one view connection.
//!
//! [`EventConsumer`] carries events from the view to the loop and is what
//! the view holds on to. `ViewHandle` carries models from the work runner to
//! the view and guarantees the view is disposed at most once, with no
//! delivery after that.

use crate::core::Connection;
use crate::sync::lock;
use std::sync::{Arc, Mutex};

type Dispatch<E> = Arc<dyn Fn(E) + Send + Sync>;

enum Route<E> {
    /// Connected but no loop running: events are dropped.
    Idle,
    /// A loop is running: events go to it.
    Forward(Dispatch<E>),
    /// Disconnected: the proxy is inert for good.
    Closed,
}

/// Event-consumer proxy handed to a view when it connects.
///
/// Cheap to clone and safe to call from any thread. Events are forwarded to
/// the loop only while the controller is running; otherwise they are
/// discarded, never buffered. Once the controller disconnects the proxy is
/// inert and every later event is discarded too.
pub struct EventConsumer<E> {
    route: Arc<Mutex<Route<E>>>,
}

impl<E> Clone for EventConsumer<E> {
    fn clone(&self) -> Self {
        Self {
            route: Arc::clone(&self.route),
        }
    }
}

impl<E> EventConsumer<E> {
    pub(crate) fn new() -> Self {
        Self {
            route: Arc::new(Mutex::new(Route::Idle)),
        }
    }

    /// Submit an event from the view.
    pub fn accept(&self, event: E) {
        let target = match &*lock(&self.route) {
            Route::Forward(dispatch) => Some(Arc::clone(dispatch)),
            Route::Idle => {
                tracing::trace!("loop not running, dropping event");
                None
            }
            Route::Closed => {
                tracing::trace!("view disconnected, dropping event");
                None
            }
        };

        // Dispatch outside the lock; the loop may call back into the view.
        if let Some(dispatch) = target {
            dispatch(event);
        }
    }

    /// Whether the proxy has been made inert by a disconnect.
    pub fn is_closed(&self) -> bool {
        matches!(&*lock(&self.route), Route::Closed)
    }

    pub(crate) fn forward_to(&self, dispatch: Dispatch<E>) {
        let mut route = lock(&self.route);
        if !matches!(&*route, Route::Closed) {
            *route = Route::Forward(dispatch);
        }
    }

    pub(crate) fn idle(&self) {
        let mut route = lock(&self.route);
        if !matches!(&*route, Route::Closed) {
            *route = Route::Idle;
        }
    }

    pub(crate) fn close(&self) {
        *lock(&self.route) = Route::Closed;
    }
}

/// Controller-side wrapper around the view's connection.
///
/// `accept` and `dispose` on the connection run under the same lock, so a
/// dispose issued while a delivery is in progress waits for it to finish.
pub(crate) struct ViewHandle<M> {
    connection: Box<dyn Connection<M>>,
    disposed: Mutex<bool>,
}

impl<M> ViewHandle<M> {
    pub(crate) fn new(connection: Box<dyn Connection<M>>) -> Self {
        Self {
            connection,
            disposed: Mutex::new(false),
        }
    }

    /// Hand a model to the view unless it has been disposed.
    pub(crate) fn deliver(&self, model: M) {
        let disposed = lock(&self.disposed);
        if *disposed {
            tracing::trace!("view disposed, dropping model");
            return;
        }
        self.connection.accept(model);
    }

    /// Dispose the view connection. Only the first call reaches the view.
    pub(crate) fn dispose(&self) {
        let mut disposed = lock(&self.disposed);
        if !*disposed {
            *disposed = true;
            self.connection.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Disposable;

    #[derive(Clone, Default)]
    struct Recorder {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Disposable for Recorder {
        fn dispose(&self) {
            self.log.lock().unwrap().push("dispose".to_string());
        }
    }

    impl Connection<String> for Recorder {
        fn accept(&self, value: String) {
            self.log.lock().unwrap().push(value);
        }
    }

    fn forwarding(log: &Arc<Mutex<Vec<String>>>) -> Dispatch<String> {
        let sink = Arc::clone(log);
        Arc::new(move |event| sink.lock().unwrap().push(event))
    }

    #[test]
    fn idle_consumer_drops_events() {
        let events = EventConsumer::<String>::new();
        events.accept("dropped".to_string());
        assert!(!events.is_closed());
    }

    #[test]
    fn forwarding_consumer_dispatches_events() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let events = EventConsumer::new();

        events.forward_to(forwarding(&log));
        events.clone().accept("a".to_string());
        events.idle();
        events.accept("b".to_string());

        assert_eq!(*log.lock().unwrap(), vec!["a"]);
    }

    #[test]
    fn closed_consumer_cannot_be_reopened() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let events = EventConsumer::new();

        events.close();
        events.forward_to(forwarding(&log));
        events.accept("a".to_string());

        assert!(events.is_closed());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn view_handle_disposes_once_and_stops_delivery() {
        let recorder = Recorder::default();
        let handle = ViewHandle::new(Box::new(recorder.clone()));

        handle.deliver("one".to_string());
        handle.dispose();
        handle.dispose();
        handle.deliver("two".to_string());

        assert_eq!(*recorder.log.lock().unwrap(), vec!["one", "dispose"]);
    }

    struct SlowView {
        log: Arc<Mutex<Vec<String>>>,
        entered: crossbeam_channel::Sender<()>,
    }

    impl Disposable for SlowView {
        fn dispose(&self) {
            self.log.lock().unwrap().push("dispose".to_string());
        }
    }

    impl Connection<String> for SlowView {
        fn accept(&self, value: String) {
            self.log.lock().unwrap().push(format!("begin {value}"));
            self.entered.send(()).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(50));
            self.log.lock().unwrap().push(format!("end {value}"));
        }
    }

    #[test]
    fn dispose_waits_for_accept_on_another_thread() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (entered, inside) = crossbeam_channel::bounded(1);
        let handle = Arc::new(ViewHandle::new(Box::new(SlowView {
            log: Arc::clone(&log),
            entered,
        })));

        let worker = {
            let handle = Arc::clone(&handle);
            std::thread::spawn(move || handle.deliver("init".to_string()))
        };
        inside.recv().unwrap();
        handle.dispose();
        worker.join().unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["begin init", "end init", "dispose"]);
    }
}
