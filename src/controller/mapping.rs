//! Decorator presenting a controller's model as a different view type.

use super::error::ControllerError;
use super::view::EventConsumer;
use super::Controller;
use crate::checkpoint::SavedState;
use crate::core::{Connection, ControllerState, Disposable};
use std::sync::Arc;

type Mapper<M, V> = Arc<dyn Fn(M) -> V + Send + Sync>;

/// Wraps a `Controller<M, E>` so views see `V` instead of `M`.
///
/// Holds no lifecycle state of its own: every operation is forwarded to the
/// wrapped controller, and only the value handed to the view changes.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tether::checkpoint::SerdeSaveRestore;
/// use tether::controller::{Controller, LoopController, MappingController};
/// use tether::loops::UpdateLoopFactory;
/// use tether::runners::WorkRunners;
///
/// let inner: LoopController<u32, u32> = LoopController::new(
///     Arc::new(UpdateLoopFactory::new(|model: &u32, event: u32| model + event)),
///     Arc::new(SerdeSaveRestore::new("count", || 0u32)),
///     WorkRunners::immediate(),
/// );
///
/// let labels = MappingController::new(inner, |count: u32| format!("{count} plays"));
/// assert!(!labels.is_running());
/// ```
pub struct MappingController<C, M, V> {
    inner: C,
    mapper: Mapper<M, V>,
}

impl<C, M, V> MappingController<C, M, V> {
    pub fn new<F>(inner: C, mapper: F) -> Self
    where
        F: Fn(M) -> V + Send + Sync + 'static,
    {
        Self {
            inner,
            mapper: Arc::new(mapper),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C, M, V, E> Controller<V, E> for MappingController<C, M, V>
where
    C: Controller<M, E>,
    M: 'static,
    V: 'static,
{
    fn connect<W, K>(&mut self, view: W) -> Result<(), ControllerError>
    where
        W: FnOnce(EventConsumer<E>) -> Option<K>,
        K: Connection<V> + 'static,
    {
        let mapper = Arc::clone(&self.mapper);
        self.inner.connect(move |events| {
            view(events).map(|connection| MappedConnection { connection, mapper })
        })
    }

    fn disconnect(&mut self) -> Result<(), ControllerError> {
        self.inner.disconnect()
    }

    fn start(&mut self) -> Result<(), ControllerError> {
        self.inner.start()
    }

    fn stop(&mut self) -> Result<(), ControllerError> {
        self.inner.stop()
    }

    fn save_state(&self, out: Option<&mut SavedState>) -> Result<(), ControllerError> {
        self.inner.save_state(out)
    }

    fn restore_state(&mut self, input: Option<&SavedState>) -> Result<(), ControllerError> {
        self.inner.restore_state(input)
    }

    fn state(&self) -> ControllerState {
        self.inner.state()
    }
}

struct MappedConnection<K, M, V> {
    connection: K,
    mapper: Mapper<M, V>,
}

impl<K: Disposable, M, V> Disposable for MappedConnection<K, M, V> {
    fn dispose(&self) {
        self.connection.dispose();
    }
}

impl<K: Connection<V>, M, V> Connection<M> for MappedConnection<K, M, V> {
    fn accept(&self, value: M) {
        self.connection.accept((self.mapper)(value));
    }
}
