//! The loop collaborator contract.
//!
//! A controller does not know how a loop turns events into models. It only
//! needs to create one from an initial model, observe the models it emits,
//! feed it events and dispose of it. [`Loop`] and [`LoopFactory`] capture
//! exactly that; the effect type a loop uses internally stays hidden behind
//! the factory.

mod update;

use crate::core::Disposable;
use std::sync::Arc;

pub use update::UpdateLoopFactory;

/// Callback receiving every model a loop emits.
pub type ModelObserver<M> = Box<dyn Fn(M) + Send + Sync>;

/// A running event/model processing loop.
pub trait Loop<M, E>: Send + Sync {
    /// Feed an event into the loop.
    fn dispatch_event(&self, event: E);

    /// Observe emitted models.
    ///
    /// The loop's current model is delivered to the observer immediately,
    /// then every model emitted afterwards. Disposing the returned handle
    /// stops delivery to this observer.
    fn observe(&self, observer: ModelObserver<M>) -> Box<dyn Disposable>;

    /// Stop the loop. No model is emitted once this returns.
    fn dispose(&self);
}

/// Creates loops from an initial model.
pub trait LoopFactory<M, E>: Send + Sync {
    fn start_from(&self, model: M) -> Arc<dyn Loop<M, E>>;
}

impl<M, E, F> LoopFactory<M, E> for F
where
    F: Fn(M) -> Arc<dyn Loop<M, E>> + Send + Sync,
{
    fn start_from(&self, model: M) -> Arc<dyn Loop<M, E>> {
        self(model)
    }
}
