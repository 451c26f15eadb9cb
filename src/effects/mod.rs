//! Effect handling protocol and adapters for fire-and-forget effects.
//!
//! An effect handler consumes a stream of effects and produces a stream of
//! events. Many effects only exist for their side effect (log this, persist
//! that, show a toast) and never produce an event; the adapters in this
//! module turn such a function into a full [`EffectTransformer`] so it can sit
//! next to event-producing handlers in a [`SubtypeEffectHandler`].
//!
//! # Key Concepts
//!
//! - **Transformer**: `Stream<Effect>` in, `Stream<Result<Event, EffectError>>` out
//! - **Adapters**: [`from_action`] and [`from_consumer`] run one operation per effect
//! - **Runners**: the `_on` variants execute the operation on a [`WorkRunner`]
//! - **Failure**: an `Err` item is terminal; the output stream ends after it
//!
//! [`WorkRunner`]: crate::runners::WorkRunner

mod subtype;
mod transformers;

use futures::future;
use futures::stream::{BoxStream, Stream, StreamExt};
use thiserror::Error;

pub use subtype::{SubtypeEffectHandler, SubtypeEffectHandlerBuilder};
pub use transformers::{
    from_action, from_action_on, from_consumer, from_consumer_on, ActionTransformer,
    ConsumerTransformer,
};

/// Inbound stream of effects.
pub type EffectStream<F> = BoxStream<'static, F>;

/// Outbound stream of events, ending after the first failure.
pub type EventStream<E> = BoxStream<'static, Result<E, EffectError>>;

/// Errors delivered on an effect handler's failure channel.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EffectError {
    #[error("Effect action failed: {0}")]
    ActionFailed(String),

    #[error("Effect action panicked: {0}")]
    ActionPanicked(String),

    #[error("Effect work was discarded before it ran")]
    Cancelled,

    #[error("No handler registered for effect {0}")]
    UnhandledEffect(String),
}

/// Turns a stream of effects into a stream of events.
///
/// Every effect is handled independently: one effect produces zero or more
/// events and never blocks the handling of the next one.
pub trait EffectTransformer<F, E>: Send + Sync {
    fn transform(&self, effects: EffectStream<F>) -> EventStream<E>;
}

/// End `stream` right after its first `Err` item.
pub(crate) fn end_on_error<E, S>(stream: S) -> EventStream<E>
where
    E: Send + 'static,
    S: Stream<Item = Result<E, EffectError>> + Send + 'static,
{
    stream
        .scan(false, |failed, item| {
            if *failed {
                return future::ready(None);
            }
            *failed = item.is_err();
            future::ready(Some(item))
        })
        .boxed()
}
