//! Adapters from side-effecting functions to effect transformers.
//!
//! Each received effect triggers exactly one execution of the wrapped
//! function. Executions are independent: a slow one never holds back the
//! next effect. Without a runner the function runs on whatever context polls
//! the output stream; with one, each execution is posted to the runner as
//! [`Work`](crate::runners::Work).

use super::{end_on_error, EffectError, EffectStream, EffectTransformer, EventStream};
use crate::runners::WorkRunner;
use crate::sync::panic_message;
use futures::channel::oneshot;
use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::StreamExt;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

type Consumer<F> = Arc<dyn Fn(F) -> Result<(), String> + Send + Sync>;

/// Transformer running a one-argument consumer with every effect.
///
/// Created by [`from_consumer`] and [`from_consumer_on`]. Never emits events.
pub struct ConsumerTransformer<F> {
    consumer: Consumer<F>,
    runner: Option<Arc<dyn WorkRunner>>,
}

impl<F> Clone for ConsumerTransformer<F> {
    fn clone(&self) -> Self {
        Self {
            consumer: Arc::clone(&self.consumer),
            runner: self.runner.clone(),
        }
    }
}

impl<F, E> EffectTransformer<F, E> for ConsumerTransformer<F>
where
    F: Send + 'static,
    E: Send + 'static,
{
    fn transform(&self, effects: EffectStream<F>) -> EventStream<E> {
        let consumer = Arc::clone(&self.consumer);
        let runner = self.runner.clone();

        let failures = effects
            .map(move |effect| execute(Arc::clone(&consumer), runner.clone(), effect))
            .buffer_unordered(usize::MAX)
            .filter_map(|outcome| {
                future::ready(match outcome {
                    Ok(()) => None,
                    Err(error) => Some(Err::<E, EffectError>(error)),
                })
            });

        end_on_error(failures)
    }
}

/// Transformer running a zero-argument action for every effect.
///
/// Created by [`from_action`] and [`from_action_on`]. Never emits events.
pub struct ActionTransformer<F> {
    inner: ConsumerTransformer<F>,
}

impl<F> Clone for ActionTransformer<F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<F, E> EffectTransformer<F, E> for ActionTransformer<F>
where
    F: Send + 'static,
    E: Send + 'static,
{
    fn transform(&self, effects: EffectStream<F>) -> EventStream<E> {
        self.inner.transform(effects)
    }
}

/// Run `action` once per received effect on the polling context.
pub fn from_action<F, A, Err>(action: A) -> ActionTransformer<F>
where
    F: Send + 'static,
    A: Fn() -> Result<(), Err> + Send + Sync + 'static,
    Err: Display,
{
    ActionTransformer {
        inner: from_consumer(move |_: F| action()),
    }
}

/// Run `action` once per received effect, as work posted to `runner`.
pub fn from_action_on<F, A, Err>(action: A, runner: Arc<dyn WorkRunner>) -> ActionTransformer<F>
where
    F: Send + 'static,
    A: Fn() -> Result<(), Err> + Send + Sync + 'static,
    Err: Display,
{
    ActionTransformer {
        inner: from_consumer_on(move |_: F| action(), runner),
    }
}

/// Run `consumer` with each received effect on the polling context.
pub fn from_consumer<F, C, Err>(consumer: C) -> ConsumerTransformer<F>
where
    F: Send + 'static,
    C: Fn(F) -> Result<(), Err> + Send + Sync + 'static,
    Err: Display,
{
    ConsumerTransformer {
        consumer: erase(consumer),
        runner: None,
    }
}

/// Run `consumer` with each received effect, as work posted to `runner`.
pub fn from_consumer_on<F, C, Err>(consumer: C, runner: Arc<dyn WorkRunner>) -> ConsumerTransformer<F>
where
    F: Send + 'static,
    C: Fn(F) -> Result<(), Err> + Send + Sync + 'static,
    Err: Display,
{
    ConsumerTransformer {
        consumer: erase(consumer),
        runner: Some(runner),
    }
}

fn erase<F, C, Err>(consumer: C) -> Consumer<F>
where
    C: Fn(F) -> Result<(), Err> + Send + Sync + 'static,
    Err: Display,
{
    Arc::new(move |effect| consumer(effect).map_err(|error| error.to_string()))
}

fn execute<F>(
    consumer: Consumer<F>,
    runner: Option<Arc<dyn WorkRunner>>,
    effect: F,
) -> BoxFuture<'static, Result<(), EffectError>>
where
    F: Send + 'static,
{
    match runner {
        None => future::lazy(move |_| run_guarded(&consumer, effect)).boxed(),
        Some(runner) => {
            let (done, outcome) = oneshot::channel();
            runner.post(Box::new(move || {
                let _ = done.send(run_guarded(&consumer, effect));
            }));
            // A disposed runner drops the work, and with it the sender.
            outcome
                .map(|received| received.unwrap_or(Err(EffectError::Cancelled)))
                .boxed()
        }
    }
}

fn run_guarded<F>(consumer: &Consumer<F>, effect: F) -> Result<(), EffectError> {
    match panic::catch_unwind(AssertUnwindSafe(|| consumer(effect))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(message)) => {
            tracing::debug!(error = %message, "Effect action failed");
            Err(EffectError::ActionFailed(message))
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(panic = %message, "Effect action panicked");
            Err(EffectError::ActionPanicked(message))
        }
    }
}
