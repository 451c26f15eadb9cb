//! Routing effects to transformers by effect variant.

use super::{
    end_on_error, from_action, from_consumer, EffectError, EffectStream, EffectTransformer,
    EventStream,
};
use futures::channel::mpsc;
use futures::future;
use futures::stream::{self, StreamExt};
use crate::sync::lock;
use std::fmt::{self, Debug, Display};
use std::sync::{Arc, Mutex};

type Predicate<F> = Arc<dyn Fn(&F) -> bool + Send + Sync>;

struct Route<F, E> {
    predicate: Predicate<F>,
    transformer: Box<dyn EffectTransformer<F, E>>,
}

/// Builder for [`SubtypeEffectHandler`].
///
/// Routes are tried in registration order; the first matching predicate wins.
pub struct SubtypeEffectHandlerBuilder<F, E> {
    routes: Vec<Route<F, E>>,
}

impl<F, E> SubtypeEffectHandlerBuilder<F, E>
where
    F: Debug + Send + 'static,
    E: Send + 'static,
{
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Send effects matching `predicate` to `transformer`.
    pub fn add_transformer<P, T>(mut self, predicate: P, transformer: T) -> Self
    where
        P: Fn(&F) -> bool + Send + Sync + 'static,
        T: EffectTransformer<F, E> + 'static,
    {
        self.routes.push(Route {
            predicate: Arc::new(predicate),
            transformer: Box::new(transformer),
        });
        self
    }

    /// Run `action` for every effect matching `predicate`.
    pub fn add_action<P, A, Err>(self, predicate: P, action: A) -> Self
    where
        P: Fn(&F) -> bool + Send + Sync + 'static,
        A: Fn() -> Result<(), Err> + Send + Sync + 'static,
        Err: Display,
    {
        self.add_transformer(predicate, from_action::<F, A, Err>(action))
    }

    /// Run `consumer` with every effect matching `predicate`.
    pub fn add_consumer<P, C, Err>(self, predicate: P, consumer: C) -> Self
    where
        P: Fn(&F) -> bool + Send + Sync + 'static,
        C: Fn(F) -> Result<(), Err> + Send + Sync + 'static,
        Err: Display,
    {
        self.add_transformer(predicate, from_consumer(consumer))
    }

    pub fn build(self) -> SubtypeEffectHandler<F, E> {
        SubtypeEffectHandler {
            routes: self.routes,
        }
    }
}

impl<F, E> Default for SubtypeEffectHandlerBuilder<F, E>
where
    F: Debug + Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// An effect transformer merging several transformers, each responsible for
/// the effects its predicate selects.
///
/// An effect matched by no route stops dispatch. Events from effects already
/// routed are still emitted, then the stream fails with
/// [`EffectError::UnhandledEffect`].
pub struct SubtypeEffectHandler<F, E> {
    routes: Vec<Route<F, E>>,
}

impl<F, E> SubtypeEffectHandler<F, E>
where
    F: Debug + Send + 'static,
    E: Send + 'static,
{
    pub fn builder() -> SubtypeEffectHandlerBuilder<F, E> {
        SubtypeEffectHandlerBuilder::new()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}

impl<F, E> Debug for SubtypeEffectHandler<F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubtypeEffectHandler")
            .field("routes", &self.routes.len())
            .finish()
    }
}

impl<F, E> EffectTransformer<F, E> for SubtypeEffectHandler<F, E>
where
    F: Debug + Send + 'static,
    E: Send + 'static,
{
    fn transform(&self, mut effects: EffectStream<F>) -> EventStream<E> {
        let mut predicates = Vec::with_capacity(self.routes.len());
        let mut inlets = Vec::with_capacity(self.routes.len());
        let mut outputs = Vec::with_capacity(self.routes.len() + 1);

        for route in &self.routes {
            let (inlet, outlet) = mpsc::unbounded();
            predicates.push(Arc::clone(&route.predicate));
            inlets.push(inlet);
            outputs.push(route.transformer.transform(outlet.boxed()));
        }

        // Dropping the inlets closes every route; the routes then finish
        // what they were given before an unrouted effect is reported.
        let unhandled = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&unhandled);
        let dispatch = async move {
            while let Some(effect) = effects.next().await {
                match predicates.iter().position(|matches| matches(&effect)) {
                    Some(index) => {
                        if inlets[index].unbounded_send(effect).is_err() {
                            tracing::trace!(route = index, "Route closed, effect dropped");
                        }
                    }
                    None => {
                        tracing::warn!(effect = ?effect, "No route for effect");
                        *lock(&slot) = Some(EffectError::UnhandledEffect(format!("{effect:?}")));
                        break;
                    }
                }
            }
        };
        outputs.push(
            stream::once(dispatch)
                .filter_map(|()| future::ready(None))
                .boxed(),
        );

        let failure = stream::once(future::lazy(move |_| lock(&unhandled).take().map(Err)))
            .filter_map(future::ready);

        end_on_error(stream::select_all(outputs).chain(failure))
    }
}
