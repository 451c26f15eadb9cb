//! Effect adapters driven through real runners and routing handlers.

use futures::stream::{self, StreamExt};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use tether::effects::{
    from_action, from_action_on, from_consumer_on, EffectError, EffectStream, EffectTransformer,
    SubtypeEffectHandler,
};
use tether::runners::{SingleThreadWorkRunner, WorkRunner, WorkRunners};

#[derive(Debug, Clone, PartialEq)]
enum Effect {
    Persist(String),
    Toast,
    Crash,
}

#[derive(Debug, Clone, PartialEq)]
enum Event {}

fn effects(values: Vec<Effect>) -> EffectStream<Effect> {
    stream::iter(values).boxed()
}

#[tokio::test]
async fn consumer_runs_on_runner_thread() {
    let runner: Arc<dyn WorkRunner> = Arc::new(SingleThreadWorkRunner::spawn("effects").unwrap());
    let threads = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&threads);
    let transformer = from_consumer_on(
        move |_: Effect| {
            let name = std::thread::current().name().map(str::to_string);
            sink.lock().unwrap().push(name);
            Ok::<(), Infallible>(())
        },
        Arc::clone(&runner),
    );

    let events: Vec<Result<Event, EffectError>> = transformer
        .transform(effects(vec![Effect::Toast, Effect::Toast]))
        .collect()
        .await;

    assert!(events.is_empty());
    assert_eq!(
        *threads.lock().unwrap(),
        vec![Some("effects".to_string()), Some("effects".to_string())]
    );
    runner.dispose();
}

#[tokio::test]
async fn action_on_immediate_runner_runs_once_per_effect() {
    let hits = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&hits);
    let transformer = from_action_on(
        move || {
            *counter.lock().unwrap() += 1;
            Ok::<(), Infallible>(())
        },
        WorkRunners::immediate(),
    );

    let events: Vec<Result<Event, EffectError>> = transformer
        .transform(effects(vec![Effect::Toast, Effect::Crash, Effect::Toast]))
        .collect()
        .await;

    assert!(events.is_empty());
    assert_eq!(*hits.lock().unwrap(), 3);
}

#[tokio::test]
async fn runner_failure_ends_stream() {
    let runner: Arc<dyn WorkRunner> = Arc::new(SingleThreadWorkRunner::spawn("failing").unwrap());
    let transformer = from_consumer_on(
        |effect: Effect| match effect {
            Effect::Crash => Err("disk full"),
            _ => Ok(()),
        },
        Arc::clone(&runner),
    );

    let events: Vec<Result<Event, EffectError>> = transformer
        .transform(effects(vec![Effect::Crash, Effect::Toast]))
        .collect()
        .await;

    assert_eq!(
        events,
        vec![Err(EffectError::ActionFailed("disk full".to_string()))]
    );
    runner.dispose();
}

#[tokio::test]
async fn subtype_handler_dispatches_by_variant() {
    let persisted = Arc::new(Mutex::new(Vec::new()));
    let toasts = Arc::new(Mutex::new(0));
    let store = Arc::clone(&persisted);
    let shown = Arc::clone(&toasts);

    let handler = SubtypeEffectHandler::<Effect, Event>::builder()
        .add_consumer(
            |effect: &Effect| matches!(effect, Effect::Persist(_)),
            move |effect: Effect| {
                if let Effect::Persist(value) = effect {
                    store.lock().unwrap().push(value);
                }
                Ok::<(), Infallible>(())
            },
        )
        .add_action(
            |effect: &Effect| matches!(effect, Effect::Toast),
            move || {
                *shown.lock().unwrap() += 1;
                Ok::<(), Infallible>(())
            },
        )
        .build();

    let events: Vec<Result<Event, EffectError>> = handler
        .transform(effects(vec![
            Effect::Persist("a".to_string()),
            Effect::Toast,
            Effect::Persist("b".to_string()),
            Effect::Toast,
        ]))
        .collect()
        .await;

    assert!(events.is_empty());
    let mut persisted = persisted.lock().unwrap().clone();
    persisted.sort();
    assert_eq!(persisted, vec!["a", "b"]);
    assert_eq!(*toasts.lock().unwrap(), 2);
}

#[tokio::test]
async fn subtype_handler_fails_on_unrouted_effect() {
    let handler = SubtypeEffectHandler::<Effect, Event>::builder()
        .add_action(
            |effect: &Effect| matches!(effect, Effect::Toast),
            || Ok::<(), Infallible>(()),
        )
        .build();

    let events: Vec<Result<Event, EffectError>> = handler
        .transform(effects(vec![Effect::Persist("lost".to_string())]))
        .collect()
        .await;

    assert_eq!(
        events,
        vec![Err(EffectError::UnhandledEffect(
            "Persist(\"lost\")".to_string()
        ))]
    );
}

#[tokio::test]
async fn panicking_action_is_reported() {
    let transformer = from_action(|| -> Result<(), Infallible> { panic!("toast failed") });

    let events: Vec<Result<Event, EffectError>> =
        transformer.transform(effects(vec![Effect::Toast])).collect().await;

    assert_eq!(
        events,
        vec![Err(EffectError::ActionPanicked("toast failed".to_string()))]
    );
}
