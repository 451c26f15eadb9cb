//! Effect Routing
//!
//! This example demonstrates fire-and-forget effect handlers.
//!
//! Key concepts:
//! - Wrapping plain functions as effect transformers
//! - Offloading slow work onto a dedicated worker thread
//! - Routing effect variants with `SubtypeEffectHandler`
//! - Failures ending the event stream
//!
//! Run with: cargo run --example effect_routing

use futures::stream::{self, StreamExt};
use std::convert::Infallible;
use tether::effects::{from_consumer_on, EffectTransformer, SubtypeEffectHandler};
use tether::runners::{WorkRunner, WorkRunners};

#[derive(Debug, Clone)]
enum Effect {
    Log(String),
    SaveDraft(String),
    Notify,
}

// This handler only performs side effects, so it never emits events.
#[derive(Debug)]
enum Event {}

#[tokio::main]
async fn main() {
    println!("=== Effect Routing ===\n");

    let disk = WorkRunners::single_thread("disk-io").expect("worker thread spawns");

    let handler = SubtypeEffectHandler::<Effect, Event>::builder()
        .add_consumer(
            |effect: &Effect| matches!(effect, Effect::Log(_)),
            |effect: Effect| {
                if let Effect::Log(line) = effect {
                    println!("  [log] {line}");
                }
                Ok::<(), Infallible>(())
            },
        )
        .add_transformer(
            |effect: &Effect| matches!(effect, Effect::SaveDraft(_)),
            from_consumer_on(
                |effect: Effect| {
                    let thread = std::thread::current();
                    match effect {
                        Effect::SaveDraft(text) if text.is_empty() => Err("refusing empty draft"),
                        Effect::SaveDraft(text) => {
                            println!("  [{}] saved {text:?}", thread.name().unwrap_or("?"));
                            Ok(())
                        }
                        _ => Ok(()),
                    }
                },
                disk.clone(),
            ),
        )
        .build();

    println!("Handled effects:");
    let effects = vec![
        Effect::Log("editor opened".to_string()),
        Effect::SaveDraft("hello".to_string()),
        Effect::Log("draft saved".to_string()),
    ];
    let events: Vec<_> = handler.transform(stream::iter(effects).boxed()).collect().await;
    println!("  events emitted: {}\n", events.len());

    println!("A failing save:");
    let events: Vec<_> = handler
        .transform(stream::iter(vec![Effect::SaveDraft(String::new())]).boxed())
        .collect()
        .await;
    for event in &events {
        println!("  {event:?}");
    }

    println!("\nAn effect nobody handles:");
    let events: Vec<_> = handler
        .transform(stream::iter(vec![Effect::Notify]).boxed())
        .collect()
        .await;
    for event in &events {
        println!("  {event:?}");
    }

    disk.dispose();
}
