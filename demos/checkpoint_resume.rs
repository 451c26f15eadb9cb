//! Checkpoint and Resume
//!
//! This example demonstrates surviving view and process recreation.
//!
//! Key concepts:
//! - Driving a controller through connect/start/stop/disconnect
//! - Saving the model into a `SavedState` and encoding it as JSON
//! - Restoring into a brand new controller before its view connects
//! - Presenting the model through a `MappingController`
//!
//! Run with: cargo run --example checkpoint_resume

use serde::{Deserialize, Serialize};
use tether::builder::ControllerBuilder;
use tether::checkpoint::{SavedState, SerdeSaveRestore};
use tether::controller::{Controller, EventConsumer, LoopController, MappingController};
use tether::core::{Connection, Disposable};
use tether::loops::UpdateLoopFactory;
use tether::runners::WorkRunners;

// Player model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Player {
    track: usize,
    playing: bool,
}

#[derive(Debug)]
enum PlayerEvent {
    Play,
    Pause,
    Skip,
}

// Pure update function
fn update(player: &Player, event: PlayerEvent) -> Player {
    match event {
        PlayerEvent::Play => Player {
            playing: true,
            ..player.clone()
        },
        PlayerEvent::Pause => Player {
            playing: false,
            ..player.clone()
        },
        PlayerEvent::Skip => Player {
            track: player.track + 1,
            ..player.clone()
        },
    }
}

// A "screen" that prints what it is shown
struct Screen;

impl Disposable for Screen {
    fn dispose(&self) {
        println!("  [screen] destroyed");
    }
}

impl Connection<String> for Screen {
    fn accept(&self, label: String) {
        println!("  [screen] {label}");
    }
}

fn label(player: Player) -> String {
    let status = if player.playing { "playing" } else { "paused" };
    format!("track {} ({status})", player.track + 1)
}

fn new_controller() -> MappingController<LoopController<Player, PlayerEvent>, Player, String> {
    let controller = ControllerBuilder::<Player, PlayerEvent>::new()
        .loop_factory(UpdateLoopFactory::new(update))
        .save_restore(SerdeSaveRestore::new("player", Player::default))
        .work_runner(WorkRunners::immediate())
        .build()
        .expect("controller parts are configured");

    MappingController::new(controller, label)
}

fn connect(
    controller: &mut impl Controller<String, PlayerEvent>,
) -> EventConsumer<PlayerEvent> {
    let mut events = None;
    controller
        .connect(|consumer| {
            events = Some(consumer);
            Some(Screen)
        })
        .expect("controller starts disconnected");
    events.expect("view factory ran")
}

fn first_session(controller: &mut impl Controller<String, PlayerEvent>) -> SavedState {
    let events = connect(controller);
    controller.start().expect("view is connected");

    events.accept(PlayerEvent::Play);
    events.accept(PlayerEvent::Skip);
    events.accept(PlayerEvent::Skip);

    controller.stop().expect("controller is running");
    let mut saved = SavedState::new();
    controller
        .save_state(Some(&mut saved))
        .expect("model serializes");
    controller.disconnect().expect("controller is stopped");
    saved
}

fn second_session(
    controller: &mut impl Controller<String, PlayerEvent>,
    saved: &SavedState,
) -> EventConsumer<PlayerEvent> {
    controller
        .restore_state(Some(saved))
        .expect("model deserializes");
    let events = connect(controller);
    controller.start().expect("view is connected");

    events.accept(PlayerEvent::Pause);

    controller.stop().expect("controller is running");
    controller.disconnect().expect("controller is stopped");
    events
}

fn main() {
    println!("=== Checkpoint and Resume ===\n");

    println!("First session:");
    let saved = first_session(&mut new_controller());
    let json = saved.to_json().expect("saved state encodes");
    println!("\nSaved state:\n{json}\n");

    println!("Second session (new controller):");
    let restored = SavedState::from_json(&json).expect("saved state decodes");
    let mut controller = new_controller();
    let events = second_session(&mut controller, &restored);

    println!("\nLifecycle of the second controller:");
    for transition in controller.inner().history().transitions() {
        println!(
            "  {} : {} -> {}",
            transition.operation, transition.from, transition.to
        );
    }

    // Events after disconnect go nowhere
    events.accept(PlayerEvent::Play);
    println!("\nProxy closed after disconnect: {}", events.is_closed());
}
