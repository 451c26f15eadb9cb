//! Tether: lifecycle-bound controllers for event loops.
//!
//! Tether binds a model/event processing loop to a view whose lifetime is
//! managed by someone else: a UI toolkit, a window, a test harness. The
//! controller follows the view through `connect`, `start`, `stop` and
//! `disconnect`, creates and disposes loops in step, remembers the latest
//! model across restarts, and persists it through a pluggable strategy.
//!
//! # Core Concepts
//!
//! - **Lifecycle**: Guarded `init → created → running` state machine ([`core`])
//! - **Controllers**: Loop lifecycle management and view delivery ([`controller`])
//! - **Runners**: Where model deliveries execute ([`runners`])
//! - **Checkpoints**: Model persistence into a [`SavedState`] ([`checkpoint`])
//! - **Effects**: Adapters from side-effecting functions to effect handlers ([`effects`])
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use tether::builder::ControllerBuilder;
//! use tether::checkpoint::{SavedState, SerdeSaveRestore};
//! use tether::controller::Controller;
//! use tether::core::{Connection, Disposable};
//! use tether::loops::UpdateLoopFactory;
//! use tether::runners::WorkRunners;
//!
//! struct Label(Arc<Mutex<String>>);
//!
//! impl Disposable for Label {
//!     fn dispose(&self) {}
//! }
//!
//! impl Connection<u32> for Label {
//!     fn accept(&self, model: u32) {
//!         *self.0.lock().unwrap() = format!("clicked {model} times");
//!     }
//! }
//!
//! let mut controller = ControllerBuilder::<u32, ()>::new()
//!     .loop_factory(UpdateLoopFactory::new(|clicks: &u32, _click: ()| clicks + 1))
//!     .save_restore(SerdeSaveRestore::new("clicks", || 0u32))
//!     .work_runner(WorkRunners::immediate())
//!     .build()
//!     .unwrap();
//!
//! let text = Arc::new(Mutex::new(String::new()));
//! let mut clicks = None;
//! let label = Label(Arc::clone(&text));
//! controller
//!     .connect(|consumer| {
//!         clicks = Some(consumer);
//!         Some(label)
//!     })
//!     .unwrap();
//! controller.start().unwrap();
//!
//! let clicks = clicks.unwrap();
//! clicks.accept(());
//! clicks.accept(());
//! assert_eq!(*text.lock().unwrap(), "clicked 2 times");
//!
//! controller.stop().unwrap();
//! let mut saved = SavedState::new();
//! controller.save_state(Some(&mut saved)).unwrap();
//! assert_eq!(saved.get::<u32>("clicks").unwrap(), Some(2));
//! ```

pub mod builder;
pub mod checkpoint;
pub mod controller;
pub mod core;
pub mod effects;
pub mod loops;
pub mod runners;
mod sync;

// Re-export commonly used types
pub use builder::{BuildError, ControllerBuilder};
pub use checkpoint::{CheckpointError, ModelSaveRestore, SavedState, SerdeSaveRestore};
pub use controller::{Controller, ControllerError, EventConsumer, LoopController, MappingController};
pub use self::core::{Connection, ControllerState, Disposable, LifecycleHistory, Operation};
pub use effects::{EffectError, EffectTransformer};
pub use runners::{WorkRunner, WorkRunners};
