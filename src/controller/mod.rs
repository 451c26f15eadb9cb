//! Controllers binding a loop to an externally managed view.
//!
//! A host (a UI framework, a windowing toolkit, a test) creates, shows,
//! hides and destroys a view on its own schedule. A [`Controller`] mirrors
//! that schedule with four calls and keeps the loop in step:
//!
//! | Operation     | Valid from      | Result    |
//! |---------------|-----------------|-----------|
//! | `connect`     | init            | created   |
//! | `start`       | created         | running   |
//! | `stop`        | running         | created   |
//! | `disconnect`  | created         | init      |
//! | `save_state`  | init, created   | unchanged |
//! | `restore_state` | init, created | unchanged |
//!
//! Calls from any other state fail with
//! [`ControllerError::IllegalTransition`], naming the state the controller
//! was in.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use tether::checkpoint::SerdeSaveRestore;
//! use tether::controller::{Controller, LoopController};
//! use tether::core::{Connection, Disposable};
//! use tether::loops::UpdateLoopFactory;
//! use tether::runners::WorkRunners;
//!
//! #[derive(Clone, Default)]
//! struct Screen {
//!     shown: Arc<Mutex<Vec<String>>>,
//! }
//!
//! impl Disposable for Screen {
//!     fn dispose(&self) {}
//! }
//!
//! impl Connection<String> for Screen {
//!     fn accept(&self, model: String) {
//!         self.shown.lock().unwrap().push(model);
//!     }
//! }
//!
//! let mut controller = LoopController::new(
//!     Arc::new(UpdateLoopFactory::new(|model: &String, event: String| format!("{model}{event}"))),
//!     Arc::new(SerdeSaveRestore::new("model", || "init".to_string())),
//!     WorkRunners::immediate(),
//! );
//!
//! let screen = Screen::default();
//! let mut events = None;
//! controller
//!     .connect(|consumer| {
//!         events = Some(consumer);
//!         Some(screen.clone())
//!     })
//!     .unwrap();
//! controller.start().unwrap();
//!
//! events.unwrap().accept("!".to_string());
//! assert_eq!(*screen.shown.lock().unwrap(), vec!["init", "init!"]);
//! ```

pub mod error;
mod lifecycle;
mod mapping;
mod view;

use crate::checkpoint::SavedState;
use crate::core::{Connection, ControllerState};

pub use error::ControllerError;
pub use lifecycle::LoopController;
pub use mapping::MappingController;
pub use view::EventConsumer;

/// A lifecycle-guarded binding between a loop and a view.
///
/// Lifecycle calls are expected from one caller context (typically the host
/// UI's own lifecycle callbacks); they are not meant to race each other.
pub trait Controller<M, E> {
    /// Attach a view.
    ///
    /// `view` receives the event proxy the view should submit events to and
    /// returns the connection models are delivered to. Returning `None` is a
    /// contract violation.
    fn connect<V, C>(&mut self, view: V) -> Result<(), ControllerError>
    where
        V: FnOnce(EventConsumer<E>) -> Option<C>,
        C: Connection<M> + 'static;

    /// Detach the view, disposing its connection.
    fn disconnect(&mut self) -> Result<(), ControllerError>;

    /// Start a loop and begin delivering models to the view.
    fn start(&mut self) -> Result<(), ControllerError>;

    /// Dispose the running loop, keeping its latest model for the next start.
    fn stop(&mut self) -> Result<(), ControllerError>;

    /// Write the model into `out`. `None` is accepted and ignored.
    fn save_state(&self, out: Option<&mut SavedState>) -> Result<(), ControllerError>;

    /// Read a model from `input` to start from next time. `None` is accepted
    /// and ignored.
    fn restore_state(&mut self, input: Option<&SavedState>) -> Result<(), ControllerError>;

    fn state(&self) -> ControllerState;

    fn is_running(&self) -> bool {
        self.state().is_running()
    }
}
