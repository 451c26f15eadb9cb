//! Core lifecycle types.
//!
//! This module contains the pure part of the controller:
//! - Lifecycle states via `ControllerState`
//! - The operation table that guards every transition
//! - Bounded history of performed transitions
//! - The `Connection`/`Disposable` traits views and loops implement
//!
//! Nothing in here touches a loop, a view or a work runner.

mod connection;
mod history;
mod operation;
mod state;

pub use connection::{Connection, Disposable};
pub use history::{LifecycleHistory, LifecycleTransition, MAX_RECORDED_TRANSITIONS};
pub use operation::Operation;
pub use state::ControllerState;
