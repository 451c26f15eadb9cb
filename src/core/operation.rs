//! Lifecycle operations and the table that guards them.
//!
//! Each operation is valid from a fixed set of states and lands in a fixed
//! target state. Keeping the table here, as plain data, makes it the single
//! place that decides whether a call is legal.

use super::state::ControllerState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An operation a caller can perform on a controller.
///
/// # Example
///
/// ```rust
/// use tether::core::{ControllerState, Operation};
///
/// assert!(Operation::Start.permitted_from(ControllerState::Created));
/// assert!(!Operation::Start.permitted_from(ControllerState::Init));
/// assert_eq!(
///     Operation::Start.target(ControllerState::Created),
///     ControllerState::Running
/// );
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Connect,
    Start,
    Stop,
    Disconnect,
    SaveState,
    RestoreState,
}

impl Operation {
    /// Every operation.
    pub const ALL: [Operation; 6] = [
        Self::Connect,
        Self::Start,
        Self::Stop,
        Self::Disconnect,
        Self::SaveState,
        Self::RestoreState,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Disconnect => "disconnect",
            Self::SaveState => "save state",
            Self::RestoreState => "restore state",
        }
    }

    /// Check whether this operation may be invoked from `state` (pure).
    pub fn permitted_from(&self, state: ControllerState) -> bool {
        use ControllerState::*;

        match self {
            Self::Connect => state == Init,
            Self::Start | Self::Disconnect => state == Created,
            Self::Stop => state == Running,
            Self::SaveState | Self::RestoreState => matches!(state, Init | Created),
        }
    }

    /// The state a permitted invocation from `from` lands in (pure).
    ///
    /// Operations that do not change the lifecycle return `from`.
    pub fn target(&self, from: ControllerState) -> ControllerState {
        match self {
            Self::Connect | Self::Stop => ControllerState::Created,
            Self::Start => ControllerState::Running,
            Self::Disconnect => ControllerState::Init,
            Self::SaveState | Self::RestoreState => from,
        }
    }

    /// Whether a permitted invocation changes the lifecycle state.
    pub fn changes_state(&self) -> bool {
        !matches!(self, Self::SaveState | Self::RestoreState)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
