//! Lifecycle states of a controller.
//!
//! A controller moves between three states in step with the host view:
//! `Init` (no view), `Created` (view attached, loop idle) and `Running`
//! (view attached, loop live).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a controller.
///
/// The lowercase token returned by [`ControllerState::name`] is what error
/// messages report, so operators can tell from a log line which state a
/// rejected call arrived in.
///
/// # Example
///
/// ```rust
/// use tether::core::ControllerState;
///
/// let state = ControllerState::Created;
/// assert_eq!(state.name(), "created");
/// assert!(state.is_connected());
/// assert!(!state.is_running());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerState {
    /// No view is connected.
    #[default]
    Init,
    /// A view is connected but no loop is running.
    Created,
    /// A view is connected and a loop is running.
    Running,
}

impl ControllerState {
    /// Every state, in lifecycle order.
    pub const ALL: [ControllerState; 3] = [Self::Init, Self::Created, Self::Running];

    /// The state's token for display and logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Created => "created",
            Self::Running => "running",
        }
    }

    /// Whether a view is attached in this state.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Created | Self::Running)
    }

    /// Whether a loop is live in this state.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
