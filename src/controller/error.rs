//! Controller error types.

use crate::checkpoint::CheckpointError;
use crate::core::{ControllerState, Operation};
use thiserror::Error;

/// Errors a controller reports to its caller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The operation is not valid from the current state. Nothing changed.
    #[error("cannot {operation} while {state}")]
    IllegalTransition {
        operation: Operation,
        state: ControllerState,
    },

    /// A collaborator did not produce a value it is required to produce.
    #[error("contract violation: {0}")]
    ContractViolation(&'static str),

    /// The persistence strategy failed to save or restore the model.
    #[error("model persistence failed: {0}")]
    Checkpoint(#[from] CheckpointError),
}

impl ControllerError {
    /// The state a rejected call arrived in, for illegal transitions.
    pub fn rejected_state(&self) -> Option<ControllerState> {
        match self {
            Self::IllegalTransition { state, .. } => Some(*state),
            _ => None,
        }
    }
}
