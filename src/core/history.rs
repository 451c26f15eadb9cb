//! Lifecycle transition history.
//!
//! Records the state-changing operations a controller performed, oldest
//! first. The history is bounded so a controller that is started and stopped
//! for the lifetime of a process does not grow without limit.

use super::operation::Operation;
use super::state::ControllerState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of transitions a history retains.
pub const MAX_RECORDED_TRANSITIONS: usize = 128;

/// Record of a single lifecycle transition.
///
/// # Example
///
/// ```rust
/// use tether::core::{ControllerState, LifecycleTransition, Operation};
/// use chrono::Utc;
///
/// let transition = LifecycleTransition {
///     operation: Operation::Connect,
///     from: ControllerState::Init,
///     to: ControllerState::Created,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.to, ControllerState::Created);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LifecycleTransition {
    /// The operation that caused the transition
    pub operation: Operation,
    /// The state being transitioned from
    pub from: ControllerState,
    /// The state being transitioned to
    pub to: ControllerState,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of lifecycle transitions.
///
/// `record` returns a new history and leaves the receiver untouched.
///
/// # Example
///
/// ```rust
/// use tether::core::{ControllerState, LifecycleHistory, LifecycleTransition, Operation};
/// use chrono::Utc;
///
/// let history = LifecycleHistory::new().record(LifecycleTransition {
///     operation: Operation::Connect,
///     from: ControllerState::Init,
///     to: ControllerState::Created,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(
///     history.get_path(),
///     vec![ControllerState::Init, ControllerState::Created]
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LifecycleHistory {
    transitions: VecDeque<LifecycleTransition>,
}

impl LifecycleHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: VecDeque::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// Once [`MAX_RECORDED_TRANSITIONS`] entries are held the oldest entry is
    /// dropped.
    pub fn record(&self, transition: LifecycleTransition) -> Self {
        let mut transitions = self.transitions.clone();
        if transitions.len() == MAX_RECORDED_TRANSITIONS {
            transitions.pop_front();
        }
        transitions.push_back(transition);
        Self { transitions }
    }

    /// Get the path of states traversed: the first `from`, then every `to`.
    pub fn get_path(&self) -> Vec<ControllerState> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Count how many recorded transitions were caused by `operation`.
    pub fn count(&self, operation: Operation) -> usize {
        self.transitions
            .iter()
            .filter(|t| t.operation == operation)
            .count()
    }

    /// Get the most recent transition.
    pub fn last(&self) -> Option<&LifecycleTransition> {
        self.transitions.back()
    }

    /// Iterate over recorded transitions, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &LifecycleTransition> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ControllerState::*;

    fn transition(operation: Operation, from: ControllerState) -> LifecycleTransition {
        LifecycleTransition {
            operation,
            from,
            to: operation.target(from),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = LifecycleHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.last().is_none());
    }

    #[test]
    fn record_does_not_mutate_original() {
        let history = LifecycleHistory::new();
        let recorded = history.record(transition(Operation::Connect, Init));

        assert_eq!(history.len(), 0);
        assert_eq!(recorded.len(), 1);
    }

    #[test]
    fn path_follows_recorded_transitions() {
        let history = LifecycleHistory::new()
            .record(transition(Operation::Connect, Init))
            .record(transition(Operation::Start, Created))
            .record(transition(Operation::Stop, Running))
            .record(transition(Operation::Disconnect, Created));

        assert_eq!(
            history.get_path(),
            vec![Init, Created, Running, Created, Init]
        );
        assert_eq!(history.last().map(|t| t.operation), Some(Operation::Disconnect));
    }

    #[test]
    fn count_filters_by_operation() {
        let history = LifecycleHistory::new()
            .record(transition(Operation::Connect, Init))
            .record(transition(Operation::Start, Created))
            .record(transition(Operation::Stop, Running))
            .record(transition(Operation::Start, Created));

        assert_eq!(history.count(Operation::Start), 2);
        assert_eq!(history.count(Operation::Stop), 1);
        assert_eq!(history.count(Operation::Disconnect), 0);
    }

    #[test]
    fn history_drops_oldest_beyond_bound() {
        let mut history = LifecycleHistory::new().record(transition(Operation::Connect, Init));
        for _ in 0..MAX_RECORDED_TRANSITIONS {
            history = history
                .record(transition(Operation::Start, Created))
                .record(transition(Operation::Stop, Running));
        }

        assert_eq!(history.len(), MAX_RECORDED_TRANSITIONS);
        assert_eq!(history.count(Operation::Connect), 0);
    }

    #[test]
    fn history_serializes_round_trip() {
        let history = LifecycleHistory::new().record(transition(Operation::Connect, Init));
        let json = serde_json::to_string(&history).unwrap();
        let back: LifecycleHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, history);
    }
}
