//! History of the moves a machine actually made.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single effective transition.
///
/// Only steps that changed the current state are recorded; a step through an
/// unregistered transition leaves no trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state being left
    pub from: String,
    /// The state being entered
    pub to: String,
    /// The transition name that caused the move
    pub transition: String,
    /// When the move happened
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of effective transitions.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use stepwise::core::{StateHistory, StateTransition};
///
/// let mut history = StateHistory::new();
/// history.record(StateTransition {
///     from: "initial".to_string(),
///     to: "inProgress".to_string(),
///     transition: "ATTEMPT_LOGIN".to_string(),
///     timestamp: Utc::now(),
/// });
/// history.record(StateTransition {
///     from: "inProgress".to_string(),
///     to: "loggedIn".to_string(),
///     transition: "LOGIN_SUCCESSFUL".to_string(),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec!["initial", "inProgress", "loggedIn"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<StateTransition>,
}

impl StateHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Append a transition.
    pub fn record(&mut self, transition: StateTransition) {
        self.transitions.push(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the starting state followed by the `to` state of each
    /// transition. Empty when nothing was recorded.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(first.from.as_str());
        }
        for transition in &self.transitions {
            path.push(transition.to.as_str());
        }
        path
    }

    /// Elapsed time between the first and the last recorded move.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all transitions.
    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
