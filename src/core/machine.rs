//! Machines: one mutable current state over a shared, immutable table.

use super::error::MachineError;
use super::history::{StateHistory, StateTransition};
use super::resolve::resolve_next;
use super::table::StateTable;
use chrono::Utc;
use std::sync::Arc;
use tracing::trace;

/// A running machine.
///
/// Owns its current state; the table is shared read-only, so any number of
/// machines can be created from one table without observing each other.
/// [`Machine::step`] is the step function: it either reads the current state
/// or advances it through a registered transition.
///
/// A machine holds only its current state unless history is enabled with
/// [`Machine::with_history`].
#[derive(Clone, Debug)]
pub struct Machine {
    table: Arc<StateTable>,
    current: String,
    history: Option<StateHistory>,
}

/// Validate `table` and create a machine positioned at its starting state.
///
/// The starting state is `initial` when given, otherwise the first state
/// declared in the table. Validation failures are returned unchanged;
/// a starting state that is empty or not declared fails with
/// [`MachineError::InvalidInitialState`].
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use stepwise::core::{create_machine, StateTable};
///
/// let table = StateTable::from_value(&json!({
///     "initial": { "ATTEMPT_LOGIN": "inProgress" },
///     "inProgress": { "LOGIN_SUCCESSFUL": "loggedIn", "LOGIN_ERROR": "initial" },
///     "loggedIn": {}
/// }))
/// .unwrap();
///
/// let mut machine = create_machine(table, None).unwrap();
/// assert_eq!(machine.step(None), "initial");
/// assert_eq!(machine.step(Some("LOGIN_SUCCESSFUL")), "initial");
/// assert_eq!(machine.step(Some("ATTEMPT_LOGIN")), "inProgress");
/// assert_eq!(machine.step(Some("LOGIN_SUCCESSFUL")), "loggedIn");
/// ```
pub fn create_machine(
    table: impl Into<Arc<StateTable>>,
    initial: Option<&str>,
) -> Result<Machine, MachineError> {
    let table = table.into();
    table.validate()?;

    let current = match initial {
        Some(state) => Some(state),
        None => table.first_state(),
    };

    let current = match current {
        Some(state) if !state.is_empty() && table.contains(state) => state.to_string(),
        other => {
            return Err(MachineError::InvalidInitialState {
                state: other.map(str::to_string),
            })
        }
    };

    Ok(Machine {
        table,
        current,
        history: None,
    })
}

impl Machine {
    /// Record every effective move from now on.
    pub fn with_history(mut self) -> Self {
        self.history.get_or_insert_with(StateHistory::new);
        self
    }

    /// Read or advance the current state.
    ///
    /// With `None` this is a pure read. With a transition name the next state
    /// is resolved against the table and becomes current; unregistered
    /// transitions leave the state unchanged. Returns the (possibly new)
    /// current state.
    pub fn step(&mut self, transition: Option<&str>) -> &str {
        let Some(transition) = transition else {
            return &self.current;
        };

        let next = resolve_next(&self.current, Some(transition), Some(&*self.table));
        if next != self.current {
            trace!(from = %self.current, to = %next, transition, "state advanced");
            let next = next.to_string();
            let from = std::mem::replace(&mut self.current, next);
            if let Some(history) = self.history.as_mut() {
                history.record(StateTransition {
                    from,
                    to: self.current.clone(),
                    transition: transition.to_string(),
                    timestamp: Utc::now(),
                });
            }
        }

        &self.current
    }

    /// Advance through `transition`; shorthand for `step(Some(transition))`.
    pub fn transition(&mut self, transition: &str) -> &str {
        self.step(Some(transition))
    }

    /// Get current state (pure)
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Transitions registered under the current state.
    pub fn available_transitions(&self) -> impl Iterator<Item = &str> {
        self.table
            .transitions(&self.current)
            .into_iter()
            .flat_map(|transitions| transitions.keys().map(String::as_str))
    }

    /// Whether `transition` would move the machine out of its current state.
    pub fn can(&self, transition: &str) -> bool {
        self.table.next_state(&self.current, Some(transition)) != self.current
    }

    /// The table this machine runs on.
    pub fn table(&self) -> &Arc<StateTable> {
        &self.table
    }

    /// Recorded moves, if history is enabled.
    pub fn history(&self) -> Option<&StateHistory> {
        self.history.as_ref()
    }
}
