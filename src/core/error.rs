//! Errors raised by the pure core: table validation and machine creation.

use thiserror::Error;

/// Errors raised by the validator, the machine factory and handler lookup.
///
/// These are programmer errors. The core returns them directly to its caller;
/// only the transition runner wraps them into a
/// [`TransitionError`](crate::effects::TransitionError).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    /// The table itself, or the transitions of `state`, are not a mapping, or
    /// a state has an empty name.
    #[error("{}", kind_message(.state.as_deref()))]
    InvalidTableKind { state: Option<String> },

    /// A registered transition leads to a state missing from the table.
    #[error(
        "transition '{transition}' of state '{state}' leads to '{target}', which is not a state in the table"
    )]
    UnreachableTargetState {
        state: String,
        transition: String,
        target: String,
    },

    /// The starting state is empty or not declared in the table.
    #[error("initial state {state:?} must be one of the states declared in the table")]
    InvalidInitialState { state: Option<String> },

    /// A per-state handler map has no entry for a visited state.
    #[error("no handler was defined for the current state of '{state}'")]
    UnhandledState { state: String },
}

fn kind_message(state: Option<&str>) -> String {
    match state {
        None => "a state table must be a mapping of states to transitions".to_string(),
        Some("") => "state names must be non-empty".to_string(),
        Some(state) => format!("the transitions of state '{state}' must be a mapping"),
    }
}
