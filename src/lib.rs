//! Stepwise: a table-driven finite state machine engine.
//!
//! Stepwise follows a "pure core, imperative shell" split. The core validates
//! state tables, resolves next states and holds per-run machines, with no
//! side effects. The shell runs asynchronous per-state handlers against a
//! machine until a handler leaves the state where it found it.
//!
//! # Core Concepts
//!
//! - **State table**: ordered mapping from state to its named transitions
//! - **Machine**: one mutable current state bound to a validated table
//! - **Handlers**: async work for each state, free to move the machine
//! - **Runner**: invokes handlers until the state stops changing
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use stepwise::{create_machine, StateTable};
//!
//! let table = StateTable::from_value(&json!({
//!     "initial": { "AGREE_TO_TERMS": "agreed", "REJECTED_TERMS": "rejected" },
//!     "agreed": {},
//!     "rejected": {}
//! }))
//! .unwrap();
//!
//! let mut machine = create_machine(table, None).unwrap();
//! assert_eq!(machine.current(), "initial");
//!
//! machine.transition("AGREE_TO_TERMS");
//! assert_eq!(machine.current(), "agreed");
//!
//! // Unknown transitions leave the state unchanged.
//! machine.transition("REJECTED_TERMS");
//! assert_eq!(machine.current(), "agreed");
//! ```

pub mod builder;
pub mod core;
pub mod effects;

// Re-export commonly used types
pub use crate::builder::{BuildError, StateTableBuilder, TransitionRunnerBuilder};
pub use crate::core::{
    create_machine, resolve_next, validate_table, Machine, MachineError, StateHistory, StateTable,
};
pub use crate::effects::{
    create_transition_runner, HandlerFailure, HandlerSpec, RunStrategy, TransitionError,
    TransitionRunner,
};
