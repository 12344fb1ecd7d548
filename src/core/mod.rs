//! Core state machine types and logic.
//!
//! This module contains the pure core of the engine:
//! - Ordered state tables and their structural validation
//! - Next-state resolution
//! - Machines holding one mutable current state, with optional move history
//!
//! Nothing in this module performs I/O or awaits; handlers and the run loop
//! live in [`crate::effects`].

mod error;
mod history;
mod machine;
mod resolve;
mod table;
mod validate;

pub use error::MachineError;
pub use history::{StateHistory, StateTransition};
pub use machine::{create_machine, Machine};
pub use resolve::resolve_next;
pub use table::{StateTable, TransitionMap};
pub use validate::{diagnose_table, validate_table, TableValidation};
