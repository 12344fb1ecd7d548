//! Build errors for the transition runner builder.

use crate::core::MachineError;
use thiserror::Error;

/// Errors that can occur when building a transition runner.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("a state table is required but was not provided")]
    MissingMachine,

    #[error("a handler is required for the state machine transitions")]
    MissingHandler,

    #[error("invalid state table: {0}")]
    InvalidTable(#[from] MachineError),
}
