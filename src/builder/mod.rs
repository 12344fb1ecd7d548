//! Builder API for ergonomic table and runner construction.
//!
//! This module provides fluent builders and a macro for declaring state
//! tables, plus the builder that pairs a validated table with handlers.

pub mod error;
pub mod macros;
pub mod runner;
pub mod table;

pub use error::BuildError;
pub use runner::TransitionRunnerBuilder;
pub use table::StateTableBuilder;
