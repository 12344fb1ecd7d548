//! The asynchronous shell around the pure core.
//!
//! State handlers do the effectful work of each state and move the machine;
//! the [`TransitionRunner`] invokes them until the machine stops moving.
//!
//! # Key Concepts
//!
//! - **Handlers**: one async function per state, or one for every state
//! - **Runs**: each run owns a fresh machine and ends at a fixed point
//! - **Errors**: every failure surfaces as a [`TransitionError`]

mod error;
mod handler;
mod runner;

pub use error::{HandlerFailure, TransitionError};
pub use handler::{handler, sync_handler, HandlerResult, HandlerSpec, StateHandler, StateHandlers};
pub use runner::{
    create_transition_runner, RunStrategy, RunnerConfig, TransitionRunner, DEFAULT_INITIAL_STATE,
};
