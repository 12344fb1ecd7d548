//! Handler failures and the normalized error surfaced by a run.

use crate::core::MachineError;
use serde_json::{Map, Value};
use std::any::Any;
use thiserror::Error;

/// Failure returned by a state handler.
///
/// This is the explicit form of a failed step: a handler returns
/// `Err(HandlerFailure)` instead of a value and the run stops. Optional
/// `data` and `extensions` values are merged into the resulting
/// [`TransitionError`] when they are JSON objects.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use stepwise::effects::HandlerFailure;
///
/// let failure = HandlerFailure::new("login rejected")
///     .with_data(json!({ "attempts": 3 }))
///     .with_extensions(json!({ "code": "UNAUTHENTICATED" }));
///
/// assert_eq!(failure.to_string(), "login rejected");
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct HandlerFailure {
    pub message: String,
    pub data: Option<Value>,
    pub extensions: Option<Value>,
    /// The engine error behind this failure, if any.
    #[source]
    pub kind: Option<MachineError>,
}

impl HandlerFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            extensions: None,
            kind: None,
        }
    }

    /// Wrap any error, keeping only its message.
    pub fn from_error(error: impl std::error::Error) -> Self {
        Self::new(error.to_string())
    }

    /// Attach diagnostic data.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach extension fields, merged after `data`.
    pub fn with_extensions(mut self, extensions: Value) -> Self {
        self.extensions = Some(extensions);
        self
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "state handler panicked".to_string()
        };
        Self::new(message)
    }
}

impl From<MachineError> for HandlerFailure {
    fn from(error: MachineError) -> Self {
        Self {
            kind: Some(error.clone()),
            ..Self::new(error.to_string())
        }
    }
}

impl From<serde_json::Error> for HandlerFailure {
    fn from(error: serde_json::Error) -> Self {
        Self::from_error(error)
    }
}

/// The single error type a run reports.
///
/// Every failure during a run (an unusable starting state, a state without a
/// handler, a handler failure or panic) is normalized into this shape.
/// `state` is the state the machine reported when the failure surfaced.
/// `data` holds the failure's `data` fields, then its `extensions` fields,
/// and finally a `"state"` entry that always wins over merged keys.
/// `kind` keeps the engine error when the failure came from the engine
/// rather than from a handler.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message} (state: '{state}')")]
pub struct TransitionError {
    pub message: String,
    pub state: String,
    pub data: Map<String, Value>,
    #[source]
    pub kind: Option<MachineError>,
}

impl TransitionError {
    pub fn new(failure: HandlerFailure, state: impl Into<String>) -> Self {
        let state = state.into();
        let mut data = Map::new();

        for extra in [failure.data, failure.extensions].into_iter().flatten() {
            if let Value::Object(fields) = extra {
                data.extend(fields);
            }
        }
        data.insert("state".to_string(), Value::String(state.clone()));

        Self {
            message: failure.message,
            state,
            data,
            kind: failure.kind,
        }
    }
}
