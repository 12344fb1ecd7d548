//! State handler types.

use crate::core::{Machine, MachineError};
use crate::effects::error::HandlerFailure;
use futures_util::future::{self, BoxFuture, FutureExt};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Outcome of one handler invocation.
pub type HandlerResult<T> = Result<T, HandlerFailure>;

/// Per-state logic invoked by the runner.
///
/// Receives the value produced by the previous handler (or the run's initial
/// data), the run's machine, and the run's context. A handler moves the
/// machine by calling [`Machine::step`] or [`Machine::transition`]; the run
/// ends once a handler leaves the state where it found it.
pub type StateHandler<T, C> = Arc<
    dyn for<'a> Fn(T, &'a mut Machine, &'a C) -> BoxFuture<'a, HandlerResult<T>> + Send + Sync,
>;

/// Wrap an asynchronous handler.
///
/// # Example
///
/// ```rust
/// use futures_util::FutureExt;
/// use stepwise::effects::{handler, StateHandler};
///
/// let attempt_login: StateHandler<u32, ()> = handler(|attempts, machine, _context| {
///     async move {
///         machine.transition("ATTEMPT_LOGIN");
///         Ok(attempts + 1)
///     }
///     .boxed()
/// });
/// ```
pub fn handler<T, C, F>(f: F) -> StateHandler<T, C>
where
    F: for<'a> Fn(T, &'a mut Machine, &'a C) -> BoxFuture<'a, HandlerResult<T>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// Wrap a handler that completes without suspending.
pub fn sync_handler<T, C, F>(f: F) -> StateHandler<T, C>
where
    T: Send + 'static,
    C: 'static,
    F: Fn(T, &mut Machine, &C) -> HandlerResult<T> + Send + Sync + 'static,
{
    handler(move |data, machine, context| future::ready(f(data, machine, context)).boxed())
}

/// Which handler runs for a visited state.
///
/// Either one handler for every state, or a handler per state. In the
/// per-state form, visiting a state without a handler fails the run with
/// [`MachineError::UnhandledState`].
pub enum HandlerSpec<T, C> {
    Single(StateHandler<T, C>),
    PerState(HashMap<String, StateHandler<T, C>>),
}

impl<T, C> HandlerSpec<T, C> {
    /// One asynchronous handler for every state.
    pub fn single<F>(f: F) -> Self
    where
        F: for<'a> Fn(T, &'a mut Machine, &'a C) -> BoxFuture<'a, HandlerResult<T>>
            + Send
            + Sync
            + 'static,
    {
        Self::Single(handler(f))
    }

    /// Start a per-state handler map.
    pub fn per_state() -> StateHandlers<T, C> {
        StateHandlers::new()
    }

    /// The handler to invoke for `state`.
    pub fn resolve(&self, state: &str) -> Result<&StateHandler<T, C>, MachineError> {
        match self {
            Self::Single(handler) => Ok(handler),
            Self::PerState(handlers) => {
                handlers
                    .get(state)
                    .ok_or_else(|| MachineError::UnhandledState {
                        state: state.to_string(),
                    })
            }
        }
    }
}

impl<T, C> Clone for HandlerSpec<T, C> {
    fn clone(&self) -> Self {
        match self {
            Self::Single(handler) => Self::Single(Arc::clone(handler)),
            Self::PerState(handlers) => Self::PerState(handlers.clone()),
        }
    }
}

impl<T, C> fmt::Debug for HandlerSpec<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(_) => f.write_str("Single"),
            Self::PerState(handlers) => {
                let mut states: Vec<_> = handlers.keys().collect();
                states.sort();
                f.debug_tuple("PerState").field(&states).finish()
            }
        }
    }
}

impl<T, C> From<StateHandler<T, C>> for HandlerSpec<T, C> {
    fn from(handler: StateHandler<T, C>) -> Self {
        Self::Single(handler)
    }
}

/// Builder for the per-state form of [`HandlerSpec`].
pub struct StateHandlers<T, C> {
    handlers: HashMap<String, StateHandler<T, C>>,
}

impl<T, C> StateHandlers<T, C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register an asynchronous handler for `state`.
    pub fn on<F>(self, state: impl Into<String>, f: F) -> Self
    where
        F: for<'a> Fn(T, &'a mut Machine, &'a C) -> BoxFuture<'a, HandlerResult<T>>
            + Send
            + Sync
            + 'static,
    {
        self.insert(state, handler(f))
    }

    /// Register a handler that completes without suspending.
    pub fn on_sync<F>(self, state: impl Into<String>, f: F) -> Self
    where
        T: Send + 'static,
        C: 'static,
        F: Fn(T, &mut Machine, &C) -> HandlerResult<T> + Send + Sync + 'static,
    {
        self.insert(state, sync_handler(f))
    }

    /// Register an already wrapped handler, replacing any previous one.
    pub fn insert(mut self, state: impl Into<String>, handler: StateHandler<T, C>) -> Self {
        self.handlers.insert(state.into(), handler);
        self
    }

    pub fn build(self) -> HandlerSpec<T, C> {
        HandlerSpec::PerState(self.handlers)
    }
}

impl<T, C> Default for StateHandlers<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> From<StateHandlers<T, C>> for HandlerSpec<T, C> {
    fn from(handlers: StateHandlers<T, C>) -> Self {
        handlers.build()
    }
}
