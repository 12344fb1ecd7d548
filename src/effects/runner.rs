//! The run-to-fixed-point transition runner.

use crate::builder::{BuildError, TransitionRunnerBuilder};
use crate::core::{create_machine, Machine, StateTable};
use crate::effects::error::{HandlerFailure, TransitionError};
use crate::effects::handler::HandlerSpec;
use futures_util::future::{self, BoxFuture, FutureExt};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, debug_span, trace, Instrument};
use uuid::Uuid;

/// State a run starts from when the caller does not name one.
pub const DEFAULT_INITIAL_STATE: &str = "initial";

/// How the run loop sequences handler invocations.
///
/// Both strategies invoke each entered state's handler exactly once, always
/// run the initial state's handler, and normalize failures identically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunStrategy {
    /// Await each handler in a loop.
    #[default]
    Sequential,
    /// Chain each handler's outcome into a boxed continuation for the next step.
    Chained,
}

/// Runner configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunnerConfig {
    pub strategy: RunStrategy,
    /// Used when a run is started without an initial state (or with an empty one).
    pub default_initial_state: String,
    /// Give each run's machine a move history.
    pub record_history: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            strategy: RunStrategy::default(),
            default_initial_state: DEFAULT_INITIAL_STATE.to_string(),
            record_history: false,
        }
    }
}

/// Continuation handed from one link of a chained run to the next.
enum Link<T> {
    Next {
        machine: Machine,
        last_seen: Option<String>,
        result: T,
    },
    Done(T),
}

/// Drives a machine with state handlers until the state stops changing.
///
/// Each call to [`TransitionRunner::run`] builds its own [`Machine`], so one
/// runner can serve any number of concurrent runs over the same table.
///
/// # Example
///
/// ```rust
/// use futures_util::FutureExt;
/// use serde_json::json;
/// use stepwise::core::StateTable;
/// use stepwise::effects::{HandlerSpec, TransitionRunner};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let table = StateTable::from_value(&json!({
///     "initial": { "ATTEMPT_LOGIN": "inProgress" },
///     "inProgress": { "LOGIN_SUCCESSFUL": "loggedIn" },
///     "loggedIn": {}
/// }))
/// .unwrap();
///
/// let handlers = HandlerSpec::per_state()
///     .on_sync("initial", |log: Vec<&'static str>, machine, _: &()| {
///         machine.transition("ATTEMPT_LOGIN");
///         Ok([log, vec!["initial"]].concat())
///     })
///     .on("inProgress", |log, machine, _| {
///         async move {
///             machine.transition("LOGIN_SUCCESSFUL");
///             Ok([log, vec!["inProgress"]].concat())
///         }
///         .boxed()
///     })
///     .on_sync("loggedIn", |log, _, _| Ok([log, vec!["loggedIn"]].concat()));
///
/// let runner = TransitionRunner::builder()
///     .table(table)
///     .handler(handlers)
///     .build()
///     .unwrap();
///
/// let log = runner.run(Vec::new(), None, &()).await.unwrap();
/// assert_eq!(log, vec!["initial", "inProgress", "loggedIn"]);
/// # }
/// ```
pub struct TransitionRunner<T, C> {
    table: Arc<StateTable>,
    handlers: HandlerSpec<T, C>,
    config: RunnerConfig,
}

/// Build a runner from optional parts, checking the table before the handler.
pub fn create_transition_runner<T, C>(
    handler: Option<HandlerSpec<T, C>>,
    table: Option<Arc<StateTable>>,
) -> Result<TransitionRunner<T, C>, BuildError> {
    let mut builder = TransitionRunnerBuilder::new();
    if let Some(table) = table {
        builder = builder.table(table);
    }
    if let Some(handler) = handler {
        builder = builder.handler(handler);
    }
    builder.build()
}

impl<T, C> TransitionRunner<T, C> {
    /// Start building a runner.
    pub fn builder() -> TransitionRunnerBuilder<T, C> {
        TransitionRunnerBuilder::new()
    }

    pub(crate) fn from_parts(
        table: Arc<StateTable>,
        handlers: HandlerSpec<T, C>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            table,
            handlers,
            config,
        }
    }

    pub fn table(&self) -> &Arc<StateTable> {
        &self.table
    }

    pub fn handlers(&self) -> &HandlerSpec<T, C> {
        &self.handlers
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }
}

impl<T, C> TransitionRunner<T, C>
where
    T: Send + 'static,
    C: Sync,
{
    /// Run handlers from `initial_state` until the machine reaches a fixed point.
    ///
    /// The handler of the starting state always runs. After each handler the
    /// machine is polled; when it reports the state the handler was invoked
    /// for, the run ends with that handler's value. A handler that moves the
    /// machine away and back again is indistinguishable from one that did not
    /// move it. Runs are unbounded: handlers that never settle never finish.
    ///
    /// Every failure is returned as a [`TransitionError`] carrying the state
    /// the machine reported when it surfaced.
    pub async fn run(
        &self,
        initial_data: T,
        initial_state: Option<&str>,
        context: &C,
    ) -> Result<T, TransitionError> {
        let run_id = Uuid::new_v4();
        let span = debug_span!("transition_run", %run_id, strategy = ?self.config.strategy);

        match self.config.strategy {
            RunStrategy::Sequential => {
                self.run_sequential(initial_data, initial_state, context)
                    .instrument(span)
                    .await
            }
            RunStrategy::Chained => {
                self.run_chained(initial_data, initial_state, context)
                    .instrument(span)
                    .await
            }
        }
    }

    async fn run_sequential(
        &self,
        initial_data: T,
        initial_state: Option<&str>,
        context: &C,
    ) -> Result<T, TransitionError> {
        let mut machine = self.start(initial_state)?;
        let mut last_seen: Option<String> = None;
        let mut result = initial_data;

        while last_seen.as_deref() != Some(machine.current()) {
            let current = machine.current().to_string();
            result = self.enter(&current, result, &mut machine, context).await?;
            last_seen = Some(current);
        }

        debug!(state = %machine.current(), "run reached a fixed point");
        Ok(result)
    }

    async fn run_chained(
        &self,
        initial_data: T,
        initial_state: Option<&str>,
        context: &C,
    ) -> Result<T, TransitionError> {
        let mut link = Link::Next {
            machine: self.start(initial_state)?,
            last_seen: None,
            result: initial_data,
        };

        // Each link is awaited on its own, so the chain never nests.
        loop {
            link = match link {
                Link::Next {
                    machine,
                    last_seen,
                    result,
                } => self.advance(machine, last_seen, result, context).await?,
                Link::Done(result) => return Ok(result),
            };
        }
    }

    /// One link of the chained strategy: invoke the handler for the current
    /// state and return the continuation for the next link.
    fn advance<'r>(
        &'r self,
        mut machine: Machine,
        last_seen: Option<String>,
        result: T,
        context: &'r C,
    ) -> BoxFuture<'r, Result<Link<T>, TransitionError>> {
        let current = machine.current().to_string();
        if last_seen.as_deref() == Some(current.as_str()) {
            debug!(state = %current, "run reached a fixed point");
            return future::ready(Ok(Link::Done(result))).boxed();
        }

        async move {
            let next = self.enter(&current, result, &mut machine, context).await?;
            Ok(Link::Next {
                machine,
                last_seen: Some(current),
                result: next,
            })
        }
        .boxed()
    }

    fn start(&self, initial_state: Option<&str>) -> Result<Machine, TransitionError> {
        let initial = initial_state
            .filter(|state| !state.is_empty())
            .unwrap_or(&self.config.default_initial_state);

        let machine = create_machine(Arc::clone(&self.table), Some(initial))
            .map_err(|error| fail(HandlerFailure::from(error), initial))?;

        Ok(if self.config.record_history {
            machine.with_history()
        } else {
            machine
        })
    }

    /// Invoke the handler registered for `state`, catching panics.
    async fn enter(
        &self,
        state: &str,
        data: T,
        machine: &mut Machine,
        context: &C,
    ) -> Result<T, TransitionError> {
        trace!(state, "entering state");

        let handler = self
            .handlers
            .resolve(state)
            .map_err(|error| fail(HandlerFailure::from(error), machine.current()))?;

        // Synchronous handlers do their work while the future is built.
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| {
            handler(data, &mut *machine, context)
        })) {
            Ok(pending) => AssertUnwindSafe(pending).catch_unwind().await,
            Err(payload) => Err(payload),
        };

        match outcome {
            Ok(Ok(next)) => Ok(next),
            Ok(Err(failure)) => Err(fail(failure, machine.current())),
            Err(panic) => Err(fail(HandlerFailure::from_panic(panic), machine.current())),
        }
    }
}

fn fail(failure: HandlerFailure, state: &str) -> TransitionError {
    debug!(state, error = %failure, "run failed");
    TransitionError::new(failure, state)
}
