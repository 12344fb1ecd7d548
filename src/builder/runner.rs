//! Builder for constructing transition runners.

use crate::builder::error::BuildError;
use crate::core::StateTable;
use crate::effects::{HandlerSpec, RunStrategy, RunnerConfig, TransitionRunner};
use std::sync::Arc;

/// Builder for constructing transition runners with a fluent API.
pub struct TransitionRunnerBuilder<T, C> {
    table: Option<Arc<StateTable>>,
    handler: Option<HandlerSpec<T, C>>,
    config: RunnerConfig,
}

impl<T, C> TransitionRunnerBuilder<T, C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            table: None,
            handler: None,
            config: RunnerConfig::default(),
        }
    }

    /// Set the state table (required).
    pub fn table(mut self, table: impl Into<Arc<StateTable>>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set the handler, either one for every state or a per-state map (required).
    pub fn handler(mut self, handler: impl Into<HandlerSpec<T, C>>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    pub fn strategy(mut self, strategy: RunStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// State used by runs started without one.
    pub fn default_initial_state(mut self, state: impl Into<String>) -> Self {
        self.config.default_initial_state = state.into();
        self
    }

    /// Record the moves of each run's machine.
    pub fn record_history(mut self, enabled: bool) -> Self {
        self.config.record_history = enabled;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the runner.
    ///
    /// A missing table is reported before a missing handler, and the table
    /// must pass validation.
    pub fn build(self) -> Result<TransitionRunner<T, C>, BuildError> {
        let table = self.table.ok_or(BuildError::MissingMachine)?;
        let handler = self.handler.ok_or(BuildError::MissingHandler)?;
        table.validate()?;

        Ok(TransitionRunner::from_parts(table, handler, self.config))
    }
}

impl<T, C> Default for TransitionRunnerBuilder<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MachineError;
    use crate::effects::sync_handler;

    fn terms_table() -> StateTable {
        StateTable::builder()
            .state(
                "initial",
                [("AGREE_TO_TERMS", "agreed"), ("REJECTED_TERMS", "rejected")],
            )
            .terminal("agreed")
            .terminal("rejected")
            .build()
    }

    fn passthrough() -> HandlerSpec<(), ()> {
        HandlerSpec::Single(sync_handler(|data, _, _| Ok(data)))
    }

    #[test]
    fn builder_requires_table() {
        let result = TransitionRunnerBuilder::<(), ()>::new().build();

        assert!(matches!(result, Err(BuildError::MissingMachine)));
    }

    #[test]
    fn missing_table_is_reported_before_missing_handler() {
        let result = TransitionRunnerBuilder::<(), ()>::new()
            .default_initial_state("agreed")
            .build();

        assert!(matches!(result, Err(BuildError::MissingMachine)));
    }

    #[test]
    fn builder_requires_handler() {
        let result = TransitionRunnerBuilder::<(), ()>::new()
            .table(terms_table())
            .build();

        assert!(matches!(result, Err(BuildError::MissingHandler)));
    }

    #[test]
    fn builder_rejects_invalid_table() {
        let table = StateTable::builder()
            .state("initial", [("AGREE_TO_TERMS", "agreed")])
            .build();

        let result = TransitionRunnerBuilder::new()
            .table(table)
            .handler(passthrough())
            .build();

        assert!(matches!(
            result,
            Err(BuildError::InvalidTable(
                MachineError::UnreachableTargetState { .. }
            ))
        ));
    }

    #[test]
    fn builder_applies_configuration() {
        let runner = TransitionRunnerBuilder::new()
            .table(terms_table())
            .handler(passthrough())
            .strategy(RunStrategy::Chained)
            .default_initial_state("agreed")
            .build()
            .unwrap();

        assert_eq!(runner.config().strategy, RunStrategy::Chained);
        assert_eq!(runner.config().default_initial_state, "agreed");
        assert_eq!(runner.table().len(), 3);
    }
}
