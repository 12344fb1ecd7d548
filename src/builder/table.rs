//! Builder for constructing state tables.

use crate::core::{StateTable, TransitionMap};
use std::collections::HashMap;

/// Builder for constructing state tables with a fluent API.
///
/// States are kept in declaration order. Declaring a state twice replaces its
/// transitions and keeps its original position. The built table is not
/// validated; [`StateTable::validate`] and
/// [`create_machine`](crate::core::create_machine) do that.
#[derive(Debug, Default)]
pub struct StateTableBuilder {
    order: Vec<String>,
    states: HashMap<String, TransitionMap>,
}

impl StateTableBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `state` with its `(transition, target)` pairs.
    pub fn state<I, K, V>(mut self, state: impl Into<String>, transitions: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let state = state.into();
        let transitions = transitions
            .into_iter()
            .map(|(transition, target)| (transition.into(), target.into()))
            .collect();

        if !self.states.contains_key(&state) {
            self.order.push(state.clone());
        }
        self.states.insert(state, transitions);
        self
    }

    /// Declare a state with no outgoing transitions.
    pub fn terminal(self, state: impl Into<String>) -> Self {
        self.state(state, Vec::<(String, String)>::new())
    }

    /// Build the table.
    pub fn build(self) -> StateTable {
        StateTable::from_parts(self.order, self.states)
    }
}
