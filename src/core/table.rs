//! Ordered, immutable state-transition tables.

use super::error::MachineError;
use super::resolve::resolve_next;
use super::validate;
use crate::builder::StateTableBuilder;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Transitions registered under one state: transition name -> target state.
pub type TransitionMap = HashMap<String, String>;

/// A declarative state-transition table.
///
/// States keep the order in which they were declared; the first declared
/// state is the default starting point of a machine. A table is never mutated
/// after construction and is shared read-only (usually behind an `Arc`) by
/// every machine and run built from it.
///
/// # Example
///
/// ```rust
/// use stepwise::core::StateTable;
///
/// let table = StateTable::builder()
///     .state("initial", [("AGREE_TO_TERMS", "agreed"), ("REJECTED_TERMS", "rejected")])
///     .state("agreed", Vec::<(&str, &str)>::new())
///     .state("rejected", Vec::<(&str, &str)>::new())
///     .build();
///
/// assert!(table.validate().is_ok());
/// assert_eq!(table.first_state(), Some("initial"));
/// assert_eq!(table.next_state("initial", Some("AGREE_TO_TERMS")), "agreed");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct StateTable {
    order: Vec<String>,
    states: HashMap<String, TransitionMap>,
}

impl StateTable {
    /// Start building a table programmatically.
    pub fn builder() -> StateTableBuilder {
        StateTableBuilder::new()
    }

    pub(crate) fn from_parts(order: Vec<String>, states: HashMap<String, TransitionMap>) -> Self {
        Self { order, states }
    }

    /// Build a table from a JSON object of objects.
    ///
    /// Only the shape is checked here (`InvalidTableKind`); dangling targets
    /// are reported by [`StateTable::validate`]. Targets that are not strings
    /// can never name a state and are rejected as unreachable.
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde_json::json;
    /// use stepwise::core::StateTable;
    ///
    /// let table = StateTable::from_value(&json!({
    ///     "initial": { "START": "running" },
    ///     "running": {}
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(table.states().collect::<Vec<_>>(), vec!["initial", "running"]);
    /// ```
    pub fn from_value(value: &Value) -> Result<Self, MachineError> {
        let states = value
            .as_object()
            .ok_or(MachineError::InvalidTableKind { state: None })?;

        let mut order = Vec::with_capacity(states.len());
        let mut table = HashMap::with_capacity(states.len());

        for (state, transitions) in states {
            if state.is_empty() {
                return Err(MachineError::InvalidTableKind {
                    state: Some(String::new()),
                });
            }

            let transitions =
                transitions
                    .as_object()
                    .ok_or_else(|| MachineError::InvalidTableKind {
                        state: Some(state.clone()),
                    })?;

            let mut map = TransitionMap::with_capacity(transitions.len());
            for (transition, target) in transitions {
                let target = target.as_str().ok_or_else(|| {
                    MachineError::UnreachableTargetState {
                        state: state.clone(),
                        transition: transition.clone(),
                        target: target.to_string(),
                    }
                })?;
                map.insert(transition.clone(), target.to_string());
            }

            order.push(state.clone());
            table.insert(state.clone(), map);
        }

        Ok(Self {
            order,
            states: table,
        })
    }

    /// Check that every registered transition leads to a declared state.
    pub fn validate(&self) -> Result<(), MachineError> {
        validate::first_violation(self.diagnose())
    }

    /// Collect every violation instead of stopping at the first: empty state
    /// names, then dangling transitions.
    pub fn diagnose(&self) -> Validation<(), NonEmptyVec<MachineError>> {
        let names = self.states().map(|state| {
            if state.is_empty() {
                Validation::fail(MachineError::InvalidTableKind {
                    state: Some(String::new()),
                })
            } else {
                Validation::success(())
            }
        });
        let edges = self
            .iter()
            .flat_map(|(state, transitions)| {
                let mut edges: Vec<_> = transitions.iter().collect();
                edges.sort();
                edges.into_iter().map(move |(transition, target)| {
                    validate::check_target(|name| self.contains(name), state, transition, target)
                })
            });
        let checks: Vec<_> = names.chain(edges).collect();

        Validation::all_vec(checks).map(|_| ())
    }

    /// The state reached from `current` through `transition`; see [`resolve_next`].
    pub fn next_state<'a>(&'a self, current: &'a str, transition: Option<&str>) -> &'a str {
        resolve_next(current, transition, Some(self))
    }

    /// Whether `state` is declared in this table.
    pub fn contains(&self, state: &str) -> bool {
        self.states.contains_key(state)
    }

    /// Transitions registered under `state`, if it is declared.
    pub fn transitions(&self, state: &str) -> Option<&TransitionMap> {
        self.states.get(state)
    }

    /// The first declared state.
    pub fn first_state(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    /// State names in declaration order.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(state, transitions)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TransitionMap)> {
        self.order
            .iter()
            .filter_map(|state| self.states.get_key_value(state))
            .map(|(state, transitions)| (state.as_str(), transitions))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl TryFrom<Value> for StateTable {
    type Error = MachineError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

impl Serialize for StateTable {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (state, transitions) in self.iter() {
            map.serialize_entry(state, transitions)?;
        }
        map.end()
    }
}
