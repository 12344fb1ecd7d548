//! Structural validation of state tables.
//!
//! A table is well formed when it is a mapping of non-empty state names to
//! transition maps
//! and every transition leads to a state of the same table. Violations can be
//! reported fail-fast ([`validate_table`]) or accumulated ([`diagnose_table`]),
//! following Stillwater's "collect them all" validation style.

use super::error::MachineError;
use serde_json::Value;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Validation outcome carrying every violation found.
pub type TableValidation = Validation<(), NonEmptyVec<MachineError>>;

/// Check a raw table, returning the first violation.
///
/// Shape violations (`InvalidTableKind`) take precedence over dangling
/// transitions (`UnreachableTargetState`).
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use stepwise::core::{validate_table, MachineError};
///
/// let closed = json!({ "initial": { "GO": "done" }, "done": {} });
/// assert!(validate_table(&closed).is_ok());
///
/// let dangling = json!({ "initial": { "GO": "nowhere" } });
/// assert!(matches!(
///     validate_table(&dangling),
///     Err(MachineError::UnreachableTargetState { .. })
/// ));
///
/// assert_eq!(
///     validate_table(&json!([])),
///     Err(MachineError::InvalidTableKind { state: None })
/// );
/// ```
pub fn validate_table(table: &Value) -> Result<(), MachineError> {
    first_violation(diagnose_table(table))
}

/// Check a raw table, accumulating every violation.
///
/// Shape violations come first, in declaration order, followed by dangling
/// transitions.
pub fn diagnose_table(table: &Value) -> TableValidation {
    let Some(states) = table.as_object() else {
        return Validation::fail(MachineError::InvalidTableKind { state: None });
    };

    let mut checks = Vec::new();

    for (state, transitions) in states {
        checks.push(if !state.is_empty() && transitions.is_object() {
            Validation::success(())
        } else {
            Validation::fail(MachineError::InvalidTableKind {
                state: Some(state.clone()),
            })
        });
    }

    for (state, transitions) in states {
        let Some(transitions) = transitions.as_object() else {
            continue;
        };
        for (transition, target) in transitions {
            checks.push(match target.as_str() {
                Some(target) => {
                    check_target(|name| states.contains_key(name), state, transition, target)
                }
                None => Validation::fail(MachineError::UnreachableTargetState {
                    state: state.clone(),
                    transition: transition.clone(),
                    target: target.to_string(),
                }),
            });
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Fail when `target` is not a declared state.
pub(crate) fn check_target(
    is_state: impl Fn(&str) -> bool,
    state: &str,
    transition: &str,
    target: &str,
) -> TableValidation {
    if is_state(target) {
        Validation::success(())
    } else {
        Validation::fail(MachineError::UnreachableTargetState {
            state: state.to_string(),
            transition: transition.to_string(),
            target: target.to_string(),
        })
    }
}

/// Collapse an accumulated validation into its first violation.
pub(crate) fn first_violation(validation: TableValidation) -> Result<(), MachineError> {
    match validation {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => errors.iter().next().cloned().map_or(Ok(()), Err),
    }
}
