//! Pure next-state resolution.

use super::table::StateTable;

/// Compute the state reached from `current` through `transition`.
///
/// Total over its inputs: an unknown current state, a missing or empty
/// table, an absent transition, or a transition not registered under
/// `current` all leave the state unchanged.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use stepwise::core::{resolve_next, StateTable};
///
/// let terms = StateTable::from_value(&json!({
///     "initial": { "AGREE_TO_TERMS": "agreed", "REJECTED_TERMS": "rejected" },
///     "agreed": {},
///     "rejected": {}
/// }))
/// .unwrap();
///
/// assert_eq!(resolve_next("initial", Some("AGREE_TO_TERMS"), Some(&terms)), "agreed");
/// assert_eq!(resolve_next("agreed", Some("REJECTED_TERMS"), Some(&terms)), "agreed");
/// assert_eq!(resolve_next("unknown", Some("AGREE_TO_TERMS"), Some(&terms)), "unknown");
/// assert_eq!(resolve_next("initial", None, None), "initial");
/// ```
pub fn resolve_next<'a>(
    current: &'a str,
    transition: Option<&str>,
    table: Option<&'a StateTable>,
) -> &'a str {
    table
        .and_then(|table| table.transitions(current))
        .zip(transition)
        .and_then(|(transitions, transition)| transitions.get(transition))
        .map_or(current, String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_table() -> StateTable {
        StateTable::builder()
            .state("initial", [("ATTEMPT_LOGIN", "inProgress")])
            .state(
                "inProgress",
                [
                    ("LOGIN_ERROR", "error"),
                    ("LOGOUT_ERROR", "error"),
                    ("LOGIN_SUCCESSFUL", "loggedIn"),
                    ("LOGOUT_SUCCESSFUL", "loggedOut"),
                ],
            )
            .state("loggedIn", [("ATTEMPT_LOGOUT", "inProgress")])
            .state("loggedOut", [("ATTEMPT_LOGIN", "inProgress")])
            .state(
                "error",
                [("ATTEMPT_LOGIN", "inProgress"), ("CLEAR_ERROR", "loggedOut")],
            )
            .build()
    }

    #[test]
    fn registered_transition_moves() {
        let table = auth_table();
        assert_eq!(
            resolve_next("initial", Some("ATTEMPT_LOGIN"), Some(&table)),
            "inProgress"
        );
        assert_eq!(
            resolve_next("error", Some("CLEAR_ERROR"), Some(&table)),
            "loggedOut"
        );
    }

    #[test]
    fn unregistered_transition_is_noop() {
        let table = auth_table();
        assert_eq!(
            resolve_next("initial", Some("LOGOUT_SUCCESSFUL"), Some(&table)),
            "initial"
        );
        assert_eq!(
            resolve_next("loggedOut", Some("LOGIN_SUCCESSFUL"), Some(&table)),
            "loggedOut"
        );
    }

    #[test]
    fn unknown_state_is_terminal() {
        let table = auth_table();
        assert_eq!(
            resolve_next("limbo", Some("ATTEMPT_LOGIN"), Some(&table)),
            "limbo"
        );
    }

    #[test]
    fn missing_or_empty_table_is_noop() {
        let empty = StateTable::default();
        assert_eq!(resolve_next("initial", Some("GO"), None), "initial");
        assert_eq!(resolve_next("initial", Some("GO"), Some(&empty)), "initial");
    }

    #[test]
    fn absent_transition_is_a_read() {
        let table = auth_table();
        assert_eq!(resolve_next("inProgress", None, Some(&table)), "inProgress");
    }
}
