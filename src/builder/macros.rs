//! Macros for ergonomic state table construction.

/// Build a [`StateTable`](crate::core::StateTable) from literal declarations.
///
/// States keep the order they are written in. The table is not validated.
///
/// # Example
///
/// ```
/// use stepwise::state_table;
///
/// let table = state_table! {
///     "initial" => { "AGREE_TO_TERMS" => "agreed", "REJECTED_TERMS" => "rejected" },
///     "agreed" => {},
///     "rejected" => {},
/// };
///
/// assert!(table.validate().is_ok());
/// assert_eq!(table.first_state(), Some("initial"));
/// ```
#[macro_export]
macro_rules! state_table {
    (
        $(
            $state:expr => {
                $($transition:expr => $target:expr),* $(,)?
            }
        ),* $(,)?
    ) => {{
        let builder = $crate::core::StateTable::builder();
        $(
            let transitions: ::std::vec::Vec<(&str, &str)> = ::std::vec![
                $(($transition, $target)),*
            ];
            let builder = builder.state($state, transitions);
        )*
        builder.build()
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn state_table_macro_builds_in_order() {
        let table = state_table! {
            "loggedOut" => { "ATTEMPT_LOGIN" => "inProgress" },
            "inProgress" => {
                "LOGIN_SUCCESSFUL" => "loggedIn",
                "LOGIN_ERROR" => "loggedOut",
            },
            "loggedIn" => {},
        };

        assert_eq!(
            table.states().collect::<Vec<_>>(),
            vec!["loggedOut", "inProgress", "loggedIn"]
        );
        assert_eq!(
            table.next_state("inProgress", Some("LOGIN_SUCCESSFUL")),
            "loggedIn"
        );
        assert!(table.validate().is_ok());
    }

    #[test]
    fn state_table_macro_allows_dangling_targets() {
        // Validation is left to the caller.
        let table = state_table! {
            "initial" => { "GO" => "nowhere" },
        };

        assert_eq!(table.len(), 1);
        assert!(table.validate().is_err());
    }

    #[test]
    fn empty_macro_builds_empty_table() {
        let table = state_table! {};

        assert!(table.is_empty());
    }
}
