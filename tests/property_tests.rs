//! Property-based tests for tables, machines and runs.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated tables and transition sequences.

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use stepwise::core::{create_machine, resolve_next, validate_table, MachineError, StateTable};
use stepwise::effects::{sync_handler, HandlerSpec, RunStrategy, TransitionRunner};

const STATES: [&str; 5] = ["initial", "inProgress", "loggedIn", "loggedOut", "error"];
const TRANSITIONS: [&str; 4] = [
    "ATTEMPT_LOGIN",
    "LOGIN_SUCCESSFUL",
    "LOGIN_ERROR",
    "ATTEMPT_LOGOUT",
];

prop_compose! {
    // A closed table over a prefix of `STATES`: every target is declared.
    fn arbitrary_table()(size in 1..=STATES.len())(
        edges in prop::collection::vec(
            prop::collection::vec((0..TRANSITIONS.len(), 0..size), 0..TRANSITIONS.len()),
            size,
        ),
    ) -> Value {
        let mut table = Map::new();
        for (state, edges) in STATES.iter().zip(edges) {
            let transitions: Map<String, Value> = edges
                .into_iter()
                .map(|(transition, target)| {
                    (TRANSITIONS[transition].to_string(), json!(STATES[target]))
                })
                .collect();
            table.insert(state.to_string(), Value::Object(transitions));
        }
        Value::Object(table)
    }
}

fn arbitrary_steps() -> impl Strategy<Value = Vec<Option<usize>>> {
    prop::collection::vec(prop::option::of(0..TRANSITIONS.len()), 0..16)
}

proptest! {
    #[test]
    fn closed_tables_validate(value in arbitrary_table()) {
        prop_assert!(validate_table(&value).is_ok());
        prop_assert!(StateTable::from_value(&value).unwrap().validate().is_ok());
    }

    #[test]
    fn first_declared_state_is_the_default(value in arbitrary_table()) {
        let table = StateTable::from_value(&value).unwrap();
        let machine = create_machine(table, None).unwrap();

        prop_assert_eq!(machine.current(), "initial");
    }

    #[test]
    fn undeclared_initial_state_is_rejected(value in arbitrary_table(), name in "[a-z]{1,8}") {
        let table = StateTable::from_value(&value).unwrap();
        prop_assume!(!table.contains(&name));

        let result = create_machine(table, Some(&name));

        prop_assert_eq!(
            result.err(),
            Some(MachineError::InvalidInitialState { state: Some(name.clone()) })
        );
    }

    #[test]
    fn dangling_target_is_rejected(value in arbitrary_table(), transition in "[A-Z_]{1,12}") {
        let mut value = value;
        value["initial"][transition.as_str()] = json!("nowhere");

        let rejected = matches!(
            validate_table(&value),
            Err(MachineError::UnreachableTargetState { ref target, .. }) if target == "nowhere"
        );
        prop_assert!(rejected);
    }

    #[test]
    fn reading_never_moves_the_machine(value in arbitrary_table(), steps in arbitrary_steps()) {
        let table = StateTable::from_value(&value).unwrap();
        let mut machine = create_machine(table, None).unwrap();

        for step in steps {
            machine.step(step.map(|index| TRANSITIONS[index]));
            let before = machine.current().to_string();

            prop_assert_eq!(machine.step(None), before.as_str());
            prop_assert_eq!(machine.step(None), before.as_str());
        }
    }

    #[test]
    fn machine_follows_resolve_next(value in arbitrary_table(), steps in arbitrary_steps()) {
        let table = StateTable::from_value(&value).unwrap();
        let mut machine = create_machine(table.clone(), None).unwrap();

        for step in steps {
            let transition = step.map(|index| TRANSITIONS[index]);
            let expected = resolve_next(machine.current(), transition, Some(&table)).to_string();

            prop_assert_eq!(machine.step(transition), expected.as_str());
        }
    }

    #[test]
    fn states_stay_inside_the_table(value in arbitrary_table(), steps in arbitrary_steps()) {
        let table = StateTable::from_value(&value).unwrap();
        let mut machine = create_machine(table.clone(), None).unwrap();

        for step in steps {
            let state = machine.step(step.map(|index| TRANSITIONS[index])).to_string();
            prop_assert!(table.contains(&state));
        }
    }

    #[test]
    fn history_records_only_moves(value in arbitrary_table(), steps in arbitrary_steps()) {
        let table = StateTable::from_value(&value).unwrap();
        let mut machine = create_machine(table, None).unwrap().with_history();

        for step in steps {
            machine.step(step.map(|index| TRANSITIONS[index]));
        }

        let history = machine.history().unwrap();
        for record in history.transitions() {
            prop_assert_ne!(&record.from, &record.to);
        }
        if let Some(last) = history.transitions().last() {
            prop_assert_eq!(last.to.as_str(), machine.current());
        }
    }

    #[test]
    fn table_survives_serialization(value in arbitrary_table()) {
        let table = StateTable::from_value(&value).unwrap();

        let encoded = serde_json::to_value(&table).unwrap();
        let decoded: StateTable = serde_json::from_value(encoded.clone()).unwrap();

        prop_assert_eq!(encoded, value);
        prop_assert_eq!(decoded, table);
    }

    #[test]
    fn strategies_agree(value in arbitrary_table(), script in arbitrary_steps()) {
        let table = StateTable::from_value(&value).unwrap();

        // Each handler consumes one scripted transition; the run stops at the
        // first handler that leaves the machine where it found it.
        let handlers = HandlerSpec::Single(sync_handler(
            |(mut visited, mut script): (Vec<String>, Vec<Option<usize>>), machine, _: &()| {
                visited.push(machine.current().to_string());
                if let Some(Some(index)) = script.pop() {
                    machine.transition(TRANSITIONS[index]);
                }
                Ok((visited, script))
            },
        ));

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let outcomes: Vec<_> = [RunStrategy::Sequential, RunStrategy::Chained]
            .into_iter()
            .map(|strategy| {
                let runner = TransitionRunner::builder()
                    .table(table.clone())
                    .handler(handlers.clone())
                    .strategy(strategy)
                    .build()
                    .unwrap();
                runtime.block_on(runner.run((Vec::new(), script.clone()), None, &()))
            })
            .collect();

        prop_assert_eq!(&outcomes[0], &outcomes[1]);
        let (visited, _) = outcomes[0].clone().unwrap();
        prop_assert_eq!(visited.first().map(String::as_str), Some("initial"));
    }
}
