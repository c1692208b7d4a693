//! Unit tests for resolve, reject, race, all and all_settled

use super::*;
use core_types::{ErrorKind, PlainObject};
use future_runtime::FutureState;

fn settled(status: &str, key: &str, value: Value) -> Value {
    Value::object(
        PlainObject::new()
            .with("status", Value::from(status))
            .with(key, value),
    )
}

#[test]
fn resolve_returns_same_future_for_same_species() {
    let (_el, species) = runtime();
    let future = species.reject(Value::Smi(1));
    assert!(species.resolve(future.clone().into()).ptr_eq(&future));
}

#[test]
fn reject_does_not_unwrap_futures() {
    let (el, species) = runtime();
    let inner = species.resolve(Value::Smi(1));
    let rejected = species.reject(inner.clone().into());
    el.run_until_done().unwrap();
    assert_eq!(rejected.state(), FutureState::Rejected);
    assert_eq!(rejected.result(), Some(Value::from(inner)));
}

#[test]
fn all_preserves_positions() {
    let (el, species) = runtime();
    let all = species.all(&Value::array(vec![
        species.resolve(Value::Smi(42)).into(),
        resolves_after(&el, &species, Value::Smi(21), 100).into(),
    ]));
    el.run_until_done().unwrap();
    assert_eq!(all.result(), Some(Value::array(vec![Value::Smi(42), Value::Smi(21)])));
}

#[test]
fn all_orders_by_input_not_completion() {
    let (el, species) = runtime();
    let all = species.all(&Value::array(vec![
        resolves_after(&el, &species, Value::from("slow"), 50).into(),
        resolves_after(&el, &species, Value::from("fast"), 5).into(),
    ]));
    el.run_until_done().unwrap();
    assert_eq!(
        all.result(),
        Some(Value::array(vec![Value::from("slow"), Value::from("fast")]))
    );
}

#[test]
fn all_rejects_with_earliest_failure() {
    let (el, species) = runtime();
    let all = species.all(&Value::array(vec![
        rejects_after(&el, &species, Value::from("late"), 100).into(),
        rejects_after(&el, &species, Value::from("early"), 10).into(),
        species.resolve(Value::Smi(1)).into(),
    ]));
    el.run_until_done().unwrap();
    assert_eq!(all.state(), FutureState::Rejected);
    assert_eq!(all.result(), Some(Value::from("early")));
}

#[test]
fn all_empty_fulfills_in_same_turn() {
    let (_el, species) = runtime();
    let input = Value::array(vec![]);
    let all = species.all(&input);
    assert_eq!(all.state(), FutureState::Fulfilled);
    assert!(same_array(all.result(), &input));
}

#[test]
fn all_settled_empty_fulfills_in_same_turn() {
    let (_el, species) = runtime();
    let input = Value::array(vec![]);
    let settled = species.all_settled(&input);
    assert_eq!(settled.state(), FutureState::Fulfilled);
    assert!(same_array(settled.result(), &input));
}

fn same_array(result: Option<Value>, input: &Value) -> bool {
    match (result, input) {
        (Some(Value::Array(a)), Value::Array(b)) => Rc::ptr_eq(&a, b),
        _ => false,
    }
}

#[test]
fn race_takes_earliest_settlement_of_any_kind() {
    let (el, species) = runtime();
    let race = species.race(&Value::array(vec![
        rejects_after(&el, &species, Value::Smi(21), 100).into(),
        resolves_after(&el, &species, Value::Smi(15), 10).into(),
    ]));
    el.run_until_done().unwrap();
    assert_eq!(race.state(), FutureState::Fulfilled);
    assert_eq!(race.result(), Some(Value::Smi(15)));
}

#[test]
fn race_rejection_can_win() {
    let (el, species) = runtime();
    let race = species.race(&Value::array(vec![
        resolves_after(&el, &species, Value::Smi(1), 50).into(),
        rejects_after(&el, &species, Value::from("fail"), 5).into(),
    ]));
    el.run_until_done().unwrap();
    assert_eq!(race.state(), FutureState::Rejected);
    assert_eq!(race.result(), Some(Value::from("fail")));
}

#[test]
fn race_ties_go_to_submission_order() {
    let (el, species) = runtime();
    let race = species.race(&Value::array(vec![
        resolves_after(&el, &species, Value::Smi(21), 100).into(),
        species.resolve(Value::Smi(42)).into(),
        species.resolve(Value::Smi(43)).into(),
    ]));
    el.run_until_done().unwrap();
    assert_eq!(race.result(), Some(Value::Smi(42)));
}

#[test]
fn race_empty_never_settles() {
    let (el, species) = runtime();
    let race = species.race(&Value::array(vec![]));
    el.run_until_done().unwrap();
    assert!(race.is_pending());
}

#[test]
fn all_settled_reports_each_outcome_in_position() {
    let (el, species) = runtime();
    let settled_all = species.all_settled(&Value::array(vec![
        rejects_after(&el, &species, Value::Smi(21), 100).into(),
        resolves_after(&el, &species, Value::Smi(15), 10).into(),
    ]));
    el.run_until_done().unwrap();
    assert_eq!(settled_all.state(), FutureState::Fulfilled);
    assert_eq!(
        settled_all.result(),
        Some(Value::array(vec![
            settled("rejected", "reason", Value::Smi(21)),
            settled("fulfilled", "value", Value::Smi(15)),
        ]))
    );
}

#[test]
fn combinators_assimilate_thenables_in_input() {
    let (el, species) = runtime();
    let thenable = Value::object(PlainObject::new().with(
        "then",
        Value::from(Function::new(|_this, args| {
            args[0].as_function().unwrap().call(&Value::Undefined, &[Value::Smi(5)])
        })),
    ));
    let all = species.all(&Value::array(vec![thenable, Value::Smi(6)]));
    el.run_until_done().unwrap();
    assert_eq!(all.result(), Some(Value::array(vec![Value::Smi(5), Value::Smi(6)])));
}

#[test]
fn combinators_reject_non_sequences() {
    let (_el, species) = runtime();
    let future = species.all(&Value::Smi(5));
    assert_eq!(future.state(), FutureState::Rejected);
    match future.result() {
        Some(Value::Error(error)) => {
            assert_eq!(error.kind, ErrorKind::TypeError);
            assert_eq!(error.message, "5 is not iterable");
        }
        other => panic!("expected a TypeError, got {:?}", other),
    }
}

#[test]
fn combinator_results_keep_derived_species() {
    let (el, species) = runtime();
    let other = species.derive("Other");
    let all = other.all(&Value::array(vec![species.resolve(Value::Smi(1)).into()]));
    assert!(all.species().ptr_eq(&other));
    el.run_until_done().unwrap();
    assert_eq!(all.result(), Some(Value::array(vec![Value::Smi(1)])));
}
