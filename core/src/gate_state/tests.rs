use crate::call_site::CallSite;
use crate::completion_args::CompletionArgs;
use crate::config::GateConfig;
use crate::gate_error::OperationError;
use crate::gate_state::GateState;
use crate::mapping::Mapping;
use crate::notifier::{GateOutcome, NotifierFn};
use crate::slot::{SlotKey, SlotValue};
use serde_json::json;
use std::sync::{Arc, Mutex};

const HERE: CallSite = CallSite::new("gate_state/tests.rs", 1, 1);

fn recording_notifier() -> (NotifierFn, Arc<Mutex<Vec<GateOutcome>>>) {
  let calls = Arc::new(Mutex::new(Vec::new()));
  let cloned_calls = calls.clone();
  let notifier = NotifierFn::new(move |outcome| cloned_calls.lock().unwrap().push(outcome));
  (notifier, calls)
}

fn complete_ok(state: &mut GateState, index: usize, value: &str) -> Option<crate::notifier::Dispatch> {
  state.complete_slot(
    SlotKey::Index(index),
    HERE,
    &Mapping::position(1),
    false,
    CompletionArgs::ok(vec![json!(value)]),
  )
}

#[test]
fn test_dynamic_state_is_satisfied_when_nothing_is_pending() {
  let mut state = GateState::new(&GateConfig::default());
  assert!(state.is_satisfied());
  assert_eq!(state.create_pending_slot(), Some(0));
  assert_eq!(state.create_pending_slot(), Some(1));
  assert_eq!(state.pending(), 2);
  assert!(!state.is_satisfied());
  assert_eq!(state.remaining(), None);
}

#[test]
fn test_fixed_count_hands_out_inert_slots_past_the_count() {
  let mut state = GateState::new(&GateConfig {
    expected_count: Some(2),
    ..GateConfig::default()
  });
  assert_eq!(state.create_pending_slot(), Some(0));
  assert_eq!(state.remaining(), Some(1));
  assert_eq!(state.create_pending_slot(), Some(1));
  assert_eq!(state.remaining(), Some(0));
  assert_eq!(state.create_pending_slot(), None);
  assert_eq!(state.pending(), 2);
  assert_eq!(state.remaining(), Some(0));
}

#[test]
fn test_fixed_count_waits_for_every_latch_to_be_created() {
  let mut state = GateState::new(&GateConfig {
    expected_count: Some(2),
    ..GateConfig::default()
  });
  let (notifier, calls) = recording_notifier();
  assert!(state.register_notifier(notifier).unwrap().is_none());

  let index = state.create_pending_slot().unwrap();
  assert!(complete_ok(&mut state, index, "a").is_none());
  assert!(!state.is_satisfied());

  let index = state.create_pending_slot().unwrap();
  let dispatch = complete_ok(&mut state, index, "b").expect("dispatch");
  dispatch.fire();

  let calls = calls.lock().unwrap();
  assert_eq!(calls.len(), 1);
  let results = calls[0].as_ref().unwrap();
  assert_eq!(results.to_vec(), vec![SlotValue::from("a"), SlotValue::from("b")]);
}

#[test]
fn test_register_after_completion_fires_immediately() {
  let mut state = GateState::new(&GateConfig::default());
  let index = state.create_pending_slot().unwrap();
  assert!(complete_ok(&mut state, index, "a").is_none());

  let (notifier, calls) = recording_notifier();
  let dispatch = state.register_notifier(notifier).unwrap().expect("dispatch");
  assert!(dispatch.outcome().is_ok());
  dispatch.fire();
  assert_eq!(calls.lock().unwrap().len(), 1);
  assert!(state.is_finalized());
}

#[test]
fn test_second_registration_is_ignored() {
  let mut state = GateState::new(&GateConfig::default());
  let _ = state.create_pending_slot().unwrap();
  let (first, first_calls) = recording_notifier();
  let (second, second_calls) = recording_notifier();
  assert!(state.register_notifier(first).unwrap().is_none());
  assert!(state.register_notifier(second).is_err());

  complete_ok(&mut state, 0, "a").expect("dispatch").fire();
  assert_eq!(first_calls.lock().unwrap().len(), 1);
  assert!(second_calls.lock().unwrap().is_empty());
}

#[test]
fn test_failure_before_registration_is_kept_for_the_notifier() {
  let mut state = GateState::new(&GateConfig::default());
  let index = state.create_pending_slot().unwrap();
  let _ = state.create_pending_slot().unwrap();
  let dispatch = state.complete_slot(
    SlotKey::Index(index),
    HERE,
    &Mapping::All,
    false,
    CompletionArgs::err(OperationError::msg("boom")),
  );
  assert!(dispatch.is_none());
  assert!(state.is_canceled());

  let (notifier, calls) = recording_notifier();
  state.register_notifier(notifier).unwrap().expect("dispatch").fire();
  let calls = calls.lock().unwrap();
  let error = calls[0].as_ref().unwrap_err();
  assert_eq!(error.message(), "boom");
  assert_eq!(error.location(), Some(&HERE));
}

#[test]
fn test_completions_after_cancellation_are_dropped() {
  let mut state = GateState::new(&GateConfig::default());
  let (notifier, calls) = recording_notifier();
  let _ = state.create_pending_slot();
  let _ = state.create_pending_slot();
  assert!(state.register_notifier(notifier).unwrap().is_none());

  state
    .complete_slot(
      SlotKey::Index(0),
      HERE,
      &Mapping::All,
      false,
      CompletionArgs::err(OperationError::msg("boom")),
    )
    .expect("dispatch")
    .fire();
  assert!(complete_ok(&mut state, 1, "late").is_none());
  assert_eq!(state.pending(), 0);
  assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn test_lenient_state_stores_errors_as_values() {
  let mut state = GateState::new(&GateConfig {
    fail_fast: false,
    ..GateConfig::default()
  });
  let (notifier, calls) = recording_notifier();
  let _ = state.create_pending_slot();
  assert!(state.register_notifier(notifier).unwrap().is_none());
  state
    .complete_slot(
      SlotKey::Index(0),
      HERE,
      &Mapping::position(0),
      false,
      CompletionArgs::err(OperationError::msg("boom")),
    )
    .expect("dispatch")
    .fire();

  let calls = calls.lock().unwrap();
  let results = calls[0].as_ref().unwrap();
  let error = results[0].as_error().unwrap();
  assert_eq!(error.message(), "boom");
  assert_eq!(error.location(), Some(&HERE));
}

#[test]
fn test_skip_error_check_overrides_fail_fast() {
  let mut state = GateState::new(&GateConfig::default());
  let _ = state.create_pending_slot();
  let dispatch = state.complete_slot(
    SlotKey::Index(0),
    HERE,
    &Mapping::position(0),
    true,
    CompletionArgs::err(OperationError::msg("ERROR")),
  );
  assert!(dispatch.is_none());
  assert!(!state.is_canceled());

  let (notifier, calls) = recording_notifier();
  state.register_notifier(notifier).unwrap().expect("dispatch").fire();
  let calls = calls.lock().unwrap();
  assert_eq!(calls[0].as_ref().unwrap()[0].as_error().unwrap().message(), "ERROR");
}

#[test]
fn test_existing_location_is_not_replaced() {
  let mut state = GateState::new(&GateConfig::default());
  let origin = CallSite::new("origin.rs", 7, 3);
  let _ = state.create_pending_slot();
  let _ = state.complete_slot(
    SlotKey::Index(0),
    HERE,
    &Mapping::All,
    false,
    CompletionArgs::err(OperationError::msg("boom").with_location(origin)),
  );
  let (notifier, calls) = recording_notifier();
  state.register_notifier(notifier).unwrap().expect("dispatch").fire();
  let calls = calls.lock().unwrap();
  assert_eq!(calls[0].as_ref().unwrap_err().location(), Some(&origin));
}

#[test]
fn test_named_slot_is_written_once() {
  let mut state = GateState::new(&GateConfig::default());
  let _ = state.create_pending_slot();
  let _ = state.create_pending_slot();
  let (notifier, calls) = recording_notifier();
  assert!(state.register_notifier(notifier).unwrap().is_none());
  for value in ["first", "second"] {
    if let Some(dispatch) = state.complete_slot(
      SlotKey::from("same"),
      HERE,
      &Mapping::position(1),
      false,
      CompletionArgs::ok(vec![json!(value)]),
    ) {
      dispatch.fire();
    }
  }
  let calls = calls.lock().unwrap();
  assert_eq!(calls[0].as_ref().unwrap()["same"], json!("first"));
}
