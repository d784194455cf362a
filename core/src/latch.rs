use crate::call_site::CallSite;
use crate::completion_args::CompletionArgs;
use crate::gate_error::OperationError;
use crate::gate_state::SharedGateState;
use crate::mapping::Mapping;
use crate::slot::SlotKey;
use serde_json::Value;
use std::fmt::{Debug, Formatter};


/// Options for creating a [`Latch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatchSpec {
  name: Option<String>,
  mapping: Mapping,
  skip_error_check: bool,
}

impl LatchSpec {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stores the result under `name` instead of the creation index.
  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn mapping(mut self, mapping: impl Into<Mapping>) -> Self {
    self.mapping = mapping.into();
    self
  }

  /// Records failures of this latch as ordinary slot values even on a fail-fast gate.
  pub fn skip_error_check(mut self, skip: bool) -> Self {
    self.skip_error_check = skip;
    self
  }

  pub fn get_name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn get_mapping(&self) -> &Mapping {
    &self.mapping
  }

  pub fn is_skip_error_check(&self) -> bool {
    self.skip_error_check
  }
}

impl From<Mapping> for LatchSpec {
  fn from(mapping: Mapping) -> Self {
    LatchSpec::new().mapping(mapping)
  }
}

struct LatchInner {
  state: SharedGateState,
  key: SlotKey,
  mapping: Mapping,
  skip_error_check: bool,
}

/// Completion handle for one tracked operation.<br/>
/// Completing a latch consumes it, so every latch reports at most once. A latch created after
/// the expected count was used up is inert: completing it has no effect.
pub struct Latch {
  inner: Option<LatchInner>,
  location: CallSite,
}

impl Latch {
  pub(crate) fn create(state: &SharedGateState, spec: LatchSpec, location: CallSite) -> Self {
    let index = state.update(|s| s.create_pending_slot());
    let inner = index.map(|index| {
      let key = match spec.name {
        Some(name) => SlotKey::Name(name),
        None => SlotKey::Index(index),
      };
      tracing::trace!("gate: latch {} created at {}", key, location);
      LatchInner {
        state: state.clone(),
        key,
        mapping: spec.mapping,
        skip_error_check: spec.skip_error_check,
      }
    });
    if inner.is_none() {
      tracing::debug!("gate: expected count used up, latch at {} is inert", location);
    }
    Self { inner, location }
  }

  pub fn key(&self) -> Option<&SlotKey> {
    self.inner.as_ref().map(|inner| &inner.key)
  }

  /// Where this latch was created.
  pub fn location(&self) -> &CallSite {
    &self.location
  }

  pub fn is_inert(&self) -> bool {
    self.inner.is_none()
  }

  /// Reports the outcome of the operation behind this latch.
  pub fn complete(mut self, args: CompletionArgs) {
    let Some(inner) = self.inner.take() else {
      return;
    };
    let LatchInner {
      state,
      key,
      mapping,
      skip_error_check,
    } = inner;
    let location = self.location;
    state.transition(move |s| s.complete_slot(key, location, &mapping, skip_error_check, args));
  }

  /// Completes without any arguments.
  pub fn done(self) {
    self.complete(CompletionArgs::empty())
  }

  pub fn succeed(self, values: Vec<Value>) {
    self.complete(CompletionArgs::ok(values))
  }

  pub fn fail(self, error: impl Into<OperationError>) {
    self.complete(CompletionArgs::err(error))
  }

  /// Completes with `Ok(value)` at position `1`, or `Err(error)` in the error slot.
  pub fn resolve<T, E>(self, result: Result<T, E>)
  where
    T: Into<Value>,
    E: Into<OperationError>, {
    self.complete(CompletionArgs::from_result(result))
  }

  /// Turns the latch into a plain completion callback.
  pub fn into_callback(self) -> impl FnOnce(CompletionArgs) + Send + 'static {
    move |args| self.complete(args)
  }
}

impl Debug for Latch {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Latch")
      .field("key", &self.key())
      .field("location", &self.location)
      .finish()
  }
}

impl Drop for Latch {
  fn drop(&mut self) {
    if let Some(inner) = &self.inner {
      tracing::warn!(
        "gate: latch {} created at {} dropped without completing; the gate stays pending",
        inner.key,
        self.location
      );
    }
  }
}

static_assertions::assert_impl_all!(Latch: Send, Sync);
