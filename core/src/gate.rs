use crate::call_site::CallSite;
use crate::config::GateConfig;
use crate::config_option::GateOption;
use crate::gate_error::GateError;
use crate::gate_state::SharedGateState;
use crate::latch::{Latch, LatchSpec};
use crate::mapping::{Mapping, ScopedConstant};
use crate::notifier::{GateOutcome, NotifierFn};
use crate::slot::GateResults;
use serde_json::Value;
use tokio::sync::oneshot;

/// Waits for a set of callback-style operations and reports their results once.
///
/// Hand every operation a [`Latch`] as its completion callback, then register a notifier with
/// [`Gate::on_complete`] or await [`Gate::wait`]. The notifier fires exactly once: with every
/// result after the last latch completed, or with the first error when the gate is fail-fast.
///
/// A gate created with an expected count stays pending until that many latches have been
/// created and completed. Latches that are never completed keep it pending forever.
#[derive(Debug, Clone)]
pub struct Gate {
  state: SharedGateState,
  config: GateConfig,
}

impl Default for Gate {
  fn default() -> Self {
    Self::new()
  }
}

impl Gate {
  /// Dynamic count, fail-fast.
  pub fn new() -> Self {
    Self::with_config(GateConfig::default())
  }

  pub fn with_count(count: usize) -> Self {
    Self::from_options([GateOption::with_expected_count(count)])
  }

  pub fn from_options(options: impl IntoIterator<Item = GateOption>) -> Self {
    Self::with_config(GateConfig::from(options))
  }

  pub fn with_config(config: GateConfig) -> Self {
    Self {
      state: SharedGateState::new(&config),
      config,
    }
  }

  pub fn config(&self) -> &GateConfig {
    &self.config
  }

  /// Creates a latch that stores every completion argument at its creation index.
  #[track_caller]
  pub fn latch(&self) -> Latch {
    self.latch_with(LatchSpec::new())
  }

  #[track_caller]
  pub fn latch_mapped(&self, mapping: impl Into<Mapping>) -> Latch {
    self.latch_with(LatchSpec::new().mapping(mapping))
  }

  #[track_caller]
  pub fn latch_named(&self, name: impl Into<String>, mapping: impl Into<Mapping>) -> Latch {
    self.latch_with(LatchSpec::new().named(name).mapping(mapping))
  }

  #[track_caller]
  pub fn latch_with(&self, spec: LatchSpec) -> Latch {
    Latch::create(&self.state, spec, CallSite::caller())
  }

  /// Creates a latch from a JSON mapping; see [`Mapping`]'s `TryFrom<Value>`.
  #[track_caller]
  pub fn try_latch(&self, mapping: Value) -> Result<Latch, GateError> {
    let mapping = Mapping::try_from(mapping)?;
    Ok(self.latch_with(LatchSpec::new().mapping(mapping)))
  }

  #[track_caller]
  pub fn try_latch_named(&self, name: impl Into<String>, mapping: Value) -> Result<Latch, GateError> {
    let mapping = Mapping::try_from(mapping)?;
    Ok(self.latch_with(LatchSpec::new().named(name).mapping(mapping)))
  }

  /// Marks `value` to be stored as is by a field mapping.
  pub fn val(&self, value: impl Into<Value>) -> ScopedConstant {
    ScopedConstant::new(value)
  }

  /// Latches still expected in fixed-count mode, `None` in dynamic mode.
  pub fn count(&self) -> Option<usize> {
    self.state.read(|s| s.remaining())
  }

  /// Latches created but not completed yet.
  pub fn pending(&self) -> usize {
    self.state.read(|s| s.pending())
  }

  pub fn is_canceled(&self) -> bool {
    self.state.read(|s| s.is_canceled())
  }

  /// Whether the notifier has already fired.
  pub fn is_finalized(&self) -> bool {
    self.state.read(|s| s.is_finalized())
  }

  /// Registers the notifier. It runs right away when the outcome is already decided.
  /// Only the first registration counts; later ones are ignored.
  pub fn on_complete<F>(&self, f: F)
  where
    F: FnOnce(GateOutcome) + Send + 'static, {
    let _ = self.try_on_complete(f);
  }

  /// Like [`Gate::on_complete`], but reports [`GateError::AlreadyRegistered`] instead of
  /// ignoring a second registration.
  pub fn try_on_complete<F>(&self, f: F) -> Result<(), GateError>
  where
    F: FnOnce(GateOutcome) + Send + 'static, {
    let notifier = NotifierFn::new(f);
    match self.state.update(move |s| s.register_notifier(notifier)) {
      Ok(Some(dispatch)) => {
        dispatch.fire();
        Ok(())
      }
      Ok(None) => Ok(()),
      Err(_) => Err(GateError::AlreadyRegistered),
    }
  }

  /// Like [`Gate::on_complete`], handing the notifier a fresh gate with the same configuration
  /// to start the next cycle with.
  pub fn on_complete_then<F>(&self, f: F)
  where
    F: FnOnce(GateOutcome, Gate) + Send + 'static, {
    let config = self.config.clone();
    self.on_complete(move |outcome| f(outcome, Gate::with_config(config)));
  }

  /// Waits for the outcome asynchronously.
  ///
  /// Resolves to [`GateError::AlreadyRegistered`] when a notifier was registered before, and
  /// to [`GateError::Abandoned`] when the gate and all its latches are dropped before the
  /// outcome is decided.
  pub async fn wait(self) -> Result<GateResults, GateError> {
    let (tx, rx) = oneshot::channel();
    self.try_on_complete(move |outcome| {
      if tx.send(outcome).is_err() {
        tracing::debug!("gate: waiter went away before the outcome");
      }
    })?;
    drop(self);
    match rx.await {
      Ok(outcome) => outcome.map_err(GateError::from),
      Err(_) => Err(GateError::Abandoned),
    }
  }
}

static_assertions::assert_impl_all!(Gate: Send, Sync);
