use crate::call_site::CallSite;
use crate::completion_args::CompletionArgs;
use crate::config::GateConfig;
use crate::gate_error::OperationError;
use crate::mapping::Mapping;
use crate::notifier::{Dispatch, Notifier, NotifierFn};
use crate::slot::{GateResults, SlotKey};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[cfg(test)]
mod tests;

/// Bookkeeping of one wait cycle.<br/>
/// Every method decides under `&mut self` and hands back the notification to run, if any;
/// callers run it after releasing whatever guards the state.
#[derive(Debug)]
pub(crate) struct GateState {
  target_count: Option<usize>,
  pending_count: usize,
  next_index: usize,
  results: GateResults,
  canceled: bool,
  terminal_error: Option<OperationError>,
  notifier: Notifier,
  fail_fast: bool,
}

impl GateState {
  pub(crate) fn new(config: &GateConfig) -> Self {
    Self {
      target_count: config.expected_count,
      pending_count: 0,
      next_index: 0,
      results: GateResults::new(),
      canceled: false,
      terminal_error: None,
      notifier: Notifier::Unregistered,
      fail_fast: config.fail_fast,
    }
  }

  /// Latches still expected before the count is used up; `None` in dynamic mode.
  pub(crate) fn remaining(&self) -> Option<usize> {
    self.target_count
  }

  pub(crate) fn pending(&self) -> usize {
    self.pending_count
  }

  pub(crate) fn is_canceled(&self) -> bool {
    self.canceled
  }

  pub(crate) fn is_finalized(&self) -> bool {
    self.notifier.is_fired()
  }

  pub(crate) fn is_satisfied(&self) -> bool {
    self.pending_count == 0 && self.target_count.map_or(true, |count| count == 0)
  }

  /// Reserves a slot and returns its index, or `None` once the expected count is used up.
  pub(crate) fn create_pending_slot(&mut self) -> Option<usize> {
    match self.target_count.as_mut() {
      Some(0) => return None,
      Some(count) => *count -= 1,
      None => {}
    }
    self.pending_count += 1;
    let index = self.next_index;
    self.next_index += 1;
    Some(index)
  }

  /// Records the completion of the slot `key` and returns the notification it triggers.
  pub(crate) fn complete_slot(
    &mut self,
    key: SlotKey,
    location: CallSite,
    mapping: &Mapping,
    skip_error_check: bool,
    mut args: CompletionArgs,
  ) -> Option<Dispatch> {
    self.pending_count = self.pending_count.saturating_sub(1);
    if self.canceled {
      tracing::trace!("gate: dropping completion of slot {} after cancellation", key);
      return None;
    }

    if let Some(error) = args.error_mut() {
      error.attach_location(location);
    }

    match args.error() {
      Some(error) if self.fail_fast && !skip_error_check => {
        let error = error.clone();
        tracing::debug!("gate: slot {} failed, canceling: {}", key, error);
        self.canceled = true;
        match self.notifier.take_armed() {
          Some(notifier) => Some(Dispatch::new(notifier, Err(error))),
          None => {
            self.terminal_error = Some(error);
            None
          }
        }
      }
      _ => {
        let value = mapping.apply(&args);
        if !self.results.insert(key.clone(), value) {
          tracing::warn!("gate: slot {} is already written, keeping the first result", key);
        }
        tracing::trace!("gate: slot {} completed, pending = {}", key, self.pending_count);
        self.try_finalize()
      }
    }
  }

  /// Registers the notifier, or returns it ready to fire when the outcome is already known.
  /// A notifier offered after the first registration is handed back unused.
  pub(crate) fn register_notifier(&mut self, notifier: NotifierFn) -> Result<Option<Dispatch>, NotifierFn> {
    if self.notifier.is_registered() {
      tracing::warn!("gate: notifier already registered, ignoring");
      return Err(notifier);
    }
    if let Some(error) = self.terminal_error.take() {
      self.notifier = Notifier::Fired;
      return Ok(Some(Dispatch::new(notifier, Err(error))));
    }
    if self.is_satisfied() {
      self.notifier = Notifier::Fired;
      return Ok(Some(Dispatch::new(notifier, Ok(std::mem::take(&mut self.results)))));
    }
    self.notifier = Notifier::Armed(notifier);
    Ok(None)
  }

  fn try_finalize(&mut self) -> Option<Dispatch> {
    if !self.is_satisfied() {
      return None;
    }
    let notifier = self.notifier.take_armed()?;
    Some(Dispatch::new(notifier, Ok(std::mem::take(&mut self.results))))
  }
}

/// [`GateState`] shared between a gate and its latches.
#[derive(Debug, Clone)]
pub(crate) struct SharedGateState(Arc<Mutex<GateState>>);

impl SharedGateState {
  pub(crate) fn new(config: &GateConfig) -> Self {
    Self(Arc::new(Mutex::new(GateState::new(config))))
  }

  fn lock(&self) -> MutexGuard<'_, GateState> {
    self.0.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub(crate) fn read<R>(&self, f: impl FnOnce(&GateState) -> R) -> R {
    f(&self.lock())
  }

  pub(crate) fn update<R>(&self, f: impl FnOnce(&mut GateState) -> R) -> R {
    f(&mut self.lock())
  }

  /// Runs a transition and fires the notification it yields once the lock is released.
  pub(crate) fn transition(&self, f: impl FnOnce(&mut GateState) -> Option<Dispatch>) {
    let dispatch = self.update(f);
    if let Some(dispatch) = dispatch {
      dispatch.fire();
    }
  }
}

static_assertions::assert_impl_all!(SharedGateState: Send, Sync);
