use crate::gate_error::OperationError;
use crate::slot::GateResults;
use std::fmt::{Debug, Formatter};

/// What a gate's notifier receives: every result, or the error that failed the gate.
pub type GateOutcome = Result<GateResults, OperationError>;

type NotifierFunc = Box<dyn FnOnce(GateOutcome) + Send + 'static>;

pub(crate) struct NotifierFn(NotifierFunc);

impl NotifierFn {
  pub(crate) fn new<F>(f: F) -> Self
  where
    F: FnOnce(GateOutcome) + Send + 'static, {
    Self(Box::new(f))
  }

  fn run(self, outcome: GateOutcome) {
    (self.0)(outcome)
  }
}

impl Debug for NotifierFn {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "NotifierFn")
  }
}

/// One-shot holder for the completion callback of a gate.
#[derive(Debug, Default)]
pub(crate) enum Notifier {
  #[default]
  Unregistered,
  Armed(NotifierFn),
  Fired,
}

impl Notifier {
  pub(crate) fn is_registered(&self) -> bool {
    !matches!(self, Notifier::Unregistered)
  }

  pub(crate) fn is_armed(&self) -> bool {
    matches!(self, Notifier::Armed(_))
  }

  pub(crate) fn is_fired(&self) -> bool {
    matches!(self, Notifier::Fired)
  }

  /// Takes the armed callback out, leaving `Fired` behind. Any other state is left as is.
  pub(crate) fn take_armed(&mut self) -> Option<NotifierFn> {
    if !self.is_armed() {
      return None;
    }
    match std::mem::replace(self, Notifier::Fired) {
      Notifier::Armed(notifier) => Some(notifier),
      _ => None,
    }
  }
}

/// A notification decided under the gate's lock, run after the lock is released.
#[derive(Debug)]
#[must_use]
pub(crate) struct Dispatch {
  notifier: NotifierFn,
  outcome: GateOutcome,
}

impl Dispatch {
  pub(crate) fn new(notifier: NotifierFn, outcome: GateOutcome) -> Self {
    Self { notifier, outcome }
  }

  #[cfg(test)]
  pub(crate) fn outcome(&self) -> &GateOutcome {
    &self.outcome
  }

  pub(crate) fn fire(self) {
    match &self.outcome {
      Ok(results) => tracing::debug!("gate: notifying {} result(s)", results.len()),
      Err(error) => tracing::debug!("gate: notifying failure: {}", error),
    }
    self.notifier.run(self.outcome)
  }
}
