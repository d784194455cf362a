use crate::gate_error::OperationError;
use crate::slot::SlotValue;
use serde_json::Value;

/// The arguments a latch is completed with.<br/>
/// Position `0` is the error slot, positions `1..` are the operation's values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionArgs {
  error: Option<OperationError>,
  values: Vec<Value>,
}

impl CompletionArgs {
  pub fn new(error: Option<OperationError>, values: Vec<Value>) -> Self {
    Self { error, values }
  }

  pub fn empty() -> Self {
    Self::default()
  }

  pub fn ok(values: Vec<Value>) -> Self {
    Self::new(None, values)
  }

  pub fn err(error: impl Into<OperationError>) -> Self {
    Self::new(Some(error.into()), Vec::new())
  }

  pub fn from_result<T, E>(result: Result<T, E>) -> Self
  where
    T: Into<Value>,
    E: Into<OperationError>, {
    match result {
      Ok(value) => Self::ok(vec![value.into()]),
      Err(error) => Self::err(error),
    }
  }

  pub fn with_value(mut self, value: impl Into<Value>) -> Self {
    self.values.push(value.into());
    self
  }

  pub fn error(&self) -> Option<&OperationError> {
    self.error.as_ref()
  }

  pub(crate) fn error_mut(&mut self) -> Option<&mut OperationError> {
    self.error.as_mut()
  }

  pub fn values(&self) -> &[Value] {
    &self.values
  }

  pub fn is_failure(&self) -> bool {
    self.error.is_some()
  }

  /// Number of positions, the error slot included.
  pub fn arity(&self) -> usize {
    self.values.len() + 1
  }

  /// The argument at `position`. Positions past the end read as null.
  pub fn arg(&self, position: usize) -> SlotValue {
    match position {
      0 => match &self.error {
        Some(error) => SlotValue::Error(error.clone()),
        None => SlotValue::null(),
      },
      n => self.values.get(n - 1).cloned().map(SlotValue::Value).unwrap_or_else(SlotValue::null),
    }
  }

  /// Every position, the error slot included.
  pub fn all(&self) -> SlotValue {
    SlotValue::List((0..self.arity()).map(|position| self.arg(position)).collect())
  }
}
