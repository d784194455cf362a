use crate::call_site::CallSite;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

/// An error reported by an operation through its latch.<br/>
/// Carries the call-site of the latch that reported it once it has passed through a gate.
#[derive(Clone)]
pub struct OperationError {
  message: String,
  cause: Option<Arc<dyn Error + Send + Sync>>,
  location: Option<CallSite>,
}

impl OperationError {
  pub fn new<E: Error + Send + Sync + 'static>(error: E) -> Self {
    Self {
      message: error.to_string(),
      cause: Some(Arc::new(error)),
      location: None,
    }
  }

  pub fn msg(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      cause: None,
      location: None,
    }
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn cause(&self) -> Option<&(dyn Error + Send + Sync)> {
    self.cause.as_deref()
  }

  /// Call-site of the latch that reported this error, if any.
  pub fn location(&self) -> Option<&CallSite> {
    self.location.as_ref()
  }

  pub fn with_location(mut self, location: CallSite) -> Self {
    self.location = Some(location);
    self
  }

  /// Attaches `location` unless one is already present. Returns whether it was attached.
  pub(crate) fn attach_location(&mut self, location: CallSite) -> bool {
    if self.location.is_some() {
      return false;
    }
    self.location = Some(location);
    true
  }
}

impl Debug for OperationError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OperationError")
      .field("message", &self.message)
      .field("location", &self.location)
      .finish()
  }
}

impl Display for OperationError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match &self.location {
      Some(location) => write!(f, "{} (at {})", self.message, location),
      None => write!(f, "{}", self.message),
    }
  }
}

impl Error for OperationError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    self.cause.as_deref().map(|e| e as &(dyn Error + 'static))
  }
}

// Causes are not compared.
impl PartialEq for OperationError {
  fn eq(&self, other: &Self) -> bool {
    self.message == other.message && self.location == other.location
  }
}

impl From<std::io::Error> for OperationError {
  fn from(error: std::io::Error) -> Self {
    Self::new(error)
  }
}

impl From<String> for OperationError {
  fn from(message: String) -> Self {
    Self::msg(message)
  }
}

impl From<&str> for OperationError {
  fn from(message: &str) -> Self {
    Self::msg(message)
  }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GateError {
  #[error("gate: operation failed: {0}")]
  Operation(#[from] OperationError),
  #[error("gate: invalid mapping: {0}")]
  InvalidMapping(String),
  #[error("gate: abandoned before every latch completed")]
  Abandoned,
  #[error("gate: a notifier is already registered")]
  AlreadyRegistered,
}

impl GateError {
  pub fn of_invalid_mapping(reason: impl Into<String>) -> Self {
    GateError::InvalidMapping(reason.into())
  }

  pub fn operation_error(&self) -> Option<&OperationError> {
    match self {
      GateError::Operation(e) => Some(e),
      _ => None,
    }
  }
}

static_assertions::assert_impl_all!(OperationError: Send, Sync);
static_assertions::assert_impl_all!(GateError: Send, Sync);
