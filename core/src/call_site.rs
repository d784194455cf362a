use std::fmt::{Display, Formatter};
use std::panic::Location;

/// Source position of the code that created a latch.<br/>
/// Captured when the latch is created, so it still points at the caller even when the
/// latch is completed on another task or thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
  file: &'static str,
  line: u32,
  column: u32,
}

impl CallSite {
  pub const fn new(file: &'static str, line: u32, column: u32) -> Self {
    Self { file, line, column }
  }

  /// Returns the position of the nearest caller that is not `#[track_caller]`.
  #[track_caller]
  pub fn caller() -> Self {
    Self::from(Location::caller())
  }

  pub fn file(&self) -> &'static str {
    self.file
  }

  pub fn line(&self) -> u32 {
    self.line
  }

  pub fn column(&self) -> u32 {
    self.column
  }
}

impl From<&'static Location<'static>> for CallSite {
  fn from(location: &'static Location<'static>) -> Self {
    Self::new(location.file(), location.line(), location.column())
  }
}

impl Display for CallSite {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}:{}", self.file, self.line, self.column)
  }
}
