use crate::config_option::GateOption;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
  /// Number of latches to expect. `None` lets the number of created latches decide.
  /// Negative counts in a serialized config select that dynamic mode as well.
  #[serde(deserialize_with = "deserialize_signed_count")]
  pub expected_count: Option<usize>,
  /// Whether the first failing latch fails the whole gate.
  pub fail_fast: bool,
}

fn deserialize_signed_count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
  D: Deserializer<'de>, {
  let count = Option::<i64>::deserialize(deserializer)?;
  Ok(count.and_then(|count| usize::try_from(count).ok()))
}

impl Default for GateConfig {
  fn default() -> Self {
    GateConfig {
      expected_count: None,
      fail_fast: true,
    }
  }
}

impl GateConfig {
  pub fn from(options: impl IntoIterator<Item = GateOption>) -> GateConfig {
    let mut config = GateConfig::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }

  pub fn is_dynamic(&self) -> bool {
    self.expected_count.is_none()
  }
}
