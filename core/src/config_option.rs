use crate::config::GateConfig;

#[derive(Debug, Clone)]
pub enum GateOption {
  SetExpectedCount(usize),
  SetDynamicCount,
  SetFailFast(bool),
}

impl GateOption {
  pub fn apply(&self, config: &mut GateConfig) {
    match self {
      GateOption::SetExpectedCount(count) => {
        config.expected_count = Some(*count);
      }
      GateOption::SetDynamicCount => {
        config.expected_count = None;
      }
      GateOption::SetFailFast(fail_fast) => {
        config.fail_fast = *fail_fast;
      }
    }
  }

  pub fn with_expected_count(count: usize) -> GateOption {
    GateOption::SetExpectedCount(count)
  }

  /// Maps a signed count the way callers coming from `-1 = unknown` APIs expect:
  /// negative values select the dynamic mode.
  pub fn with_signed_count(count: i64) -> GateOption {
    match usize::try_from(count) {
      Ok(count) => GateOption::SetExpectedCount(count),
      Err(_) => GateOption::SetDynamicCount,
    }
  }

  pub fn with_dynamic_count() -> GateOption {
    GateOption::SetDynamicCount
  }

  pub fn with_fail_fast(fail_fast: bool) -> GateOption {
    GateOption::SetFailFast(fail_fast)
  }
}
