use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationSpec;

/// Statistics an evaluator can compute per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
  Mean,
  Std,
  Min,
  Max,
  Median,
  NullCount,
  UniqueCount,
  MostCommon,
}

impl Metric {
  pub const ALL: [Metric; 8] = [
    Metric::Mean,
    Metric::Std,
    Metric::Min,
    Metric::Max,
    Metric::Median,
    Metric::NullCount,
    Metric::UniqueCount,
    Metric::MostCommon,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Metric::Mean => "mean",
      Metric::Std => "std",
      Metric::Min => "min",
      Metric::Max => "max",
      Metric::Median => "median",
      Metric::NullCount => "null_count",
      Metric::UniqueCount => "unique_count",
      Metric::MostCommon => "most_common",
    }
  }
}

impl fmt::Display for Metric {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluatorConfig {
  /// Metrics to compute; all of them when absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metrics: Option<Vec<Metric>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub validation: Option<ValidationSpec>,
}

impl EvaluatorConfig {
  pub fn wants(&self, metric: Metric) -> bool {
    self
      .metrics
      .as_ref()
      .is_none_or(|metrics| metrics.contains(&metric))
  }
}
