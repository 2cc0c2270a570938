use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Data-quality rule kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
  NotNull,
  Unique,
  Range,
  Pattern,
  Custom,
}

/// A rule applied to one column.
///
/// Rule parameters stay loosely typed: `range` reads `min`/`max`, `pattern`
/// reads `pattern`, `custom` rules carry whatever their author needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataQualityRule {
  pub column: String,
  pub rule: RuleKind,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub params: Option<serde_json::Map<String, serde_json::Value>>,
}

impl DataQualityRule {
  pub fn param(&self, name: &str) -> Option<&serde_json::Value> {
    self.params.as_ref().and_then(|p| p.get(name))
  }

  pub fn param_f64(&self, name: &str) -> Option<f64> {
    self.param(name).and_then(serde_json::Value::as_f64)
  }
}

/// Validation spec shared by sources, evaluators and exporters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationSpec {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub required_columns: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data_quality_rules: Option<Vec<DataQualityRule>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub required_metrics: Option<Vec<String>>,
  /// Minimum values keyed `"<column>.<metric>"`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub thresholds: Option<BTreeMap<String, f64>>,
}
