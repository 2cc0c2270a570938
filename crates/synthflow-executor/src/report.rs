//! Evaluation report types.

use std::collections::BTreeMap;

use serde::Serialize;
use synthflow_config::RuleKind;

/// Outcome of a single validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
  Pass,
  Fail,
  Skipped,
}

impl CheckStatus {
  pub(crate) fn from_pass(pass: bool) -> Self {
    if pass { CheckStatus::Pass } else { CheckStatus::Fail }
  }
}

/// An evaluator's output: per-column metrics plus validation findings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
  /// column → metric name → value. Columns with no applicable metric are omitted.
  pub metrics: serde_json::Map<String, serde_json::Value>,
  pub validation: ValidationReport,
}

impl EvaluationReport {
  /// Look up a computed metric, e.g. `metric("x", "mean")`.
  pub fn metric(&self, column: &str, metric: &str) -> Option<&serde_json::Value> {
    self.metrics.get(column).and_then(|m| m.get(metric))
  }

  /// Whether every check that ran passed. Skipped checks do not count as failures.
  pub fn passed(&self) -> bool {
    self.validation.passed()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub required_columns: Option<RequiredColumnsResult>,
  /// column → result of the rule declared for that column.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data_quality_rules: Option<BTreeMap<String, RuleResult>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub required_metrics: Option<RequiredMetricsResult>,
  /// `"column.metric"` → threshold comparison.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub thresholds: Option<BTreeMap<String, ThresholdResult>>,
}

impl ValidationReport {
  pub fn is_empty(&self) -> bool {
    self.required_columns.is_none()
      && self.data_quality_rules.is_none()
      && self.required_metrics.is_none()
      && self.thresholds.is_none()
  }

  pub fn passed(&self) -> bool {
    let failed = |status: CheckStatus| status == CheckStatus::Fail;
    !(self
      .required_columns
      .as_ref()
      .is_some_and(|r| failed(r.status))
      || self
        .data_quality_rules
        .iter()
        .flat_map(|rules| rules.values())
        .any(|r| failed(r.status))
      || self
        .required_metrics
        .as_ref()
        .is_some_and(|r| failed(r.status))
      || self
        .thresholds
        .iter()
        .flat_map(|t| t.values())
        .any(|t| failed(t.status)))
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequiredColumnsResult {
  pub status: CheckStatus,
  pub missing_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequiredMetricsResult {
  pub status: CheckStatus,
  pub missing_metrics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdResult {
  pub status: CheckStatus,
  pub threshold: f64,
  /// The metric value compared, absent when the metric was not computed.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value: Option<f64>,
}

/// Result of one data-quality rule. Only the counts relevant to the rule are set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleResult {
  pub rule: RuleKind,
  pub status: CheckStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub null_count: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub unique_count: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub total_count: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub below_min: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub above_max: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub invalid_count: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl RuleResult {
  pub(crate) fn new(rule: RuleKind, status: CheckStatus) -> Self {
    Self {
      rule,
      status,
      null_count: None,
      unique_count: None,
      total_count: None,
      below_min: None,
      above_max: None,
      invalid_count: None,
      error: None,
    }
  }

  pub(crate) fn failed_with(rule: RuleKind, error: impl Into<String>) -> Self {
    Self {
      error: Some(error.into()),
      ..Self::new(rule, CheckStatus::Fail)
    }
  }
}
