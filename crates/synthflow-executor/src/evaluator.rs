use std::collections::BTreeMap;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value, json};
use synthflow_config::{
  DataQualityRule, EvaluatorConfig, Metric, NodeConfig, NodeKind, RuleKind, ValidationSpec,
};
use synthflow_pipeline::{Node, Pipeline};
use tracing::info;

use crate::artifact::Artifact;
use crate::context::ExecutionContext;
use crate::error::ExecutorError;
use crate::executor::NodeExecutor;
use crate::report::{
  CheckStatus, EvaluationReport, RequiredColumnsResult, RequiredMetricsResult, RuleResult,
  ThresholdResult, ValidationReport,
};
use crate::table::{self, Table};

/// Computes per-column metrics and data-quality findings over its input.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluatorExecutor;

impl EvaluatorExecutor {
  pub fn new() -> Self {
    Self
  }
}

fn optional(value: Option<f64>) -> Value {
  value.map(table::number).unwrap_or(Value::Null)
}

fn column_metrics(config: &EvaluatorConfig, table: &Table<'_>, column: &str) -> Map<String, Value> {
  let mut metrics = Map::new();
  let mut put = |metric: Metric, value: Value| {
    if config.wants(metric) {
      metrics.insert(metric.as_str().to_string(), value);
    }
  };

  if table.is_numeric(column) {
    let values = table.numbers(column);
    put(Metric::Mean, optional(table::mean(&values)));
    put(Metric::Std, optional(table::sample_std(&values)));
    put(Metric::Min, optional(table::min(&values)));
    put(Metric::Max, optional(table::max(&values)));
    put(Metric::Median, optional(table::median(&values)));
    put(Metric::NullCount, json!(table.null_count(column)));
    put(Metric::UniqueCount, json!(table.distinct_count(column)));
  } else {
    put(Metric::UniqueCount, json!(table.distinct_count(column)));
    put(Metric::NullCount, json!(table.null_count(column)));
    put(
      Metric::MostCommon,
      table
        .most_common(column)
        .map(|(value, count)| json!({ "value": value, "count": count }))
        .unwrap_or(Value::Null),
    );
  }
  metrics
}

fn compute_metrics(config: &EvaluatorConfig, table: &Table<'_>) -> Map<String, Value> {
  table
    .columns()
    .iter()
    .filter_map(|column| {
      let metrics = column_metrics(config, table, column);
      (!metrics.is_empty()).then(|| (column.to_string(), Value::Object(metrics)))
    })
    .collect()
}

fn evaluate_rule(rule: &DataQualityRule, table: &Table<'_>) -> RuleResult {
  let column = rule.column.as_str();
  if !table.has_column(column) {
    return RuleResult::failed_with(rule.rule, "column not found");
  }

  match rule.rule {
    RuleKind::NotNull => {
      let nulls = table.null_count(column);
      RuleResult {
        null_count: Some(nulls),
        ..RuleResult::new(rule.rule, CheckStatus::from_pass(nulls == 0))
      }
    }
    RuleKind::Unique => {
      let unique = table.distinct_count(column);
      let total = table.row_count();
      RuleResult {
        unique_count: Some(unique),
        total_count: Some(total),
        ..RuleResult::new(rule.rule, CheckStatus::from_pass(unique == total))
      }
    }
    RuleKind::Range => {
      let values = table.numbers(column);
      let below = rule
        .param_f64("min")
        .map_or(0, |min| values.iter().filter(|v| **v < min).count());
      let above = rule
        .param_f64("max")
        .map_or(0, |max| values.iter().filter(|v| **v > max).count());
      RuleResult {
        below_min: Some(below),
        above_max: Some(above),
        ..RuleResult::new(rule.rule, CheckStatus::from_pass(below == 0 && above == 0))
      }
    }
    RuleKind::Pattern => {
      let Some(pattern) = rule.param("pattern").and_then(Value::as_str) else {
        return RuleResult::failed_with(rule.rule, "missing 'pattern' parameter");
      };
      let regex = match Regex::new(&format!("^(?:{pattern})")) {
        Ok(regex) => regex,
        Err(e) => return RuleResult::failed_with(rule.rule, format!("invalid pattern: {e}")),
      };
      let invalid = table
        .values(column)
        .filter(|value| {
          let text = match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
          };
          !regex.is_match(&text)
        })
        .count();
      RuleResult {
        invalid_count: Some(invalid),
        ..RuleResult::new(rule.rule, CheckStatus::from_pass(invalid == 0))
      }
    }
    RuleKind::Custom => RuleResult::new(rule.rule, CheckStatus::Skipped),
  }
}

fn validate(spec: &ValidationSpec, table: &Table<'_>, metrics: &Map<String, Value>) -> ValidationReport {
  let required_columns = spec.required_columns.as_ref().map(|required| {
    let missing_columns: Vec<String> = required
      .iter()
      .filter(|c| !table.has_column(c))
      .cloned()
      .collect();
    RequiredColumnsResult {
      status: CheckStatus::from_pass(missing_columns.is_empty()),
      missing_columns,
    }
  });

  // A later rule for the same column replaces an earlier one.
  let data_quality_rules = spec.data_quality_rules.as_ref().map(|rules| {
    rules
      .iter()
      .map(|rule| (rule.column.clone(), evaluate_rule(rule, table)))
      .collect::<BTreeMap<_, _>>()
  });

  let required_metrics = spec.required_metrics.as_ref().map(|required| {
    let missing_metrics: Vec<String> = required
      .iter()
      .filter(|name| {
        !metrics
          .values()
          .any(|column| column.get(name.as_str()).is_some())
      })
      .cloned()
      .collect();
    RequiredMetricsResult {
      status: CheckStatus::from_pass(missing_metrics.is_empty()),
      missing_metrics,
    }
  });

  let thresholds = spec.thresholds.as_ref().map(|thresholds| {
    thresholds
      .iter()
      .map(|(key, threshold)| {
        let value = key
          .rsplit_once('.')
          .and_then(|(column, metric)| metrics.get(column)?.get(metric)?.as_f64());
        let result = ThresholdResult {
          status: CheckStatus::from_pass(value.is_some_and(|v| v >= *threshold)),
          threshold: *threshold,
          value,
        };
        (key.clone(), result)
      })
      .collect::<BTreeMap<_, _>>()
  });

  ValidationReport {
    required_columns,
    data_quality_rules,
    required_metrics,
    thresholds,
  }
}

/// Evaluate a table. Exposed for callers that hold records outside a pipeline run.
pub fn evaluate(config: &EvaluatorConfig, table: &Table<'_>) -> EvaluationReport {
  let metrics = compute_metrics(config, table);
  let validation = config
    .validation
    .as_ref()
    .map(|spec| validate(spec, table, &metrics))
    .unwrap_or_default();
  EvaluationReport {
    metrics,
    validation,
  }
}

#[async_trait]
impl NodeExecutor for EvaluatorExecutor {
  async fn execute(
    &self,
    node: &Node,
    pipeline: &Pipeline,
    context: &ExecutionContext,
  ) -> Result<Artifact, ExecutorError> {
    let NodeConfig::Evaluator(config) = &node.config else {
      return Err(ExecutorError::UnexpectedConfig {
        expected: NodeKind::Evaluator,
        found: node.config.kind(),
      });
    };

    let input = context.input_for(pipeline, &node.id);
    let table = Table::from_artifact(input.map(|(_, artifact)| artifact));
    let report = evaluate(config, &table);

    info!(
      node_id = %node.id,
      input = input.map(|(id, _)| id).unwrap_or("-"),
      rows = table.row_count(),
      columns = report.metrics.len(),
      passed = report.passed(),
      "evaluated"
    );
    Ok(Artifact::Report(report))
  }
}
