use std::collections::HashMap;

use async_trait::async_trait;
use rand::distr::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde_json::Value;
use synthflow_config::{
  ConstraintKind, DistributionKind, GeneratorConfig, GeneratorKind, NodeConfig, NodeKind,
};
use synthflow_pipeline::{Node, Pipeline};
use tracing::{debug, info, warn};

use crate::artifact::{Artifact, Record, StatusRecord};
use crate::context::ExecutionContext;
use crate::error::ExecutorError;
use crate::executor::NodeExecutor;
use crate::table::{self, Table};

/// Synthesizes records from the statistics of the upstream table.
///
/// `gaussian` draws each numeric column from a normal distribution fitted to
/// the column; `uniform` draws between the column's observed min and max.
/// Non-numeric columns are emitted as null. Other synthesis kinds report
/// `not_implemented`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorExecutor;

impl GeneratorExecutor {
  pub fn new() -> Self {
    Self
  }
}

#[derive(Debug)]
enum Sampler {
  Constant(f64),
  Normal(Normal<f64>),
  Uniform(Uniform<f64>),
}

impl Sampler {
  fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
    match self {
      Sampler::Constant(value) => *value,
      Sampler::Normal(normal) => normal.sample(rng),
      Sampler::Uniform(uniform) => uniform.sample(rng),
    }
  }
}

/// How one numeric column is generated.
#[derive(Debug)]
struct ColumnPlan {
  sampler: Sampler,
  lower: Option<f64>,
  upper: Option<f64>,
}

impl ColumnPlan {
  fn fit(config: &GeneratorConfig, table: &Table<'_>, column: &str) -> Result<Self, ExecutorError> {
    let values = table.numbers(column);
    let mut distribution = match config.kind {
      GeneratorKind::Uniform => DistributionKind::Uniform,
      _ => DistributionKind::Normal,
    };
    let mut mean = table::mean(&values).unwrap_or(0.0);
    let mut std = table::sample_std(&values).unwrap_or(0.0);
    let mut low = table::min(&values).unwrap_or(0.0);
    let mut high = table::max(&values).unwrap_or(0.0);
    let (mut lower, mut upper) = (None, None);

    for constraint in config.constraints_for(column) {
      let params = &constraint.params;
      match constraint.kind {
        ConstraintKind::Range => {
          lower = params.min.or(lower);
          upper = params.max.or(upper);
        }
        ConstraintKind::Distribution => {
          distribution = params.distribution.unwrap_or(distribution);
          mean = params.mean.unwrap_or(mean);
          std = params.std.unwrap_or(std);
          low = params.min.unwrap_or(low);
          high = params.max.unwrap_or(high);
        }
        ConstraintKind::Correlation | ConstraintKind::Custom => {
          debug!(column, kind = ?constraint.kind, "constraint_ignored");
        }
      }
    }

    let sampler = match distribution {
      DistributionKind::Normal if std == 0.0 => Sampler::Constant(mean),
      DistributionKind::Normal => Sampler::Normal(Normal::new(mean, std).map_err(|e| {
        ExecutorError::InvalidParameter(format!("column '{column}': {e}"))
      })?),
      DistributionKind::Uniform if low == high => Sampler::Constant(low),
      DistributionKind::Uniform if low < high => {
        // Bounds whose width overflows f64 cannot be sampled
        if !(high - low).is_finite() {
          return Err(ExecutorError::InvalidParameter(format!(
            "column '{column}': uniform bounds {low}..{high} are too far apart"
          )));
        }
        Sampler::Uniform(Uniform::new_inclusive(low, high).map_err(|e| {
          ExecutorError::InvalidParameter(format!("column '{column}': {e}"))
        })?)
      }
      DistributionKind::Uniform => {
        return Err(ExecutorError::InvalidParameter(format!(
          "column '{column}': uniform bounds {low} > {high}"
        )));
      }
      other => {
        return Err(ExecutorError::InvalidParameter(format!(
          "column '{column}': unsupported distribution {other:?}"
        )));
      }
    };

    Ok(Self {
      sampler,
      lower,
      upper,
    })
  }

  fn draw<R: Rng>(&self, rng: &mut R, count: usize) -> Vec<f64> {
    (0..count)
      .map(|_| {
        let mut value = self.sampler.sample(rng);
        if let Some(lower) = self.lower {
          value = value.max(lower);
        }
        if let Some(upper) = self.upper {
          value = value.min(upper);
        }
        value
      })
      .collect()
  }
}

fn synthesize(config: &GeneratorConfig, table: &Table<'_>) -> Result<Vec<Record>, ExecutorError> {
  let numeric = table.numeric_columns();
  if numeric.is_empty() {
    return Ok(Vec::new());
  }

  let count = config.parameters.num_samples.unwrap_or(table.row_count());
  let mut rng = match config.parameters.seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_os_rng(),
  };

  let mut generated: HashMap<&str, Vec<f64>> = HashMap::with_capacity(numeric.len());
  for column in numeric {
    let plan = ColumnPlan::fit(config, table, column)?;
    generated.insert(column, plan.draw(&mut rng, count));
  }

  Ok(
    (0..count)
      .map(|i| {
        table
          .columns()
          .iter()
          .map(|column| {
            let value = generated
              .get(column)
              .map(|samples| table::number(samples[i]))
              .unwrap_or(Value::Null);
            (column.to_string(), value)
          })
          .collect()
      })
      .collect(),
  )
}

#[async_trait]
impl NodeExecutor for GeneratorExecutor {
  async fn execute(
    &self,
    node: &Node,
    pipeline: &Pipeline,
    context: &ExecutionContext,
  ) -> Result<Artifact, ExecutorError> {
    let NodeConfig::Generator(config) = &node.config else {
      return Err(ExecutorError::UnexpectedConfig {
        expected: NodeKind::Generator,
        found: node.config.kind(),
      });
    };

    match config.kind {
      GeneratorKind::Gaussian | GeneratorKind::Uniform => {}
      other => {
        warn!(node_id = %node.id, generator = other.as_str(), "generator_not_implemented");
        return Ok(Artifact::Status(StatusRecord::not_implemented(format!(
          "{} generator not yet implemented",
          other.as_str()
        ))));
      }
    }

    let input = context.input_for(pipeline, &node.id);
    let table = Table::from_artifact(input.map(|(_, artifact)| artifact));

    match synthesize(config, &table) {
      Ok(records) => {
        info!(
          node_id = %node.id,
          generator = config.kind.as_str(),
          input_rows = table.row_count(),
          samples = records.len(),
          "synthesized"
        );
        Ok(Artifact::Records(records))
      }
      Err(e) => {
        warn!(node_id = %node.id, error = %e, "synthesis_failed");
        Ok(Artifact::Status(StatusRecord::error(format!(
          "error generating data: {e}"
        ))))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::artifact::Status;
  use crate::testing::{context_with, fed_by_source, node, pipeline, records};
  use serde_json::json;

  async fn generate(config: serde_json::Value, upstream: serde_json::Value) -> Artifact {
    let (pipeline, node) = fed_by_source("generator", config);
    let context = context_with("src", Artifact::Records(records(upstream)));
    GeneratorExecutor::new()
      .execute(&node, &pipeline, &context)
      .await
      .unwrap()
  }

  fn column(artifact: &Artifact, name: &str) -> Vec<f64> {
    artifact
      .as_records()
      .unwrap()
      .iter()
      .map(|r| r[name].as_f64().unwrap())
      .collect()
  }

  #[tokio::test]
  async fn test_zero_variance_column_is_constant() {
    let artifact = generate(
      json!({ "type": "gaussian", "parameters": { "num_samples": 25 } }),
      json!([{ "x": 5 }, { "x": 5 }, { "x": 5 }]),
    )
    .await;

    let values = column(&artifact, "x");
    assert_eq!(values.len(), 25);
    assert!(values.iter().all(|v| *v == 5.0));
  }

  #[tokio::test]
  async fn test_no_upstream_yields_empty_records() {
    let pipeline = pipeline(
      vec![node("gen", "generator", json!({ "type": "gaussian", "parameters": { "num_samples": 10 } }))],
      vec![],
    );
    let node = pipeline.get_node("gen").unwrap().clone();

    let artifact = GeneratorExecutor::new()
      .execute(&node, &pipeline, &ExecutionContext::new())
      .await
      .unwrap();
    assert_eq!(artifact, Artifact::Records(vec![]));
  }

  #[tokio::test]
  async fn test_no_numeric_columns_yields_empty_records() {
    let artifact = generate(
      json!({ "type": "gaussian", "parameters": { "num_samples": 10 } }),
      json!([{ "name": "a" }, { "name": "b" }]),
    )
    .await;
    assert_eq!(artifact, Artifact::Records(vec![]));
  }

  #[tokio::test]
  async fn test_column_order_kept_and_text_columns_null() {
    let artifact = generate(
      json!({ "type": "gaussian", "parameters": {} }),
      json!([{ "name": "a", "x": 1 }, { "name": "b", "x": 3 }]),
    )
    .await;

    let rows = artifact.as_records().unwrap();
    assert_eq!(rows.len(), 2, "sample count defaults to the input row count");
    for row in rows {
      assert_eq!(row.keys().collect::<Vec<_>>(), vec!["name", "x"]);
      assert!(row["name"].is_null());
      assert!(row["x"].is_number());
    }
  }

  #[tokio::test]
  async fn test_seed_makes_output_reproducible() {
    let config = json!({ "type": "gaussian", "parameters": { "num_samples": 50, "seed": 7 } });
    let upstream = json!([{ "x": 1.0 }, { "x": 2.0 }, { "x": 4.0 }]);

    let first = generate(config.clone(), upstream.clone()).await;
    let second = generate(config, upstream).await;
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn test_range_constraint_clamps() {
    let artifact = generate(
      json!({
        "type": "gaussian",
        "parameters": { "num_samples": 200, "seed": 1 },
        "constraints": [{ "column": "x", "type": "range", "params": { "min": 0.0, "max": 10.0 } }]
      }),
      json!([{ "x": -100 }, { "x": 0 }, { "x": 100 }]),
    )
    .await;

    assert!(column(&artifact, "x").iter().all(|v| (0.0..=10.0).contains(v)));
  }

  #[tokio::test]
  async fn test_distribution_constraint_overrides_fit() {
    let artifact = generate(
      json!({
        "type": "gaussian",
        "parameters": { "num_samples": 10, "seed": 3 },
        "constraints": [{ "column": "x", "type": "distribution", "params": { "mean": 42.0, "std": 0.0 } }]
      }),
      json!([{ "x": 1 }, { "x": 2 }]),
    )
    .await;

    assert!(column(&artifact, "x").iter().all(|v| *v == 42.0));
  }

  #[tokio::test]
  async fn test_uniform_stays_within_observed_bounds() {
    let artifact = generate(
      json!({ "type": "uniform", "parameters": { "num_samples": 100, "seed": 11 } }),
      json!([{ "x": 2 }, { "x": 8 }, { "x": 5 }]),
    )
    .await;

    let values = column(&artifact, "x");
    assert_eq!(values.len(), 100);
    assert!(values.iter().all(|v| (2.0..=8.0).contains(v)));
  }

  #[tokio::test]
  async fn test_uniform_over_unbounded_width_is_error_status() {
    let artifact = generate(
      json!({ "type": "uniform", "parameters": { "num_samples": 3, "seed": 1 } }),
      json!([{ "x": -1e308 }, { "x": 1e308 }]),
    )
    .await;

    let status = artifact.as_status().unwrap();
    assert_eq!(status.status, Status::Error);
    assert!(status.message.contains("too far apart"));
  }

  #[tokio::test]
  async fn test_wide_distribution_bounds_are_error_status() {
    let artifact = generate(
      json!({
        "type": "gaussian",
        "parameters": { "num_samples": 3, "seed": 1 },
        "constraints": [{
          "column": "x",
          "type": "distribution",
          "params": { "distribution": "uniform", "min": -1.7e308, "max": 1.7e308 }
        }]
      }),
      json!([{ "x": 1 }, { "x": 2 }]),
    )
    .await;

    assert_eq!(artifact.as_status().unwrap().status, Status::Error);
  }

  #[tokio::test]
  async fn test_negative_std_is_error_status() {
    let artifact = generate(
      json!({
        "type": "gaussian",
        "parameters": { "num_samples": 3 },
        "constraints": [{ "column": "x", "type": "distribution", "params": { "std": -1.0 } }]
      }),
      json!([{ "x": 1 }, { "x": 2 }]),
    )
    .await;

    assert_eq!(artifact.as_status().unwrap().status, Status::Error);
  }

  #[tokio::test]
  async fn test_model_based_kinds_are_not_implemented() {
    let artifact = generate(
      json!({ "type": "ctgan", "parameters": { "num_samples": 10, "epochs": 5 } }),
      json!([{ "x": 1 }]),
    )
    .await;

    let status = artifact.as_status().unwrap();
    assert_eq!(status.status, Status::NotImplemented);
    assert_eq!(status.message, "ctgan generator not yet implemented");
  }
}
