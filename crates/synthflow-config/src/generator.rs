use serde::{Deserialize, Serialize};

use crate::schema::TableSchema;
use crate::validation::ValidationSpec;

/// Synthesis method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
  Ctgan,
  Tvae,
  Copulagan,
  Gaussian,
  Uniform,
  Custom,
}

impl GeneratorKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      GeneratorKind::Ctgan => "ctgan",
      GeneratorKind::Tvae => "tvae",
      GeneratorKind::Copulagan => "copulagan",
      GeneratorKind::Gaussian => "gaussian",
      GeneratorKind::Uniform => "uniform",
      GeneratorKind::Custom => "custom",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
  #[serde(rename = "type")]
  pub kind: GeneratorKind,
  pub parameters: GeneratorParameters,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub constraints: Option<Vec<Constraint>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data_quality: Option<GeneratorDataQuality>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub output_format: Option<OutputFormat>,
}

impl GeneratorConfig {
  /// Constraints declared for `column`, in declaration order.
  pub fn constraints_for<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Constraint> {
    self
      .constraints
      .iter()
      .flatten()
      .filter(move |c| c.column == column)
  }
}

/// Generation parameters. Model-shape fields only apply to the methods named
/// in their comments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorParameters {
  /// Defaults to the upstream row count.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub num_samples: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub batch_size: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub epochs: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub learning_rate: Option<f64>,
  /// CTGAN
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub embedding_dim: Option<u32>,
  /// CTGAN
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub generator_dim: Option<Vec<u32>>,
  /// CTGAN
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub discriminator_dim: Option<Vec<u32>>,
  /// TVAE
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub compress_dims: Option<Vec<u32>>,
  /// TVAE
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub decompress_dims: Option<Vec<u32>>,
  /// CopulaGAN
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub n_clusters: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub custom_script: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub custom_requirements: Option<Vec<String>>,
  /// Fixes the random stream so repeated runs produce identical samples.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
  Range,
  Distribution,
  Correlation,
  Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionKind {
  Normal,
  Uniform,
  Exponential,
  Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationType {
  Pearson,
  Spearman,
  Kendall,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintParams {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub distribution: Option<DistributionKind>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub mean: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub std: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub correlated_with: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub correlation_type: Option<CorrelationType>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub correlation_value: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub custom_rule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Constraint {
  pub column: String,
  #[serde(rename = "type")]
  pub kind: ConstraintKind,
  #[serde(default)]
  pub params: ConstraintParams,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrivacyConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub anonymization: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub k_anonymity: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub l_diversity: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub t_closeness: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorDataQuality {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub privacy: Option<PrivacyConfig>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub validation: Option<ValidationSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputFormat {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schema: Option<TableSchema>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_constraints_for_column() {
    let config: GeneratorConfig = serde_json::from_value(json!({
      "type": "gaussian",
      "parameters": { "num_samples": 5, "seed": 7 },
      "constraints": [
        { "column": "age", "type": "range", "params": { "min": 0, "max": 120 } },
        { "column": "income", "type": "distribution", "params": { "distribution": "normal", "mean": 50000 } },
        { "column": "age", "type": "custom", "params": { "custom_rule": "age % 1 == 0" } }
      ]
    }))
    .unwrap();

    assert_eq!(config.parameters.num_samples, Some(5));
    assert_eq!(config.parameters.seed, Some(7));
    let kinds: Vec<ConstraintKind> = config.constraints_for("age").map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ConstraintKind::Range, ConstraintKind::Custom]);
  }

  #[test]
  fn test_num_samples_optional() {
    let config: GeneratorConfig =
      serde_json::from_value(json!({ "type": "uniform", "parameters": {} })).unwrap();
    assert_eq!(config.parameters.num_samples, None);
  }
}
