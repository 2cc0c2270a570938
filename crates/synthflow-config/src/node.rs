use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evaluator::EvaluatorConfig;
use crate::exporter::ExporterConfig;
use crate::generator::GeneratorConfig;
use crate::source::SourceConfig;

/// A node as it appears in a submitted graph.
///
/// The type tag is kept as a string so that an unknown tag can be reported
/// against the node that carries it instead of failing the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
  pub id: String,
  #[serde(rename = "type")]
  pub node_type: String,
  /// Presentation only; the engine never reads it.
  #[serde(default)]
  pub position: Position,
  #[serde(default)]
  pub data: NodeData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
  #[serde(default)]
  pub label: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub config: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

/// The stage a node performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
  Source,
  Generator,
  Evaluator,
  Exporter,
}

impl NodeKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      NodeKind::Source => "source",
      NodeKind::Generator => "generator",
      NodeKind::Evaluator => "evaluator",
      NodeKind::Exporter => "exporter",
    }
  }
}

impl fmt::Display for NodeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown node type '{0}'")]
pub struct UnknownNodeKind(pub String);

impl FromStr for NodeKind {
  type Err = UnknownNodeKind;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "source" => Ok(NodeKind::Source),
      "generator" => Ok(NodeKind::Generator),
      "evaluator" => Ok(NodeKind::Evaluator),
      "exporter" => Ok(NodeKind::Exporter),
      other => Err(UnknownNodeKind(other.to_string())),
    }
  }
}

/// Errors raised while parsing a node's configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error(transparent)]
  UnknownKind(#[from] UnknownNodeKind),

  #[error("invalid {kind} configuration: {source}")]
  Invalid {
    kind: NodeKind,
    #[source]
    source: serde_json::Error,
  },
}

/// Typed node configuration. The variant is fully determined by the node's kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeConfig {
  Source(SourceConfig),
  Generator(GeneratorConfig),
  Evaluator(EvaluatorConfig),
  Exporter(ExporterConfig),
}

impl NodeConfig {
  /// Parse raw configuration as the variant required by `kind`.
  ///
  /// A missing configuration is parsed as an empty object, so only variants
  /// whose fields are all optional accept it.
  pub fn parse(kind: NodeKind, raw: Option<&serde_json::Value>) -> Result<Self, ConfigError> {
    let value = raw
      .cloned()
      .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
    let invalid = |source| ConfigError::Invalid { kind, source };

    let config = match kind {
      NodeKind::Source => NodeConfig::Source(serde_json::from_value(value).map_err(invalid)?),
      NodeKind::Generator => NodeConfig::Generator(serde_json::from_value(value).map_err(invalid)?),
      NodeKind::Evaluator => NodeConfig::Evaluator(serde_json::from_value(value).map_err(invalid)?),
      NodeKind::Exporter => NodeConfig::Exporter(serde_json::from_value(value).map_err(invalid)?),
    };
    Ok(config)
  }

  /// The node kind this configuration belongs to.
  pub fn kind(&self) -> NodeKind {
    match self {
      NodeConfig::Source(_) => NodeKind::Source,
      NodeConfig::Generator(_) => NodeKind::Generator,
      NodeConfig::Evaluator(_) => NodeKind::Evaluator,
      NodeConfig::Exporter(_) => NodeKind::Exporter,
    }
  }
}
