//! Error types for node execution.

use synthflow_config::NodeKind;
use thiserror::Error;

/// Errors that can occur while executing a single node.
#[derive(Debug, Error)]
pub enum ExecutorError {
  /// The executor was handed a node configured for another kind.
  #[error("expected {expected} configuration, found {found}")]
  UnexpectedConfig { expected: NodeKind, found: NodeKind },

  /// No executor is registered for the node's kind.
  #[error("no executor registered for node type '{kind}'")]
  Unsupported { kind: NodeKind },

  /// A second artifact was written for the same node.
  #[error("context already holds an entry for node '{node_id}'")]
  DuplicateEntry { node_id: String },

  #[error("csv source has neither a path nor inline content")]
  MissingInput,

  #[error("invalid delimiter '{0}': expected a single ASCII character")]
  InvalidDelimiter(String),

  #[error("unsupported encoding '{0}'")]
  UnsupportedEncoding(String),

  #[error("content is not valid {encoding}")]
  Decode { encoding: &'static str },

  #[error("content cannot be represented in {encoding}")]
  Unmappable { encoding: &'static str },

  #[error("invalid generator parameter: {0}")]
  InvalidParameter(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}
