use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("duplicate node id: {node_id}")]
  DuplicateNodeId { node_id: String },

  /// The node's configuration does not match its declared type.
  #[error("configuration mismatch for node '{node_id}': {message}")]
  ConfigMismatch { node_id: String, message: String },

  #[error("node '{node_id}' has {count} upstream inputs, at most one is supported")]
  TooManyInputs { node_id: String, count: usize },

  #[error("pipeline contains a cycle: {unscheduled} node(s) could not be ordered")]
  Cycle { unscheduled: usize },
}

impl PipelineError {
  /// The node this error is attributed to, if any.
  pub fn node_id(&self) -> Option<&str> {
    match self {
      PipelineError::DuplicateNodeId { node_id }
      | PipelineError::ConfigMismatch { node_id, .. }
      | PipelineError::TooManyInputs { node_id, .. } => Some(node_id),
      PipelineError::Cycle { .. } => None,
    }
  }
}
