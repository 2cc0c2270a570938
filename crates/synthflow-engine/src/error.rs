//! Error types for pipeline runs.

use std::time::Duration;

use synthflow_executor::ExecutorError;
use synthflow_pipeline::PipelineError;
use thiserror::Error;

use crate::result::FailureClass;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum EngineError {
  /// Resolution or scheduling rejected the pipeline before any node ran.
  #[error(transparent)]
  Pipeline(#[from] PipelineError),

  /// A node's executor failed in a way it could not encode in its output.
  #[error("execution failed for node '{node_id}': {source}")]
  Execution {
    node_id: String,
    #[source]
    source: ExecutorError,
  },

  /// The run deadline passed while a node was executing.
  #[error("run deadline of {}ms exceeded at node '{node_id}'", timeout.as_millis())]
  Timeout { node_id: String, timeout: Duration },

  /// The run was cancelled.
  #[error("pipeline run cancelled")]
  Cancelled,
}

impl EngineError {
  pub fn class(&self) -> FailureClass {
    match self {
      EngineError::Pipeline(PipelineError::Cycle { .. }) => FailureClass::Cycle,
      EngineError::Pipeline(PipelineError::ConfigMismatch { .. }) => FailureClass::ConfigMismatch,
      EngineError::Pipeline(
        PipelineError::DuplicateNodeId { .. } | PipelineError::TooManyInputs { .. },
      ) => FailureClass::InvalidGraph,
      EngineError::Execution { .. } | EngineError::Timeout { .. } | EngineError::Cancelled => {
        FailureClass::ExecutionError
      }
    }
  }

  /// The node the failure is attributed to, if any.
  pub fn node_id(&self) -> Option<&str> {
    match self {
      EngineError::Pipeline(e) => e.node_id(),
      EngineError::Execution { node_id, .. } | EngineError::Timeout { node_id, .. } => Some(node_id),
      EngineError::Cancelled => None,
    }
  }
}
