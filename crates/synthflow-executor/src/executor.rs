use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use synthflow_config::NodeKind;
use synthflow_pipeline::{Node, Pipeline};

use crate::artifact::Artifact;
use crate::context::ExecutionContext;
use crate::error::ExecutorError;
use crate::{EvaluatorExecutor, ExporterExecutor, GeneratorExecutor, SourceExecutor};

/// Executes nodes of one kind.
///
/// Implementations read their inputs from `context` (see
/// [`ExecutionContext::input_for`]) and return the node's single output. They
/// never write to the context themselves.
#[async_trait]
pub trait NodeExecutor: Send + Sync {
  async fn execute(
    &self,
    node: &Node,
    pipeline: &Pipeline,
    context: &ExecutionContext,
  ) -> Result<Artifact, ExecutorError>;
}

/// Maps node kinds to their executors.
#[derive(Clone, Default)]
pub struct ExecutorRegistry {
  executors: HashMap<NodeKind, Arc<dyn NodeExecutor>>,
}

impl ExecutorRegistry {
  /// An empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// The built-in executors. Relative file paths resolve against `base_dir`.
  pub fn standard(base_dir: impl Into<PathBuf>) -> Self {
    let base_dir = base_dir.into();
    let mut registry = Self::new();
    registry.register(NodeKind::Source, SourceExecutor::new(base_dir.clone()));
    registry.register(NodeKind::Generator, GeneratorExecutor::new());
    registry.register(NodeKind::Evaluator, EvaluatorExecutor::new());
    registry.register(NodeKind::Exporter, ExporterExecutor::new(base_dir));
    registry
  }

  /// Register an executor, returning the one it replaces.
  pub fn register(
    &mut self,
    kind: NodeKind,
    executor: impl NodeExecutor + 'static,
  ) -> Option<Arc<dyn NodeExecutor>> {
    self.executors.insert(kind, Arc::new(executor))
  }

  pub fn get(&self, kind: NodeKind) -> Result<Arc<dyn NodeExecutor>, ExecutorError> {
    self
      .executors
      .get(&kind)
      .cloned()
      .ok_or(ExecutorError::Unsupported { kind })
  }
}

impl std::fmt::Debug for ExecutorRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ExecutorRegistry")
      .field("kinds", &self.executors.keys().collect::<Vec<_>>())
      .finish()
  }
}
