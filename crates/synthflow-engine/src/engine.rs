//! Pipeline execution engine.
//!
//! The `PipelineEngine` resolves a submitted graph, orders it, and runs each
//! node to completion before starting the next.

use std::time::Duration;

use synthflow_config::GraphDef;
use synthflow_executor::{Artifact, ExecutionContext, ExecutorRegistry};
use synthflow_pipeline::{Node, Pipeline, PipelineError, Schedule};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{Span, error, info, instrument};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{ExecutionEvent, ExecutionNotifier, NoopNotifier};
use crate::result::RunReport;

/// The pipeline execution engine.
///
/// Generic over `N: ExecutionNotifier` to allow different notification strategies.
/// Use `PipelineEngine::new()` for an engine with no-op notifications, or
/// `PipelineEngine::with_notifier()` to provide a custom notifier.
pub struct PipelineEngine<N: ExecutionNotifier = NoopNotifier> {
  registry: ExecutorRegistry,
  config: EngineConfig,
  notifier: N,
}

impl PipelineEngine<NoopNotifier> {
  /// Create an engine with the built-in executors and no-op notifications.
  pub fn new(config: EngineConfig) -> Self {
    Self::with_notifier(config, NoopNotifier)
  }
}

/// A run deadline: when it passes, and the budget it was derived from.
#[derive(Debug, Clone, Copy)]
struct Deadline {
  at: Instant,
  budget: Duration,
}

impl<N: ExecutionNotifier> PipelineEngine<N> {
  /// Create an engine with the built-in executors and a custom notifier.
  pub fn with_notifier(config: EngineConfig, notifier: N) -> Self {
    Self {
      registry: ExecutorRegistry::standard(config.base_dir.clone()),
      config,
      notifier,
    }
  }

  /// Replace the executor registry.
  pub fn with_registry(mut self, registry: ExecutorRegistry) -> Self {
    self.registry = registry;
    self
  }

  pub fn registry_mut(&mut self) -> &mut ExecutorRegistry {
    &mut self.registry
  }

  /// Resolve and order a graph without executing anything.
  pub fn plan(&self, def: GraphDef) -> Result<Schedule, EngineError> {
    let pipeline = Pipeline::resolve(def)?;
    Ok(pipeline.schedule()?)
  }

  /// Resolve a submitted graph and run it.
  pub async fn execute(&self, def: GraphDef, cancel: CancellationToken) -> Result<RunReport, EngineError> {
    let pipeline = Pipeline::resolve(def)?;
    self.execute_pipeline(&pipeline, cancel).await
  }

  /// Run a resolved pipeline.
  ///
  /// Every run gets a fresh context, so repeated runs of the same pipeline are
  /// independent. On failure the partial context is dropped.
  #[instrument(name = "pipeline_run", skip_all, fields(pipeline = %pipeline.name, run_id = tracing::field::Empty))]
  pub async fn execute_pipeline(
    &self,
    pipeline: &Pipeline,
    cancel: CancellationToken,
  ) -> Result<RunReport, EngineError> {
    let run_id = uuid::Uuid::new_v4().to_string();
    Span::current().record("run_id", run_id.as_str());

    // No node runs unless the whole graph can be ordered
    let schedule = pipeline.schedule()?;

    self.notifier.notify(ExecutionEvent::RunStarted {
      run_id: run_id.clone(),
      pipeline_name: pipeline.name.clone(),
      execution_order: schedule.order.clone(),
    });
    info!(
      nodes = schedule.order.len(),
      warnings = schedule.warnings.len(),
      "run_started"
    );

    let deadline = self.config.timeout.map(|budget| Deadline {
      at: Instant::now() + budget,
      budget,
    });
    let result = self
      .run_schedule(pipeline, &schedule, &run_id, deadline, &cancel)
      .await;

    match &result {
      Ok(_) => {
        info!("run_completed");
        self.notifier.notify(ExecutionEvent::RunCompleted {
          run_id: run_id.clone(),
        });
      }
      Err(e) => {
        error!(error = %e, node_id = e.node_id(), "run_failed");
        self.notifier.notify(ExecutionEvent::RunFailed {
          run_id: run_id.clone(),
          error: e.to_string(),
        });
      }
    }

    let context = result?;
    Ok(RunReport {
      run_id,
      pipeline_id: pipeline.id.clone(),
      pipeline_name: pipeline.name.clone(),
      execution_order: schedule.order,
      results: context.into_entries(),
      warnings: schedule.warnings,
    })
  }

  /// Run every scheduled node in order, stopping at the first fatal error.
  async fn run_schedule(
    &self,
    pipeline: &Pipeline,
    schedule: &Schedule,
    run_id: &str,
    deadline: Option<Deadline>,
    cancel: &CancellationToken,
  ) -> Result<ExecutionContext, EngineError> {
    let mut context = ExecutionContext::new();

    for node_id in &schedule.order {
      if cancel.is_cancelled() {
        return Err(EngineError::Cancelled);
      }

      let Some(node) = pipeline.get_node(node_id) else {
        continue;
      };

      self.notifier.notify(ExecutionEvent::NodeStarted {
        run_id: run_id.to_string(),
        node_id: node_id.clone(),
        kind: node.kind,
      });

      let outcome = self
        .run_node(node, pipeline, &context, deadline, cancel)
        .await
        .and_then(|artifact| {
          let summary = artifact.summary();
          context
            .insert(node_id.clone(), artifact)
            .map_err(|source| EngineError::Execution {
              node_id: node_id.clone(),
              source,
            })?;
          Ok(summary)
        });

      match outcome {
        Ok(summary) => {
          info!(node_id = %node_id, kind = %node.kind, summary = %summary, "node_completed");
          self.notifier.notify(ExecutionEvent::NodeCompleted {
            run_id: run_id.to_string(),
            node_id: node_id.clone(),
            summary,
          });
        }
        Err(e) => {
          self.notifier.notify(ExecutionEvent::NodeFailed {
            run_id: run_id.to_string(),
            node_id: node_id.clone(),
            error: e.to_string(),
          });
          return Err(e);
        }
      }
    }

    Ok(context)
  }

  /// Dispatch one node to the executor registered for its kind.
  async fn run_node(
    &self,
    node: &Node,
    pipeline: &Pipeline,
    context: &ExecutionContext,
    deadline: Option<Deadline>,
    cancel: &CancellationToken,
  ) -> Result<Artifact, EngineError> {
    if !node.config_matches_kind() {
      return Err(
        PipelineError::ConfigMismatch {
          node_id: node.id.clone(),
          message: format!(
            "declared {} but configured as {}",
            node.kind,
            node.config.kind()
          ),
        }
        .into(),
      );
    }

    let executor = self
      .registry
      .get(node.kind)
      .map_err(|source| EngineError::Execution {
        node_id: node.id.clone(),
        source,
      })?;

    let expired = async {
      match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.at).await,
        None => std::future::pending().await,
      }
    };

    tokio::select! {
      biased;
      _ = cancel.cancelled() => Err(EngineError::Cancelled),
      _ = expired => Err(EngineError::Timeout {
        node_id: node.id.clone(),
        timeout: deadline.map(|d| d.budget).unwrap_or_default(),
      }),
      outcome = executor.execute(node, pipeline, context) => {
        outcome.map_err(|source| EngineError::Execution {
          node_id: node.id.clone(),
          source,
        })
      }
    }
  }
}
