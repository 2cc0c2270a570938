//! Execution events and notifiers for observability.
//!
//! Events are emitted during a pipeline run so that consumers can follow
//! progress, persist state or stream it to a UI.

use serde::{Deserialize, Serialize};
use synthflow_config::NodeKind;
use tokio::sync::mpsc;

/// Events emitted during a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionEvent {
  /// The pipeline resolved and scheduled; nodes are about to run.
  RunStarted {
    run_id: String,
    pipeline_name: String,
    execution_order: Vec<String>,
  },

  NodeStarted {
    run_id: String,
    node_id: String,
    kind: NodeKind,
  },

  /// A node produced its output. `summary` describes the artifact.
  NodeCompleted {
    run_id: String,
    node_id: String,
    summary: String,
  },

  NodeFailed {
    run_id: String,
    node_id: String,
    error: String,
  },

  RunCompleted { run_id: String },

  RunFailed { run_id: String, error: String },
}

/// Trait for receiving execution events.
///
/// The engine calls `notify` for each event; implementations decide what to
/// do with them.
pub trait ExecutionNotifier: Send + Sync {
  fn notify(&self, event: ExecutionEvent);
}

/// Discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ExecutionNotifier for NoopNotifier {
  fn notify(&self, _event: ExecutionEvent) {}
}

/// Sends every run and node event to an unbounded channel.
///
/// Use this to follow a run from another task, e.g. to stream progress to a
/// caller or record it elsewhere.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<ExecutionEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<ExecutionEvent>) -> Self {
    Self { sender }
  }
}

impl ExecutionNotifier for ChannelNotifier {
  fn notify(&self, event: ExecutionEvent) {
    // Receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
