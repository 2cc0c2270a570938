//! Run outcomes.

use std::collections::HashMap;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use synthflow_executor::Artifact;
use synthflow_pipeline::DanglingEdge;

use crate::error::EngineError;

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
  pub run_id: String,
  pub pipeline_id: Option<String>,
  pub pipeline_name: String,
  pub execution_order: Vec<String>,
  /// Output of every executed node, keyed by node id.
  pub results: HashMap<String, Artifact>,
  pub warnings: Vec<DanglingEdge>,
}

impl RunReport {
  pub fn result(&self, node_id: &str) -> Option<&Artifact> {
    self.results.get(node_id)
  }
}

/// Results serialize in execution order.
struct OrderedResults<'a> {
  order: &'a [String],
  results: &'a HashMap<String, Artifact>,
}

impl Serialize for OrderedResults<'_> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.results.len()))?;
    for node_id in self.order {
      if let Some(artifact) = self.results.get(node_id) {
        map.serialize_entry(node_id, artifact)?;
      }
    }
    map.end()
  }
}

impl Serialize for RunReport {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("RunReport", 6)?;
    state.serialize_field("run_id", &self.run_id)?;
    state.serialize_field("pipeline_id", &self.pipeline_id)?;
    state.serialize_field("pipeline_name", &self.pipeline_name)?;
    state.serialize_field("execution_order", &self.execution_order)?;
    state.serialize_field(
      "results",
      &OrderedResults {
        order: &self.execution_order,
        results: &self.results,
      },
    )?;
    state.serialize_field("warnings", &self.warnings)?;
    state.end()
  }
}

/// Failure classes reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureClass {
  Cycle,
  ConfigMismatch,
  InvalidGraph,
  ExecutionError,
}

/// A fatal run outcome in reportable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunFailure {
  pub class: FailureClass,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub node_id: Option<String>,
  pub message: String,
}

impl From<&EngineError> for RunFailure {
  fn from(error: &EngineError) -> Self {
    Self {
      class: error.class(),
      node_id: error.node_id().map(str::to_string),
      message: error.to_string(),
    }
  }
}
