use std::collections::HashMap;

use synthflow_pipeline::Pipeline;

use crate::artifact::Artifact;
use crate::error::ExecutorError;

/// Per-run store of node outputs, keyed by node id.
///
/// Each key is written at most once. A fresh context is created for every run,
/// so nothing leaks between runs of the same pipeline.
#[derive(Debug, Default)]
pub struct ExecutionContext {
  entries: HashMap<String, Artifact>,
}

impl ExecutionContext {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a node's output. Fails if the node already has one.
  pub fn insert(&mut self, node_id: impl Into<String>, artifact: Artifact) -> Result<(), ExecutorError> {
    let node_id = node_id.into();
    if self.entries.contains_key(&node_id) {
      return Err(ExecutorError::DuplicateEntry { node_id });
    }
    self.entries.insert(node_id, artifact);
    Ok(())
  }

  pub fn get(&self, node_id: &str) -> Option<&Artifact> {
    self.entries.get(node_id)
  }

  /// The input a node reads: the entry of its first declared upstream that has one.
  pub fn input_for<'a>(&'a self, pipeline: &'a Pipeline, node_id: &'a str) -> Option<(&'a str, &'a Artifact)> {
    pipeline
      .upstream_of(node_id)
      .find_map(|upstream| self.get(upstream).map(|artifact| (upstream, artifact)))
  }

  pub fn into_entries(self) -> HashMap<String, Artifact> {
    self.entries
  }
}
