//! Topological scheduling.
//!
//! Kahn's algorithm seeded in node declaration order, so identical input
//! always yields the identical order.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use serde::Serialize;
use synthflow_config::Edge;
use tracing::warn;

use crate::error::PipelineError;
use crate::node::Node;

/// An edge that references a node id not present in the pipeline.
///
/// Such edges are excluded from scheduling but do not abort it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingEdge {
  pub edge_id: String,
  pub source: String,
  pub target: String,
}

impl fmt::Display for DanglingEdge {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "edge '{}' ({} -> {}) references an unknown node",
      self.edge_id, self.source, self.target
    )
  }
}

/// A linear execution order plus the warnings raised while computing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
  pub order: Vec<String>,
  pub warnings: Vec<DanglingEdge>,
}

/// Order `nodes` so that every edge's source precedes its target.
pub fn schedule(nodes: &[Node], edges: &[Edge]) -> Result<Schedule, PipelineError> {
  let declared: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
  let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
  let mut in_degree: HashMap<&str, usize> = nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
  let mut warnings = Vec::new();

  for edge in edges {
    if !declared.contains(edge.source.as_str()) || !declared.contains(edge.target.as_str()) {
      let dangling = DanglingEdge {
        edge_id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
      };
      warn!(edge_id = %edge.id, source = %edge.source, target = %edge.target, "dangling_edge");
      warnings.push(dangling);
      continue;
    }
    successors
      .entry(edge.source.as_str())
      .or_default()
      .push(edge.target.as_str());
    *in_degree.entry(edge.target.as_str()).or_default() += 1;
  }

  let mut queue: VecDeque<&str> = nodes
    .iter()
    .map(|n| n.id.as_str())
    .filter(|id| in_degree.get(id) == Some(&0))
    .collect();
  let mut order = Vec::with_capacity(nodes.len());

  while let Some(current) = queue.pop_front() {
    order.push(current.to_string());
    for &next in successors.get(current).map(Vec::as_slice).unwrap_or(&[]) {
      if let Some(degree) = in_degree.get_mut(next) {
        *degree -= 1;
        if *degree == 0 {
          queue.push_back(next);
        }
      }
    }
  }

  if order.len() < nodes.len() {
    return Err(PipelineError::Cycle {
      unscheduled: nodes.len() - order.len(),
    });
  }

  Ok(Schedule { order, warnings })
}
