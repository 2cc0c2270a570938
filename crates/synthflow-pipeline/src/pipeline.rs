use std::collections::HashSet;

use serde::Serialize;
use synthflow_config::{Edge, GraphDef, NodeConfig, NodeDef, NodeKind};

use crate::error::PipelineError;
use crate::graph::Graph;
use crate::node::Node;
use crate::schedule::{self, Schedule};

/// A resolved pipeline ready for scheduling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pipeline {
  pub id: Option<String>,
  pub name: String,
  pub description: Option<String>,
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
}

impl Pipeline {
  /// Resolve a submitted graph definition.
  ///
  /// This process:
  /// 1. Rejects duplicate node ids
  /// 2. Parses every node's configuration strictly as the variant its type names
  /// 3. Rejects consumer nodes fed by more than one declared producer
  ///
  /// Cycles and dangling edges are left to [`Pipeline::schedule`].
  pub fn resolve(def: GraphDef) -> Result<Self, PipelineError> {
    let mut node_ids = HashSet::new();
    for node in &def.nodes {
      if !node_ids.insert(node.id.as_str()) {
        return Err(PipelineError::DuplicateNodeId {
          node_id: node.id.clone(),
        });
      }
    }

    let nodes = def
      .nodes
      .iter()
      .map(resolve_node)
      .collect::<Result<Vec<_>, _>>()?;

    let pipeline = Self {
      id: def.id,
      name: def.name,
      description: def.description,
      nodes,
      edges: def.edges,
    };
    pipeline.validate_inputs()?;

    Ok(pipeline)
  }

  /// Build the graph structure for traversal.
  pub fn graph(&self) -> Graph {
    Graph::new(&self.nodes, &self.edges)
  }

  /// Compute the execution order.
  pub fn schedule(&self) -> Result<Schedule, PipelineError> {
    schedule::schedule(&self.nodes, &self.edges)
  }

  /// Get a node by ID.
  pub fn get_node(&self, node_id: &str) -> Option<&Node> {
    self.nodes.iter().find(|n| n.id == node_id)
  }

  /// Ids of the producers feeding `node_id`, in edge declaration order.
  pub fn upstream_of<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a str> {
    self
      .edges
      .iter()
      .filter(move |e| e.target == node_id)
      .map(|e| e.source.as_str())
  }

  fn validate_inputs(&self) -> Result<(), PipelineError> {
    let graph = self.graph();
    for node in &self.nodes {
      if node.kind == NodeKind::Source || !graph.is_join_point(&node.id) {
        continue;
      }
      return Err(PipelineError::TooManyInputs {
        node_id: node.id.clone(),
        count: graph.upstream(&node.id).len(),
      });
    }
    Ok(())
  }
}

fn resolve_node(def: &NodeDef) -> Result<Node, PipelineError> {
  let mismatch = |message: String| PipelineError::ConfigMismatch {
    node_id: def.id.clone(),
    message,
  };

  let kind: NodeKind = def.node_type.parse().map_err(|e| mismatch(format!("{}", e)))?;
  let config =
    NodeConfig::parse(kind, def.data.config.as_ref()).map_err(|e| mismatch(e.to_string()))?;

  Ok(Node {
    id: def.id.clone(),
    kind,
    label: def.data.label.clone(),
    config,
  })
}
