use std::collections::{HashMap, HashSet};

use synthflow_config::Edge;

use crate::Node;

/// Graph structure for traversal and analysis.
///
/// Only edges whose endpoints are both declared nodes take part; neighbour
/// lists keep edge declaration order.
#[derive(Debug, Clone)]
pub struct Graph {
  /// Reverse adjacency: node_id -> list of upstream node_ids.
  reverse_adjacency: HashMap<String, Vec<String>>,
  /// Nodes with multiple incoming edges.
  join_points: HashSet<String>,
}

impl Graph {
  /// Build a graph from nodes and edges.
  pub fn new(nodes: &[Node], edges: &[Edge]) -> Self {
    let mut reverse_adjacency: HashMap<String, Vec<String>> = nodes
      .iter()
      .map(|node| (node.id.clone(), Vec::new()))
      .collect();

    for edge in edges {
      if !reverse_adjacency.contains_key(&edge.source) {
        continue;
      }
      if let Some(incoming) = reverse_adjacency.get_mut(&edge.target) {
        incoming.push(edge.source.clone());
      }
    }

    let join_points: HashSet<String> = reverse_adjacency
      .iter()
      .filter(|(_, incoming)| incoming.len() > 1)
      .map(|(id, _)| id.clone())
      .collect();

    Self {
      reverse_adjacency,
      join_points,
    }
  }

  /// Get upstream nodes for a given node.
  pub fn upstream(&self, node_id: &str) -> &[String] {
    self
      .reverse_adjacency
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Check if a node has multiple incoming edges.
  pub fn is_join_point(&self, node_id: &str) -> bool {
    self.join_points.contains(node_id)
  }
}
