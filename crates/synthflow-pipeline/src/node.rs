use serde::Serialize;
use synthflow_config::{NodeConfig, NodeKind};

/// A resolved pipeline node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
  pub id: String,
  pub kind: NodeKind,
  pub label: String,
  pub config: NodeConfig,
}

impl Node {
  /// Build a node whose kind is taken from its configuration.
  pub fn new(id: impl Into<String>, config: NodeConfig) -> Self {
    let id = id.into();
    Self {
      label: id.clone(),
      kind: config.kind(),
      id,
      config,
    }
  }

  /// Whether the configuration variant agrees with the declared kind.
  pub fn config_matches_kind(&self) -> bool {
    self.config.kind() == self.kind
  }
}
