//! Fixtures shared by the executor unit tests.

use serde_json::{Value, json};
use synthflow_config::GraphDef;
use synthflow_pipeline::{Node, Pipeline};

use crate::artifact::{Artifact, Record};
use crate::context::ExecutionContext;

pub(crate) fn node(id: &str, kind: &str, config: Value) -> Value {
  json!({ "id": id, "type": kind, "data": { "label": id, "config": config } })
}

pub(crate) fn edge(source: &str, target: &str) -> Value {
  json!({ "id": format!("{source}-{target}"), "source": source, "target": target })
}

pub(crate) fn pipeline(nodes: Vec<Value>, edges: Vec<Value>) -> Pipeline {
  let def: GraphDef = serde_json::from_value(json!({
    "name": "test",
    "nodes": nodes,
    "edges": edges,
  }))
  .unwrap();
  Pipeline::resolve(def).unwrap()
}

/// A csv source `src` feeding `target`, which is configured by `config`.
pub(crate) fn fed_by_source(target_kind: &str, config: Value) -> (Pipeline, Node) {
  let pipeline = pipeline(
    vec![
      node("src", "source", json!({ "type": "csv", "connection": {} })),
      node("target", target_kind, config),
    ],
    vec![edge("src", "target")],
  );
  let node = pipeline.get_node("target").unwrap().clone();
  (pipeline, node)
}

pub(crate) fn records(value: Value) -> Vec<Record> {
  serde_json::from_value(value).unwrap()
}

pub(crate) fn context_with(node_id: &str, artifact: Artifact) -> ExecutionContext {
  let mut context = ExecutionContext::new();
  context.insert(node_id, artifact).unwrap();
  context
}
