//! End-to-end tests for the pipeline engine.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use synthflow_config::{EvaluatorConfig, GraphDef, NodeConfig, NodeKind};
use synthflow_engine::{
  Artifact, ChannelNotifier, EngineConfig, EngineError, ExecutionEvent, ExecutorRegistry,
  FailureClass, NodeExecutor, PipelineEngine, RunFailure, Status,
};
use synthflow_executor::{ExecutionContext, ExecutorError};
use synthflow_pipeline::{Node, Pipeline};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn graph(value: Value) -> GraphDef {
  serde_json::from_value(value).unwrap()
}

fn node(id: &str, kind: &str, config: Value) -> Value {
  json!({ "id": id, "type": kind, "position": { "x": 0, "y": 0 }, "data": { "label": id, "config": config } })
}

fn edge(id: &str, source: &str, target: &str) -> Value {
  json!({ "id": id, "source": source, "target": target })
}

fn csv_source(id: &str, content: &str) -> Value {
  node(
    id,
    "source",
    json!({ "type": "csv", "connection": { "fileContent": content } }),
  )
}

/// source(x = 1,2,3) → gaussian(100 samples) → evaluator(mean, std)
fn synthesis_graph() -> GraphDef {
  graph(json!({
    "id": "p-1",
    "name": "synthesis",
    "nodes": [
      node("evaluator", "evaluator", json!({ "metrics": ["mean", "std"] })),
      node("generator", "generator", json!({
        "type": "gaussian",
        "parameters": { "num_samples": 100, "seed": 42 }
      })),
      csv_source("source", "x\n1\n2\n3\n"),
    ],
    "edges": [
      edge("e1", "source", "generator"),
      edge("e2", "generator", "evaluator"),
    ]
  }))
}

fn drain(rx: &mut mpsc::UnboundedReceiver<ExecutionEvent>) -> Vec<ExecutionEvent> {
  let mut events = Vec::new();
  while let Ok(event) = rx.try_recv() {
    events.push(event);
  }
  events
}

/// Sleeps long enough for deadlines and cancellation to win.
struct SlowExecutor;

#[async_trait]
impl NodeExecutor for SlowExecutor {
  async fn execute(
    &self,
    _node: &Node,
    _pipeline: &Pipeline,
    _context: &ExecutionContext,
  ) -> Result<Artifact, ExecutorError> {
    tokio::time::sleep(Duration::from_secs(30)).await;
    Ok(Artifact::Records(vec![]))
  }
}

fn slow_engine(config: EngineConfig) -> PipelineEngine {
  let mut engine = PipelineEngine::new(config);
  engine.registry_mut().register(NodeKind::Evaluator, SlowExecutor);
  engine
}

#[tokio::test]
async fn test_source_generator_evaluator() {
  let engine = PipelineEngine::new(EngineConfig::default());
  let report = engine
    .execute(synthesis_graph(), CancellationToken::new())
    .await
    .unwrap();

  assert_eq!(report.execution_order, vec!["source", "generator", "evaluator"]);
  assert_eq!(report.pipeline_id.as_deref(), Some("p-1"));
  assert_eq!(report.pipeline_name, "synthesis");
  assert!(report.warnings.is_empty());

  let generated = report.result("generator").unwrap().as_records().unwrap();
  assert_eq!(generated.len(), 100);

  let evaluation = report.result("evaluator").unwrap().as_report().unwrap();
  let mean = evaluation.metric("x", "mean").unwrap().as_f64().unwrap();
  assert!((mean - 2.0).abs() < 0.5, "mean {mean} too far from 2");
  assert!(evaluation.metric("x", "std").unwrap().is_number());
}

#[tokio::test]
async fn test_repeated_runs_are_independent() {
  let engine = PipelineEngine::new(EngineConfig::default());
  let first = engine
    .execute(synthesis_graph(), CancellationToken::new())
    .await
    .unwrap();
  let second = engine
    .execute(synthesis_graph(), CancellationToken::new())
    .await
    .unwrap();

  assert_ne!(first.run_id, second.run_id);
  assert_eq!(first.execution_order, second.execution_order);
  assert_eq!(first.result("source"), second.result("source"));
  assert_eq!(first.result("generator"), second.result("generator"));
  assert_eq!(first.result("evaluator"), second.result("evaluator"));
}

#[tokio::test]
async fn test_events_follow_execution() {
  let (tx, mut rx) = mpsc::unbounded_channel();
  let engine = PipelineEngine::with_notifier(EngineConfig::default(), ChannelNotifier::new(tx));
  let report = engine
    .execute(synthesis_graph(), CancellationToken::new())
    .await
    .unwrap();

  let events = drain(&mut rx);
  assert_eq!(events.len(), 8);
  assert!(matches!(
    &events[0],
    ExecutionEvent::RunStarted { run_id, execution_order, .. }
      if *run_id == report.run_id && execution_order.len() == 3
  ));
  assert!(matches!(
    &events[1],
    ExecutionEvent::NodeStarted { node_id, kind: NodeKind::Source, .. } if node_id == "source"
  ));
  assert!(matches!(
    &events[2],
    ExecutionEvent::NodeCompleted { node_id, summary, .. } if node_id == "source" && summary == "3 records"
  ));
  assert!(matches!(&events[7], ExecutionEvent::RunCompleted { .. }));
}

#[tokio::test]
async fn test_cycle_runs_nothing() {
  let (tx, mut rx) = mpsc::unbounded_channel();
  let engine = PipelineEngine::with_notifier(EngineConfig::default(), ChannelNotifier::new(tx));
  let def = graph(json!({
    "name": "cyclic",
    "nodes": [
      csv_source("src", "x\n1\n"),
      node("a", "evaluator", json!({})),
      node("b", "evaluator", json!({})),
    ],
    "edges": [edge("e1", "a", "b"), edge("e2", "b", "a")]
  }));

  let err = engine.execute(def, CancellationToken::new()).await.unwrap_err();
  assert_eq!(err.class(), FailureClass::Cycle);
  assert!(drain(&mut rx).is_empty(), "no node may start when the graph has a cycle");
}

#[tokio::test]
async fn test_dangling_edges_are_reported() {
  let engine = PipelineEngine::new(EngineConfig::default());
  let def = graph(json!({
    "name": "dangling",
    "nodes": [csv_source("src", "x\n1\n"), node("eval", "evaluator", json!({}))],
    "edges": [edge("e1", "src", "eval"), edge("e2", "ghost", "eval")]
  }));

  let report = engine.execute(def, CancellationToken::new()).await.unwrap();
  assert_eq!(report.execution_order, vec!["src", "eval"]);
  assert_eq!(report.warnings.len(), 1);
  assert_eq!(report.warnings[0].source, "ghost");
}

#[tokio::test]
async fn test_failed_source_does_not_block_downstream() {
  let dir = tempfile::tempdir().unwrap();
  let engine = PipelineEngine::new(EngineConfig {
    base_dir: dir.path().to_path_buf(),
    timeout: None,
  });
  let def = graph(json!({
    "name": "missing-file",
    "nodes": [
      node("src", "source", json!({ "type": "csv", "connection": { "path": "missing.csv" } })),
      node("eval", "evaluator", json!({ "metrics": ["mean"] })),
    ],
    "edges": [edge("e1", "src", "eval")]
  }));

  let report = engine.execute(def, CancellationToken::new()).await.unwrap();
  assert_eq!(
    report.result("src").unwrap().as_status().unwrap().status,
    Status::Error
  );
  assert!(report.result("eval").unwrap().as_report().unwrap().metrics.is_empty());
}

#[tokio::test]
async fn test_export_writes_into_base_dir() {
  let dir = tempfile::tempdir().unwrap();
  let engine = PipelineEngine::new(EngineConfig {
    base_dir: dir.path().to_path_buf(),
    timeout: None,
  });
  let def = graph(json!({
    "name": "export",
    "nodes": [
      csv_source("src", "id,name\n1,ann\n2,bob\n"),
      node("out", "exporter", json!({ "type": "csv", "destination": { "path": "exports/people.csv" } })),
    ],
    "edges": [edge("e1", "src", "out")]
  }));

  let report = engine.execute(def, CancellationToken::new()).await.unwrap();
  let status = report.result("out").unwrap().as_status().unwrap();
  assert_eq!(status.status, Status::Success);
  assert_eq!(
    std::fs::read_to_string(dir.path().join("exports/people.csv")).unwrap(),
    "id,name\n1,ann\n2,bob\n"
  );

  let value = serde_json::to_value(&report).unwrap();
  assert_eq!(value["results"]["out"]["status"], json!("success"));
}

#[tokio::test]
async fn test_unknown_node_type_is_config_mismatch() {
  let engine = PipelineEngine::new(EngineConfig::default());
  let def = graph(json!({
    "name": "bad",
    "nodes": [node("n1", "transformer", json!({}))],
    "edges": []
  }));

  let err = engine.execute(def, CancellationToken::new()).await.unwrap_err();
  let failure = RunFailure::from(&err);
  assert_eq!(failure.class, FailureClass::ConfigMismatch);
  assert_eq!(failure.node_id.as_deref(), Some("n1"));
}

#[tokio::test]
async fn test_fan_in_is_invalid_graph() {
  let engine = PipelineEngine::new(EngineConfig::default());
  let def = graph(json!({
    "name": "fan-in",
    "nodes": [
      csv_source("a", "x\n1\n"),
      csv_source("b", "x\n2\n"),
      node("gen", "generator", json!({ "type": "gaussian", "parameters": {} })),
    ],
    "edges": [edge("e1", "a", "gen"), edge("e2", "b", "gen")]
  }));

  let err = engine.execute(def, CancellationToken::new()).await.unwrap_err();
  assert_eq!(err.class(), FailureClass::InvalidGraph);
  assert_eq!(err.node_id(), Some("gen"));
}

#[tokio::test]
async fn test_kind_and_config_disagree_at_dispatch() {
  let engine = PipelineEngine::new(EngineConfig::default());
  let mut node = Node::new("n1", NodeConfig::Evaluator(EvaluatorConfig::default()));
  node.kind = NodeKind::Generator;
  let pipeline = Pipeline {
    id: None,
    name: "hand-built".to_string(),
    description: None,
    nodes: vec![node],
    edges: vec![],
  };

  let err = engine
    .execute_pipeline(&pipeline, CancellationToken::new())
    .await
    .unwrap_err();
  assert_eq!(err.class(), FailureClass::ConfigMismatch);
  assert_eq!(err.node_id(), Some("n1"));
}

#[tokio::test]
async fn test_missing_executor_is_execution_error() {
  let engine = PipelineEngine::new(EngineConfig::default()).with_registry(ExecutorRegistry::new());
  let err = engine
    .execute(synthesis_graph(), CancellationToken::new())
    .await
    .unwrap_err();

  assert!(matches!(
    &err,
    EngineError::Execution { node_id, source: ExecutorError::Unsupported { .. } } if node_id == "source"
  ));
  assert_eq!(err.class(), FailureClass::ExecutionError);
}

#[tokio::test]
async fn test_run_deadline() {
  let engine = slow_engine(EngineConfig {
    timeout: Some(Duration::from_millis(50)),
    ..EngineConfig::default()
  });

  let err = engine
    .execute(synthesis_graph(), CancellationToken::new())
    .await
    .unwrap_err();
  assert!(matches!(&err, EngineError::Timeout { node_id, .. } if node_id == "evaluator"));
  assert_eq!(err.class(), FailureClass::ExecutionError);
}

#[tokio::test]
async fn test_cancel_before_start() {
  let (tx, mut rx) = mpsc::unbounded_channel();
  let engine = PipelineEngine::with_notifier(EngineConfig::default(), ChannelNotifier::new(tx));
  let cancel = CancellationToken::new();
  cancel.cancel();

  let err = engine.execute(synthesis_graph(), cancel).await.unwrap_err();
  assert!(matches!(err, EngineError::Cancelled));
  assert!(
    !drain(&mut rx)
      .iter()
      .any(|e| matches!(e, ExecutionEvent::NodeStarted { .. }))
  );
}

#[tokio::test]
async fn test_cancel_during_node() {
  let engine = slow_engine(EngineConfig::default());
  let cancel = CancellationToken::new();

  let trigger = cancel.clone();
  tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(50)).await;
    trigger.cancel();
  });

  let err = engine.execute(synthesis_graph(), cancel).await.unwrap_err();
  assert!(matches!(err, EngineError::Cancelled));
  assert_eq!(RunFailure::from(&err).class, FailureClass::ExecutionError);
}
