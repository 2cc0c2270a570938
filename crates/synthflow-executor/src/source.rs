use std::path::{Path, PathBuf};

use async_trait::async_trait;
use synthflow_config::{NodeConfig, NodeKind, SourceConfig, SourceKind};
use synthflow_pipeline::{Node, Pipeline};
use tracing::{debug, warn};

use crate::artifact::{Artifact, Record, StatusRecord};
use crate::context::ExecutionContext;
use crate::delimited;
use crate::error::ExecutorError;
use crate::executor::NodeExecutor;

/// Ingests records. Only CSV is read; other source kinds report `not_implemented`.
#[derive(Debug, Clone)]
pub struct SourceExecutor {
  base_dir: PathBuf,
}

impl SourceExecutor {
  pub fn new(base_dir: impl Into<PathBuf>) -> Self {
    Self {
      base_dir: base_dir.into(),
    }
  }

  async fn read_csv(&self, config: &SourceConfig) -> Result<Vec<Record>, ExecutorError> {
    let options = config.options.clone().unwrap_or_default();
    let delimiter = delimited::delimiter(options.delimiter.as_deref())?;
    let has_header = options.has_header.unwrap_or(true);

    let text = match (&config.connection.file_content, &config.connection.path) {
      (Some(content), _) => content.clone(),
      (None, Some(path)) => {
        let encoding = delimited::encoding(options.encoding.as_deref())?;
        let bytes = tokio::fs::read(resolve(&self.base_dir, path)).await?;
        delimited::decode(&bytes, encoding)?
      }
      (None, None) => return Err(ExecutorError::MissingInput),
    };

    delimited::read_records(&text, delimiter, has_header, config.schema.as_ref())
  }
}

pub(crate) fn resolve(base_dir: &Path, path: &str) -> PathBuf {
  let path = Path::new(path);
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    base_dir.join(path)
  }
}

#[async_trait]
impl NodeExecutor for SourceExecutor {
  async fn execute(
    &self,
    node: &Node,
    _pipeline: &Pipeline,
    _context: &ExecutionContext,
  ) -> Result<Artifact, ExecutorError> {
    let NodeConfig::Source(config) = &node.config else {
      return Err(ExecutorError::UnexpectedConfig {
        expected: NodeKind::Source,
        found: node.config.kind(),
      });
    };

    if config.kind != SourceKind::Csv {
      warn!(node_id = %node.id, source = config.kind.as_str(), "source_not_implemented");
      return Ok(Artifact::Status(StatusRecord::not_implemented(format!(
        "{} source not yet implemented",
        config.kind.as_str()
      ))));
    }

    match self.read_csv(config).await {
      Ok(records) => {
        debug!(node_id = %node.id, records = records.len(), "csv_loaded");
        Ok(Artifact::Records(records))
      }
      Err(e) => {
        warn!(node_id = %node.id, error = %e, "csv_load_failed");
        Ok(Artifact::Status(StatusRecord::error(format!(
          "error loading CSV data: {e}"
        ))))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::artifact::Status;
  use serde_json::json;
  use synthflow_config::GraphDef;

  fn source_node(config: serde_json::Value) -> (Node, Pipeline) {
    let def: GraphDef = serde_json::from_value(json!({
      "name": "t",
      "nodes": [{ "id": "src", "type": "source", "data": { "label": "src", "config": config } }]
    }))
    .unwrap();
    let pipeline = Pipeline::resolve(def).unwrap();
    (pipeline.nodes[0].clone(), pipeline)
  }

  async fn run(executor: &SourceExecutor, config: serde_json::Value) -> Artifact {
    let (node, pipeline) = source_node(config);
    executor
      .execute(&node, &pipeline, &ExecutionContext::new())
      .await
      .unwrap()
  }

  #[tokio::test]
  async fn test_inline_content() {
    let executor = SourceExecutor::new(".");
    let artifact = run(
      &executor,
      json!({ "type": "csv", "connection": { "fileContent": "x,y\n1,a\n2,b\n" } }),
    )
    .await;

    assert_eq!(
      serde_json::to_value(&artifact).unwrap(),
      json!([{ "x": 1, "y": "a" }, { "x": 2, "y": "b" }])
    );
  }

  #[tokio::test]
  async fn test_relative_path_resolves_against_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("data.csv"), "a;b\n1;2\n").unwrap();

    let executor = SourceExecutor::new(dir.path());
    let artifact = run(
      &executor,
      json!({
        "type": "csv",
        "connection": { "path": "data.csv" },
        "options": { "delimiter": ";" }
      }),
    )
    .await;

    assert_eq!(artifact.as_records().unwrap().len(), 1);
    assert_eq!(artifact.as_records().unwrap()[0]["b"], json!(2));
  }

  #[tokio::test]
  async fn test_missing_file_is_error_status() {
    let dir = tempfile::tempdir().unwrap();
    let executor = SourceExecutor::new(dir.path());
    let artifact = run(
      &executor,
      json!({ "type": "csv", "connection": { "path": "absent.csv" } }),
    )
    .await;

    let status = artifact.as_status().unwrap();
    assert_eq!(status.status, Status::Error);
    assert!(status.message.starts_with("error loading CSV data"));
  }

  #[tokio::test]
  async fn test_no_path_or_content_is_error_status() {
    let executor = SourceExecutor::new(".");
    let artifact = run(&executor, json!({ "type": "csv", "connection": {} })).await;
    assert_eq!(artifact.as_status().unwrap().status, Status::Error);
  }

  #[tokio::test]
  async fn test_other_source_kinds_are_not_implemented() {
    let executor = SourceExecutor::new(".");
    let artifact = run(
      &executor,
      json!({ "type": "postgresql", "connection": { "host": "db", "database": "app" } }),
    )
    .await;

    let status = artifact.as_status().unwrap();
    assert_eq!(status.status, Status::NotImplemented);
    assert_eq!(status.message, "postgresql source not yet implemented");
  }
}
