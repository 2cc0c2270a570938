use std::path::{Path, PathBuf};

use async_trait::async_trait;
use synthflow_config::{ExporterConfig, ExporterKind, NodeConfig, NodeKind};
use synthflow_pipeline::{Node, Pipeline};
use tracing::{info, warn};

use crate::artifact::{Artifact, Record, StatusRecord};
use crate::context::ExecutionContext;
use crate::delimited;
use crate::error::ExecutorError;
use crate::executor::NodeExecutor;
use crate::source::resolve;

/// Writes upstream records to a file and reports the outcome as a status record.
#[derive(Debug, Clone)]
pub struct ExporterExecutor {
  base_dir: PathBuf,
}

impl ExporterExecutor {
  pub fn new(base_dir: impl Into<PathBuf>) -> Self {
    Self {
      base_dir: base_dir.into(),
    }
  }

  async fn write(&self, config: &ExporterConfig, records: &[Record], path: &Path) -> Result<(), ExecutorError> {
    let bytes = match config.kind {
      ExporterKind::Csv => {
        let options = config.options.clone().unwrap_or_default();
        let delimiter = delimited::delimiter(options.delimiter.as_deref())?;
        let encoding = delimited::encoding(options.encoding.as_deref())?;
        delimited::write_records(records, delimiter, encoding)?
      }
      _ => serde_json::to_vec_pretty(records)?,
    };

    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
  }
}

#[async_trait]
impl NodeExecutor for ExporterExecutor {
  async fn execute(
    &self,
    node: &Node,
    pipeline: &Pipeline,
    context: &ExecutionContext,
  ) -> Result<Artifact, ExecutorError> {
    let NodeConfig::Exporter(config) = &node.config else {
      return Err(ExecutorError::UnexpectedConfig {
        expected: NodeKind::Exporter,
        found: node.config.kind(),
      });
    };

    let records = match context.input_for(pipeline, &node.id) {
      Some((_, Artifact::Records(records))) if !records.is_empty() => records,
      Some((_, Artifact::Records(_))) | None => {
        return Ok(Artifact::Status(StatusRecord::error(
          "input data not found or empty",
        )));
      }
      Some((upstream, _)) => {
        warn!(node_id = %node.id, upstream, "export_input_not_records");
        return Ok(Artifact::Status(StatusRecord::error(
          "invalid input data format (expected records)",
        )));
      }
    };

    let label = match config.kind {
      ExporterKind::Csv => "CSV",
      ExporterKind::Json => "JSON",
      other => {
        warn!(node_id = %node.id, exporter = other.as_str(), "exporter_not_implemented");
        return Ok(Artifact::Status(StatusRecord::not_implemented(format!(
          "{} export not yet implemented",
          other.as_str()
        ))));
      }
    };

    let Some(destination) = config.destination.path.as_deref() else {
      return Ok(Artifact::Status(StatusRecord::error(
        "no destination path specified",
      )));
    };
    let path = resolve(&self.base_dir, destination);

    match self.write(config, records, &path).await {
      Ok(()) => {
        let path = path.display().to_string();
        info!(node_id = %node.id, records = records.len(), path = %path, "exported");
        Ok(Artifact::Status(StatusRecord::success(
          format!("exported {} records to {label}: {path}", records.len()),
          path,
        )))
      }
      Err(e) => {
        warn!(node_id = %node.id, error = %e, "export_failed");
        Ok(Artifact::Status(StatusRecord::error(format!(
          "error exporting data to {destination}: {e}"
        ))))
      }
    }
  }
}
