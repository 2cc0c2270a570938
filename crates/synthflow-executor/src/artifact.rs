//! Node outputs.

use serde::Serialize;

/// One row: column name → JSON scalar, in column order.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// The output of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Artifact {
  /// Tabular rows from a source or generator.
  Records(Vec<Record>),
  /// Metrics and validation findings from an evaluator.
  Report(crate::report::EvaluationReport),
  /// Terminal outcome of an exporter, or a source/generator that produced no rows.
  Status(StatusRecord),
}

impl Artifact {
  pub fn as_records(&self) -> Option<&[Record]> {
    match self {
      Artifact::Records(records) => Some(records),
      _ => None,
    }
  }

  pub fn as_report(&self) -> Option<&crate::report::EvaluationReport> {
    match self {
      Artifact::Report(report) => Some(report),
      _ => None,
    }
  }

  pub fn as_status(&self) -> Option<&StatusRecord> {
    match self {
      Artifact::Status(status) => Some(status),
      _ => None,
    }
  }

  /// Short description used in logs and events.
  pub fn summary(&self) -> String {
    match self {
      Artifact::Records(records) => format!("{} records", records.len()),
      Artifact::Report(report) => format!("report over {} columns", report.metrics.len()),
      Artifact::Status(status) => format!("{}: {}", status.status.as_str(), status.message),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
  Success,
  Error,
  NotImplemented,
}

impl Status {
  pub fn as_str(&self) -> &'static str {
    match self {
      Status::Success => "success",
      Status::Error => "error",
      Status::NotImplemented => "not_implemented",
    }
  }
}

/// `{status, message, path?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
  pub status: Status,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub path: Option<String>,
}

impl StatusRecord {
  pub fn success(message: impl Into<String>, path: impl Into<String>) -> Self {
    Self {
      status: Status::Success,
      message: message.into(),
      path: Some(path.into()),
    }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self {
      status: Status::Error,
      message: message.into(),
      path: None,
    }
  }

  pub fn not_implemented(message: impl Into<String>) -> Self {
    Self {
      status: Status::NotImplemented,
      message: message.into(),
      path: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_status_serialization_omits_missing_path() {
    let value = serde_json::to_value(Artifact::Status(StatusRecord::error("boom"))).unwrap();
    assert_eq!(value, json!({ "status": "error", "message": "boom" }));

    let value =
      serde_json::to_value(Artifact::Status(StatusRecord::success("ok", "/tmp/out.csv"))).unwrap();
    assert_eq!(
      value,
      json!({ "status": "success", "message": "ok", "path": "/tmp/out.csv" })
    );
  }

  #[test]
  fn test_records_serialize_as_array() {
    let mut record = Record::new();
    record.insert("x".to_string(), json!(1));
    let value = serde_json::to_value(Artifact::Records(vec![record])).unwrap();
    assert_eq!(value, json!([{ "x": 1 }]));
  }
}
