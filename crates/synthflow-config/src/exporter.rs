use serde::{Deserialize, Serialize};

use crate::validation::ValidationSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExporterKind {
  Csv,
  Json,
  Minio,
  S3,
}

impl ExporterKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      ExporterKind::Csv => "csv",
      ExporterKind::Json => "json",
      ExporterKind::Minio => "minio",
      ExporterKind::S3 => "s3",
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportDestination {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub path: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bucket: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportOptions {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub delimiter: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub encoding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
  #[serde(rename = "type")]
  pub kind: ExporterKind,
  pub destination: ExportDestination,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options: Option<ExportOptions>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub validation: Option<ValidationSpec>,
}
