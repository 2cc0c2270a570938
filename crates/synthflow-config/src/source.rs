use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::TableSchema;
use crate::validation::ValidationSpec;

/// Where a source node ingests from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
  Csv,
  Postgresql,
  Mysql,
  Minio,
  S3,
  Api,
  Kafka,
}

impl SourceKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      SourceKind::Csv => "csv",
      SourceKind::Postgresql => "postgresql",
      SourceKind::Mysql => "mysql",
      SourceKind::Minio => "minio",
      SourceKind::S3 => "s3",
      SourceKind::Api => "api",
      SourceKind::Kafka => "kafka",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
  #[serde(rename = "type")]
  pub kind: SourceKind,
  pub connection: Connection,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schema: Option<TableSchema>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options: Option<SourceOptions>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub validation: Option<ValidationSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
  Get,
  Post,
  Put,
  Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiAuthType {
  Basic,
  Bearer,
  ApiKey,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiAuth {
  #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
  pub auth_type: Option<ApiAuthType>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub access_key: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub secret_key: Option<String>,
}

/// Connection parameters. Which fields matter depends on the source kind:
/// databases read `host`..`ssl`, file and object stores read `bucket`..`credentials`
/// (plus inline `file_content` for uploaded CSVs), APIs read `url`..`auth`,
/// Kafka reads `bootstrap_servers`..`group_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Connection {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub host: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub port: Option<u16>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub database: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub password: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ssl: Option<bool>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bucket: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub path: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub region: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub credentials: Option<Credentials>,
  #[serde(
    default,
    alias = "fileContent",
    skip_serializing_if = "Option::is_none"
  )]
  pub file_content: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub method: Option<HttpMethod>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub headers: Option<BTreeMap<String, String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub auth: Option<ApiAuth>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bootstrap_servers: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub topic: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub group_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationType {
  Offset,
  Cursor,
  Page,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiPagination {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub enabled: Option<bool>,
  #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
  pub pagination_type: Option<PaginationType>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub param_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetReset {
  Earliest,
  Latest,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceOptions {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub delimiter: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub encoding: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub has_header: Option<bool>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub query: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub batch_size: Option<u32>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pagination: Option<ApiPagination>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub auto_offset_reset: Option<OffsetReset>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_poll_records: Option<u32>,
}
