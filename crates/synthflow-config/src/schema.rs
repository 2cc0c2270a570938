use serde::{Deserialize, Serialize};

/// Declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
  String,
  Number,
  Boolean,
  Date,
  Datetime,
  Json,
  Array,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnConstraints {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pattern: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub unique: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub required: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnSchema {
  pub name: String,
  #[serde(rename = "type")]
  pub column_type: ColumnType,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub nullable: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub constraints: Option<ColumnConstraints>,
}

/// Ordered column declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSchema {
  pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
  pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
    self.columns.iter().find(|c| c.name == name)
  }
}
