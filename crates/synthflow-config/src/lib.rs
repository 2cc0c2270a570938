//! Synthflow Config
//!
//! This crate contains the serializable pipeline definition types for synthflow.
//! They mirror the payload produced by the graph editor: a named graph of nodes
//! (each tagged `source`, `generator`, `evaluator` or `exporter`) joined by
//! producer → consumer edges.
//!
//! Node configuration arrives as raw JSON on [`NodeDef`] and is parsed into the
//! typed [`NodeConfig`] variant selected by the node's type tag. Variant
//! configuration objects are strict: unknown keys and missing required fields
//! are rejected.

mod edge;
mod evaluator;
mod exporter;
mod generator;
mod graph;
mod node;
mod schema;
mod source;
mod validation;

pub use edge::Edge;
pub use evaluator::{EvaluatorConfig, Metric};
pub use exporter::{ExportDestination, ExportOptions, ExporterConfig, ExporterKind};
pub use generator::{
  Constraint, ConstraintKind, ConstraintParams, CorrelationType, DistributionKind,
  GeneratorConfig, GeneratorDataQuality, GeneratorKind, GeneratorParameters, OutputFormat,
  PrivacyConfig,
};
pub use graph::GraphDef;
pub use node::{ConfigError, NodeConfig, NodeData, NodeDef, NodeKind, Position, UnknownNodeKind};
pub use schema::{ColumnConstraints, ColumnSchema, ColumnType, TableSchema};
pub use source::{
  ApiAuth, ApiAuthType, ApiPagination, Connection, Credentials, HttpMethod, OffsetReset,
  PaginationType, SourceConfig, SourceKind, SourceOptions,
};
pub use validation::{DataQualityRule, RuleKind, ValidationSpec};
