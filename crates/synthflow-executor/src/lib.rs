//! Node executors for synthflow.
//!
//! Each pipeline node kind has one executor implementing [`NodeExecutor`]:
//!
//! - [`SourceExecutor`] ingests records (CSV from a path or inline content)
//! - [`GeneratorExecutor`] synthesizes records from upstream column statistics
//! - [`EvaluatorExecutor`] computes column metrics and data-quality findings
//! - [`ExporterExecutor`] writes records to a destination file
//!
//! Executors read upstream artifacts from the run's [`ExecutionContext`] and
//! return exactly one [`Artifact`]. Recoverable, executor-local problems (an
//! unreadable file, a failed rule) are encoded in the artifact; only faults the
//! executor cannot express that way surface as [`ExecutorError`].

mod artifact;
mod context;
mod delimited;
mod error;
mod evaluator;
mod executor;
mod exporter;
mod generator;
mod report;
mod source;
mod table;
#[cfg(test)]
mod testing;

pub use artifact::{Artifact, Record, Status, StatusRecord};
pub use context::ExecutionContext;
pub use error::ExecutorError;
pub use evaluator::{EvaluatorExecutor, evaluate};
pub use executor::{ExecutorRegistry, NodeExecutor};
pub use exporter::ExporterExecutor;
pub use generator::GeneratorExecutor;
pub use report::{
  CheckStatus, EvaluationReport, RequiredColumnsResult, RequiredMetricsResult, RuleResult,
  ThresholdResult, ValidationReport,
};
pub use source::SourceExecutor;
pub use table::Table;
