//! Synthflow Pipeline
//!
//! This crate provides the resolved pipeline representation for synthflow.
//! A resolved pipeline is the validated, typed form of a submitted graph
//! definition that is ready for scheduling and execution.
//!
//! Key differences from `synthflow-config`:
//! - Node ids are unique and every node carries a typed configuration that
//!   matches its kind
//! - Consumer nodes have at most one upstream producer
//! - A deterministic topological order can be computed, with cycles rejected
//!   and edges to unknown nodes reported as warnings

mod error;
mod graph;
mod node;
mod pipeline;
mod schedule;

pub use error::PipelineError;
pub use graph::Graph;
pub use node::Node;
pub use pipeline::Pipeline;
pub use schedule::{DanglingEdge, Schedule};

pub use synthflow_config::{Edge, NodeConfig, NodeKind};
