//! Synthflow Engine
//!
//! This crate runs resolved pipelines. It owns the run loop: resolve, schedule,
//! dispatch each node to its executor in order, and collect the outputs into a
//! [`RunReport`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      PipelineEngine                         │
//! │  - execute(def, cancel) → RunReport                         │
//! │  - resolution, scheduling, run deadline, cancellation       │
//! │  - emits ExecutionEvents to its notifier                    │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ExecutorRegistry                         │
//! │  - node kind → NodeExecutor                                 │
//! │  - source, generator, evaluator, exporter                   │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ExecutionContext                         │
//! │  - per-run, write-once store of node outputs                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use synthflow_engine::{EngineConfig, PipelineEngine};
//! use tokio_util::sync::CancellationToken;
//!
//! let engine = PipelineEngine::new(EngineConfig::default());
//! let def: GraphDef = serde_json::from_str(&payload)?;
//! let report = engine.execute(def, CancellationToken::new()).await?;
//! println!("{:?}", report.execution_order);
//! ```

mod config;
mod engine;
mod error;
mod events;
pub mod observability;
mod result;

pub use config::EngineConfig;
pub use engine::PipelineEngine;
pub use error::EngineError;
pub use events::{ChannelNotifier, ExecutionEvent, ExecutionNotifier, NoopNotifier};
pub use result::{FailureClass, RunFailure, RunReport};

pub use synthflow_executor::{Artifact, ExecutorRegistry, NodeExecutor, Status, StatusRecord};
