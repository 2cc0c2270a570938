use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the pipeline engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
  /// Base directory for relative source and export paths.
  pub base_dir: PathBuf,
  /// Deadline for a whole run. `None` runs without a deadline.
  pub timeout: Option<Duration>,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      base_dir: PathBuf::from("."),
      timeout: None,
    }
  }
}
