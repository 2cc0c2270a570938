use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use synthflow_config::GraphDef;
use synthflow_engine::observability::{LogFormat, init_logging};
use synthflow_engine::{EngineConfig, PipelineEngine, RunFailure};

/// Synthflow - run synthetic-data pipelines described as node graphs
#[derive(Parser)]
#[command(name = "synthflow")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Log output format (logs go to stderr)
  #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Pretty, env = "SYNTHFLOW_LOG_FORMAT")]
  log_format: LogFormatArg,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
  Pretty,
  Json,
}

impl From<LogFormatArg> for LogFormat {
  fn from(arg: LogFormatArg) -> Self {
    match arg {
      LogFormatArg::Pretty => LogFormat::Pretty,
      LogFormatArg::Json => LogFormat::Json,
    }
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Run a pipeline and print its report
  Run {
    /// Path to the graph file (JSON), or `-` to read it from stdin
    graph_file: PathBuf,

    /// Directory relative source and export paths resolve against
    /// (default: the graph file's directory)
    #[arg(long, env = "SYNTHFLOW_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Deadline for the whole run, in milliseconds
    #[arg(long, env = "SYNTHFLOW_TIMEOUT_MS")]
    timeout_ms: Option<u64>,
  },

  /// Print the execution order and warnings without running anything
  Plan {
    /// Path to the graph file (JSON), or `-` to read it from stdin
    graph_file: PathBuf,
  },
}

fn main() -> Result<ExitCode> {
  let cli = Cli::parse();
  init_logging(cli.log_format.into());

  match cli.command {
    Some(Commands::Run {
      graph_file,
      base_dir,
      timeout_ms,
    }) => {
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(async { run_pipeline(graph_file, base_dir, timeout_ms).await })
    }
    Some(Commands::Plan { graph_file }) => plan_pipeline(graph_file),
    None => {
      println!("synthflow - use --help to see available commands");
      Ok(ExitCode::SUCCESS)
    }
  }
}

async fn run_pipeline(
  graph_file: PathBuf,
  base_dir: Option<PathBuf>,
  timeout_ms: Option<u64>,
) -> Result<ExitCode> {
  let def = read_graph(&graph_file)?;
  let base_dir = base_dir.unwrap_or_else(|| default_base_dir(&graph_file));

  let config = EngineConfig {
    base_dir,
    timeout: timeout_ms.map(Duration::from_millis),
  };
  let engine = PipelineEngine::new(config);

  let cancel = CancellationToken::new();
  let on_interrupt = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      warn!("interrupt received, cancelling run");
      on_interrupt.cancel();
    }
  });

  match engine.execute(def, cancel).await {
    Ok(report) => {
      println!("{}", serde_json::to_string_pretty(&report)?);
      Ok(ExitCode::SUCCESS)
    }
    Err(e) => {
      println!("{}", serde_json::to_string_pretty(&RunFailure::from(&e))?);
      Ok(ExitCode::FAILURE)
    }
  }
}

fn plan_pipeline(graph_file: PathBuf) -> Result<ExitCode> {
  let def = read_graph(&graph_file)?;
  let engine = PipelineEngine::new(EngineConfig::default());

  match engine.plan(def) {
    Ok(schedule) => {
      println!("{}", serde_json::to_string_pretty(&schedule)?);
      Ok(ExitCode::SUCCESS)
    }
    Err(e) => {
      println!("{}", serde_json::to_string_pretty(&RunFailure::from(&e))?);
      Ok(ExitCode::FAILURE)
    }
  }
}

fn read_graph(graph_file: &Path) -> Result<GraphDef> {
  let content = if graph_file.as_os_str() == "-" {
    let mut input = String::new();
    io::stdin()
      .read_to_string(&mut input)
      .context("failed to read graph from stdin")?;
    input
  } else {
    std::fs::read_to_string(graph_file)
      .with_context(|| format!("failed to read graph file: {}", graph_file.display()))?
  };

  serde_json::from_str(&content)
    .with_context(|| format!("failed to parse graph file: {}", graph_file.display()))
}

fn default_base_dir(graph_file: &Path) -> PathBuf {
  match graph_file.parent() {
    Some(parent) if graph_file.as_os_str() != "-" && !parent.as_os_str().is_empty() => {
      parent.to_path_buf()
    }
    _ => PathBuf::from("."),
  }
}
