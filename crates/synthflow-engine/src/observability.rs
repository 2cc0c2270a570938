//! Logging setup for synthflow processes.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
  /// One JSON object per event.
  Json,
  #[default]
  Pretty,
}

/// Install the global subscriber. Later calls are no-ops.
///
/// `RUST_LOG` selects levels (e.g. `info`, `synthflow_engine=debug`); the
/// default is `info`. Logs go to stderr so stdout stays free for reports.
pub fn init_logging(format: LogFormat) {
  INIT.call_once(|| {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
      LogFormat::Json => {
        tracing_subscriber::registry()
          .with(env_filter)
          .with(fmt::layer().json().with_writer(std::io::stderr))
          .init();
      }
      LogFormat::Pretty => {
        tracing_subscriber::registry()
          .with(env_filter)
          .with(fmt::layer().pretty().with_writer(std::io::stderr))
          .init();
      }
    }
  });
}
