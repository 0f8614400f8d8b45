use crate::error::ConfigError;
use crate::settings::Logging;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

const LOG_FILE_PREFIX: &str = "sales-lens.log";

type FilteredRegistry = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

/// Builds the log filter: `RUST_LOG` if it is set, otherwise the configured level.
pub fn env_filter(settings: &Logging) -> Result<EnvFilter, ConfigError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| ConfigError::Telemetry(format!("invalid log filter '{}': {e}", settings.level)))
}

/// Installs the global `tracing` subscriber.
///
/// Logs go to stdout, and additionally to a daily rolling file when
/// `settings.directory` is set. The returned guard flushes the file writer on
/// drop and must be held for as long as the process logs.
pub fn init_tracing(settings: &Logging) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = env_filter(settings)?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    layers.push(if settings.json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    });

    let guard = match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(fmt::layer().with_ansi(false).with_writer(writer).boxed());
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layers)
        .try_init()
        .map_err(|e| ConfigError::Telemetry(e.to_string()))?;

    tracing::debug!(level = %settings.level, json = settings.json, "Logging initialized.");
    Ok(guard)
}
