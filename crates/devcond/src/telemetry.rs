//! Process-wide `tracing` setup for the console server.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::Subscriber;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{EnvFilter, fmt};

use devcon_config::{Config, LogFormat};

type BoxedSubscriber = Box<dyn Subscriber + Send + Sync>;

static INSTALLED_FORMAT: OnceCell<LogFormat> = OnceCell::new();

/// Proof that a global subscriber is in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryHandle {
    format: LogFormat,
}

impl TelemetryHandle {
    /// Output format chosen by the call that installed the subscriber.
    #[must_use]
    pub const fn format(&self) -> LogFormat {
        self.format
    }
}

/// Failures while installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// `log_filter` is not a valid `EnvFilter` directive list.
    #[error("invalid log filter '{filter}'")]
    Filter {
        /// Filter expression as configured.
        filter: String,
        /// Parser diagnostic.
        #[source]
        source: ParseError,
    },
    /// A subscriber not installed by this module already owns the process.
    #[error("failed to install telemetry subscriber")]
    Subscriber(#[source] SetGlobalDefaultError),
}

/// Installs the global subscriber once per process.
///
/// Only the first successful call reads `config`; later calls hand back a
/// handle describing what was installed.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for an unparsable filter and
/// [`TelemetryError::Subscriber`] when another subscriber got there first.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED_FORMAT
        .get_or_try_init(|| {
            let subscriber = build_subscriber(config)?;
            tracing::subscriber::set_global_default(subscriber)
                .map_err(TelemetryError::Subscriber)?;
            Ok(config.log_format())
        })
        .map(|format| TelemetryHandle { format: *format })
}

fn build_subscriber(config: &Config) -> Result<BoxedSubscriber, TelemetryError> {
    let filter = parse_filter(config.log_filter())?;
    let base = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339());

    Ok(match config.log_format() {
        LogFormat::Json => Box::new(base.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(base.compact().finish()),
    })
}

fn parse_filter(filter: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(filter).map_err(|source| TelemetryError::Filter {
        filter: filter.to_owned(),
        source,
    })
}
