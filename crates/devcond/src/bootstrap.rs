//! Console server bootstrap orchestration.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;
use tracing::info;

use devcon_config::Config;

use crate::health::HealthReporter;
use crate::protocol::CommandSink;
use crate::server::ConsoleServer;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::transport::ListenerError;

const BOOTSTRAP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::server");

/// Source of the server configuration.
pub trait ConfigLoader: Send + Sync {
    /// Produces a resolved [`Config`].
    ///
    /// # Errors
    ///
    /// Returns the layered loader's failure unchanged.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Reads defaults, file, environment and command line for the running
/// process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that hands out a fixed configuration, for hosts that build their
/// own.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps `config`.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Startup stage that stopped the server from coming up.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// No usable configuration could be assembled.
    #[error("console configuration rejected: {source}")]
    Configuration {
        /// Loader diagnostic.
        #[source]
        source: Arc<OrthoError>,
    },
    /// The `tracing` subscriber could not be installed.
    #[error("console telemetry unavailable: {source}")]
    Telemetry {
        /// Telemetry diagnostic.
        #[source]
        source: TelemetryError,
    },
    /// The listen endpoint could not be bound.
    #[error("console listener unavailable: {source}")]
    Listener {
        /// Listener diagnostic.
        #[source]
        source: ListenerError,
    },
}

/// A bound console server together with the configuration it was built from.
pub struct Daemon<K> {
    config: Config,
    server: ConsoleServer<K>,
    telemetry: TelemetryHandle,
}

impl<K> Daemon<K>
where
    K: CommandSink,
{
    /// Configuration the server was bound with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Handle for the installed `tracing` subscriber.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// The running console server.
    #[must_use]
    pub const fn server(&self) -> &ConsoleServer<K> {
        &self.server
    }

    /// Mutable access to the console server, for hosts driving their own
    /// tick loop.
    pub fn server_mut(&mut self) -> &mut ConsoleServer<K> {
        &mut self.server
    }

    /// Gives up the wrapper and returns the server.
    #[must_use]
    pub fn into_server(self) -> ConsoleServer<K> {
        self.server
    }

    /// Ticks the server every `tick_interval_ms` until `stop` is set, then
    /// shuts it down.
    pub fn run_until(mut self, stop: &AtomicBool) {
        let interval = self.config.tick_interval();
        info!(
            target: BOOTSTRAP_TARGET,
            interval_ms = self.config.tick_interval_ms,
            "console tick loop running"
        );
        while !stop.load(Ordering::SeqCst) {
            self.server.update();
            thread::sleep(interval);
        }
        info!(target: BOOTSTRAP_TARGET, "console tick loop stopping");
        self.server.shutdown();
    }
}

/// Loads configuration, installs telemetry and binds the console server.
///
/// `reporter` sees `bootstrap_starting` first and then exactly one of
/// `bootstrap_succeeded` or `bootstrap_failed`.
///
/// # Errors
///
/// Returns [`BootstrapError`] naming the stage that failed.
pub fn bootstrap_with<K>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    sink: K,
) -> Result<Daemon<K>, BootstrapError>
where
    K: CommandSink,
{
    reporter.bootstrap_starting();
    let outcome = start(loader, &reporter, sink);
    match &outcome {
        Ok(daemon) => reporter.bootstrap_succeeded(daemon.config()),
        Err(error) => reporter.bootstrap_failed(error),
    }
    outcome
}

fn start<K>(
    loader: &dyn ConfigLoader,
    reporter: &Arc<dyn HealthReporter>,
    sink: K,
) -> Result<Daemon<K>, BootstrapError>
where
    K: CommandSink,
{
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;
    let server = ConsoleServer::bind(&config, sink, Arc::clone(reporter))
        .map_err(|source| BootstrapError::Listener { source })?;
    Ok(Daemon {
        config,
        server,
        telemetry,
    })
}
