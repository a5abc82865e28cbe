//! Configuration loaders for scenarios covering success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};

use devcon_config::{Config, ListenEndpoint};

use crate::bootstrap::ConfigLoader;

/// Loader that binds an ephemeral loopback port.
#[derive(Debug, Clone, Default)]
pub struct TestConfigLoader {
    port: u16,
}

impl TestConfigLoader {
    /// Builds a loader asking the operating system for a free port.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a loader targeting a fixed port.
    #[must_use]
    pub fn with_port(port: u16) -> Self {
        Self { port }
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            listen: ListenEndpoint::tcp("127.0.0.1", self.port),
            ..Config::default()
        })
    }
}

/// Loader that intentionally fails by passing an invalid listen endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("devcond"),
            OsString::from("--listen"),
            OsString::from("udp://127.0.0.1:9"),
        ];
        Config::load_from_iter(args)
    }
}
