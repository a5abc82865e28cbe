//! Shared configuration for the development console server.
//!
//! Values are layered by [`ortho_config`]: built-in defaults, then a
//! configuration file (`--config-path` or `DEVCON_CONFIG_PATH`), then
//! `DEVCON_*` environment variables, then command-line flags. The resulting
//! [`Config`] is an ordinary value; nothing here keeps global state.

mod defaults;
mod endpoint;
mod escaping;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_MAX_FRAME_BYTES, DEFAULT_TCP_PORT,
    DEFAULT_TICK_INTERVAL_MS, default_listen_endpoint, default_log_filter_string,
    default_log_format, default_max_frame_bytes, default_message_escaping,
    default_tick_interval_ms, default_wait_for_client,
};
pub use endpoint::{EndpointParseError, ListenEndpoint};
pub use escaping::MessageEscaping;
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved console server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, OrthoConfig)]
#[ortho_config(prefix = "DEVCON")]
pub struct Config {
    /// Address the console server binds.
    #[serde(default = "default_listen_endpoint")]
    #[ortho_config(default = default_listen_endpoint())]
    pub listen: ListenEndpoint,
    /// Block at startup until the first client connects.
    #[serde(default = "default_wait_for_client")]
    #[ortho_config(default = default_wait_for_client())]
    pub wait_for_client: bool,
    /// Delay between ticks when the server drives its own loop.
    #[serde(default = "default_tick_interval_ms")]
    #[ortho_config(default = default_tick_interval_ms())]
    pub tick_interval_ms: u64,
    /// Largest frame body a client may announce.
    #[serde(default = "default_max_frame_bytes")]
    #[ortho_config(default = default_max_frame_bytes())]
    pub max_frame_bytes: u32,
    /// Escaping applied to text inside broadcast log messages.
    #[serde(default = "default_message_escaping")]
    #[ortho_config(default = default_message_escaping())]
    pub message_escaping: MessageEscaping,
    /// `tracing` filter expression.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Telemetry output format.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen_endpoint(),
            wait_for_client: default_wait_for_client(),
            tick_interval_ms: default_tick_interval_ms(),
            max_frame_bytes: default_max_frame_bytes(),
            message_escaping: default_message_escaping(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Address the console server binds.
    #[must_use]
    pub const fn listen(&self) -> &ListenEndpoint {
        &self.listen
    }

    /// Whether startup blocks until a client connects.
    #[must_use]
    pub const fn wait_for_client(&self) -> bool {
        self.wait_for_client
    }

    /// Delay between ticks.
    #[must_use]
    pub const fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }

    /// Largest frame body a client may announce.
    #[must_use]
    pub const fn max_frame_bytes(&self) -> u32 {
        self.max_frame_bytes
    }

    /// Escaping applied to broadcast log text.
    #[must_use]
    pub const fn message_escaping(&self) -> MessageEscaping {
        self.message_escaping
    }

    /// `tracing` filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Telemetry output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
