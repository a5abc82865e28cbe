use crate::endpoint::ListenEndpoint;
use crate::escaping::MessageEscaping;
use crate::logging::LogFormat;

/// Loopback address the console binds by default.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default TCP port for the console server.
pub const DEFAULT_TCP_PORT: u16 = 10001;

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default delay between server ticks, in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 16;

/// Default upper bound on a single frame body, in bytes.
pub const DEFAULT_MAX_FRAME_BYTES: u32 = 1024 * 1024;

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default listen endpoint for the console server.
#[must_use]
pub fn default_listen_endpoint() -> ListenEndpoint {
    ListenEndpoint::tcp(DEFAULT_HOST, DEFAULT_TCP_PORT)
}

/// Default escaping applied to broadcast log text.
#[must_use]
pub fn default_message_escaping() -> MessageEscaping {
    MessageEscaping::QuotesOnly
}

/// Default tick interval.
#[must_use]
pub const fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

/// Default frame size limit.
#[must_use]
pub const fn default_max_frame_bytes() -> u32 {
    DEFAULT_MAX_FRAME_BYTES
}

/// Clients are not awaited at startup unless requested.
#[must_use]
pub const fn default_wait_for_client() -> bool {
    false
}
