use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Output format of the console server's own diagnostics.
///
/// This governs the server's `tracing` output on stderr, not the `message`
/// frames broadcast to clients.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One flattened JSON object per event.
    #[default]
    Json,
    /// Single-line human readable events.
    Compact,
}

/// Error returned when text names no [`LogFormat`].
pub type LogFormatParseError = strum::ParseError;
