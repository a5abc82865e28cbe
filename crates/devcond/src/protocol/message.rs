//! Messages sent from the server to console clients.

use serde::Serialize;
use strum::{Display, EnumString};

use devcon_config::MessageEscaping;

use super::ProtocolError;

/// Severity attached to a broadcast log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    /// Routine information.
    Info,
    /// Something unexpected that the host recovered from.
    Warning,
    /// A failure.
    Error,
    /// Diagnostic detail.
    Debug,
}

/// Errors encountered while parsing a [`Severity`] from text.
pub type SeverityParseError = strum::ParseError;

/// A message the server sends to one or all clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Reply to a `ping`.
    Pong,
    /// Structured log event broadcast to every client.
    Message {
        /// Severity of the event.
        severity: Severity,
        /// Free-form text.
        message: String,
    },
}

impl ServerMessage {
    /// Builds a log message.
    #[must_use]
    pub fn log(message: impl Into<String>, severity: Severity) -> Self {
        Self::Message {
            severity,
            message: message.into(),
        }
    }

    /// Renders the message as frame body text.
    ///
    /// With [`MessageEscaping::QuotesOnly`] the log text only has its double
    /// quotes escaped, so backslashes and control characters pass through
    /// untouched. [`MessageEscaping::Json`] produces strict JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Serialise`] if JSON serialisation fails.
    pub fn to_json(&self, escaping: MessageEscaping) -> Result<String, ProtocolError> {
        match (self, escaping) {
            (Self::Message { severity, message }, MessageEscaping::QuotesOnly) => Ok(format!(
                r#"{{"type":"message","severity":"{severity}","message":"{}"}}"#,
                escape_quotes(message)
            )),
            _ => Ok(serde_json::to_string(self)?),
        }
    }
}

fn escape_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}
