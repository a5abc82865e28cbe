//! Errors raised while interpreting a client frame.

use thiserror::Error;

use devcon_json::{JsonError, ValueType};

/// A frame that could not be turned into a request.
///
/// Protocol errors never disconnect the client: the offending message is
/// logged and dropped.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame was not well-formed JSON.
    #[error("malformed message: {0}")]
    Json(#[from] JsonError),
    /// The document root was not an object.
    #[error("message must be a JSON object, found {found}")]
    NotAnObject {
        /// Type of the root value.
        found: ValueType,
    },
    /// A required field was absent.
    #[error("message is missing the '{field}' field")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },
    /// A field held a value of the wrong type.
    #[error("field '{field}' must be a {expected}, found {found}")]
    FieldType {
        /// Name of the offending field.
        field: &'static str,
        /// Type the protocol requires.
        expected: ValueType,
        /// Type the client sent.
        found: ValueType,
    },
    /// The `type` field named no known message.
    #[error("unknown message type '{kind}'")]
    UnknownMessageType {
        /// Value of the `type` field.
        kind: String,
    },
    /// A `command` message named no known command.
    #[error("unknown command '{command}'")]
    UnknownCommand {
        /// Value of the `command` field.
        command: String,
    },
    /// A reply could not be serialised.
    #[error("failed to serialise reply: {0}")]
    Serialise(#[from] serde_json::Error),
}
