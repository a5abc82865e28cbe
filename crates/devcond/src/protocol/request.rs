//! Decoding of client requests.

use devcon_json::{Object, Value, ValueType};

use super::ProtocolError;

/// A request sent by a console client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Liveness probe answered with `pong`.
    Ping,
    /// Script text to execute on the host.
    Script {
        /// Source forwarded verbatim.
        script: String,
    },
    /// Runtime control command.
    Command(Command),
}

/// Runtime control commands carried by `{"type":"command"}` messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reload a single resource.
    Reload {
        /// Resource category, such as `texture` or `unit`.
        resource_type: String,
        /// Resource name within its category.
        resource_name: String,
    },
    /// Pause the host.
    Pause,
    /// Resume the host.
    Unpause,
}

impl Request {
    /// Decodes a request from a frame body.
    ///
    /// Only the fields a message type needs are decoded; anything else in
    /// the object is skipped without being unescaped.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] when the body is malformed JSON, is not an
    /// object, lacks a required string field or names an unknown message
    /// type or command.
    pub fn parse(frame: &[u8]) -> Result<Self, ProtocolError> {
        let root = Value::parse(frame)?;
        if root.kind() != ValueType::Object {
            return Err(ProtocolError::NotAnObject { found: root.kind() });
        }
        let members = root.members()?;
        let kind = string_field(&members, "type")?;
        match kind.as_str() {
            "ping" => Ok(Self::Ping),
            "script" => Ok(Self::Script {
                script: string_field(&members, "script")?,
            }),
            "command" => Command::from_members(&members).map(Self::Command),
            _ => Err(ProtocolError::UnknownMessageType { kind }),
        }
    }

    /// Wire name of the request's message type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Script { .. } => "script",
            Self::Command(_) => "command",
        }
    }
}

impl Command {
    fn from_members(members: &Object<'_>) -> Result<Self, ProtocolError> {
        let command = string_field(members, "command")?;
        match command.as_str() {
            "reload" => Ok(Self::Reload {
                resource_type: string_field(members, "resource_type")?,
                resource_name: string_field(members, "resource_name")?,
            }),
            "pause" => Ok(Self::Pause),
            "unpause" => Ok(Self::Unpause),
            _ => Err(ProtocolError::UnknownCommand { command }),
        }
    }

    /// Wire name of the command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Reload { .. } => "reload",
            Self::Pause => "pause",
            Self::Unpause => "unpause",
        }
    }
}

fn string_field(members: &Object<'_>, field: &'static str) -> Result<String, ProtocolError> {
    let value = members
        .get(field)
        .ok_or(ProtocolError::MissingField { field })?;
    if value.kind() != ValueType::String {
        return Err(ProtocolError::FieldType {
            field,
            expected: ValueType::String,
            found: value.kind(),
        });
    }
    Ok(value.as_str()?)
}
