//! Console message protocol.
//!
//! Inbound frames are decoded with `devcon-json` into a [`Request`], routed
//! by the [`Dispatcher`] to a [`CommandSink`], and answered (for `ping`
//! only) with a [`ServerMessage`].

mod dispatch;
mod errors;
mod message;
mod request;
mod sink;

pub use self::dispatch::Dispatcher;
pub use self::errors::ProtocolError;
pub use self::message::{ServerMessage, Severity, SeverityParseError};
pub use self::request::{Command, Request};
pub use self::sink::{CommandError, CommandSink, TracingCommandSink};
#[cfg(test)]
pub(crate) use self::sink::MockCommandSink;

const PROTOCOL_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::protocol");
