//! Remote development console server.
//!
//! Debug clients connect over TCP and exchange length-prefixed JSON frames
//! with a running host. A client can probe liveness (`ping`), submit script
//! text (`script`) and issue runtime commands (`command`: `reload`, `pause`,
//! `unpause`). The host pushes structured log events (`message`) to every
//! connected client.
//!
//! The server is single threaded and poll driven. The host owns a
//! [`ConsoleServer`] and calls [`ConsoleServer::update`] once per frame; each
//! tick accepts pending connections, reads at most one frame per client and
//! evicts clients whose streams failed. Malformed input is logged and
//! dropped: it never disconnects the client or stops the server.
//!
//! Engine-specific behaviour lives behind the [`CommandSink`] trait, and
//! lifecycle events flow through a [`HealthReporter`] so operators can follow
//! the server through structured telemetry. The `devcond` binary wraps the
//! same pieces with layered configuration and signal handling for standalone
//! use.

mod bootstrap;
mod health;
mod protocol;
mod server;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use protocol::{
    Command, CommandError, CommandSink, Dispatcher, ProtocolError, Request, ServerMessage,
    Severity, SeverityParseError, TracingCommandSink,
};
pub use server::{
    Client, ClientId, ClientRegistry, ConsoleServer, DeadClient, Evicted, SendError,
    ServerOptions,
};
pub use telemetry::{TelemetryError, TelemetryHandle, initialise as initialise_telemetry};
pub use transport::{
    ConsoleListener, FrameCodec, FrameStream, HEADER_LEN, ListenerError, TransportError,
};

#[cfg(test)]
mod tests;
