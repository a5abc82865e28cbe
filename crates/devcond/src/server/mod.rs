//! The console server and its per-tick work.
//!
//! [`ConsoleServer`] is an ordinary value owned by the host. Each call to
//! [`ConsoleServer::update`] accepts at most one pending connection, reads at
//! most one frame per client, answers or forwards each request and evicts
//! clients whose streams failed. Nothing runs between ticks.

mod registry;

use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;

use tracing::{debug, warn};

use devcon_config::{Config, MessageEscaping};

use crate::health::HealthReporter;
use crate::protocol::{CommandSink, Dispatcher, ServerMessage, Severity};
use crate::transport::{ConsoleListener, FrameCodec, ListenerError, TransportError};

pub use self::registry::{Client, ClientId, ClientRegistry, DeadClient, Evicted};

const SERVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::server");

/// Tunables for a [`ConsoleServer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerOptions {
    /// Largest inbound frame body accepted.
    pub max_frame_bytes: u32,
    /// Escaping applied to log text.
    pub message_escaping: MessageEscaping,
    /// Block in [`ConsoleServer::new`] until the first client connects.
    pub wait_for_client: bool,
}

impl ServerOptions {
    /// Extracts the server tunables from a resolved configuration.
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self {
            max_frame_bytes: config.max_frame_bytes(),
            message_escaping: config.message_escaping(),
            wait_for_client: config.wait_for_client(),
        }
    }
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Development console server.
///
/// Owns the listening socket, the connected clients and the host's
/// [`CommandSink`]. All work happens on the caller's thread.
pub struct ConsoleServer<K> {
    listener: ConsoleListener,
    registry: ClientRegistry<TcpStream>,
    codec: FrameCodec,
    dispatcher: Dispatcher,
    escaping: MessageEscaping,
    sink: K,
    reporter: Arc<dyn HealthReporter>,
}

impl<K> ConsoleServer<K>
where
    K: CommandSink,
{
    /// Wraps a bound listener.
    ///
    /// With [`ServerOptions::wait_for_client`] set this blocks until one
    /// client connects, and that client is registered before returning.
    pub fn new(
        listener: ConsoleListener,
        sink: K,
        reporter: Arc<dyn HealthReporter>,
        options: ServerOptions,
    ) -> Self {
        let mut server = Self {
            listener,
            registry: ClientRegistry::new(),
            codec: FrameCodec::new(options.max_frame_bytes),
            dispatcher: Dispatcher::new(),
            escaping: options.message_escaping,
            sink,
            reporter,
        };
        if options.wait_for_client {
            let (stream, peer) = server.listener.wait_for_client();
            server.register(stream, peer);
        }
        server
    }

    /// Binds the configured endpoint and builds a server around it.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError`] when the endpoint cannot be bound.
    pub fn bind(
        config: &Config,
        sink: K,
        reporter: Arc<dyn HealthReporter>,
    ) -> Result<Self, ListenerError> {
        let listener = ConsoleListener::bind(config.listen())?;
        Ok(Self::new(
            listener,
            sink,
            reporter,
            ServerOptions::from_config(config),
        ))
    }

    /// Address the listener is bound to.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr()
    }

    /// Number of connected clients.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.registry.len()
    }

    /// Identifiers of connected clients.
    #[must_use]
    pub fn client_ids(&self) -> Vec<ClientId> {
        self.registry.ids()
    }

    /// The host collaborator.
    #[must_use]
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    /// Mutable access to the host collaborator.
    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Runs one tick.
    ///
    /// Malformed messages are dropped with a log record. A client is only
    /// evicted when its own stream fails, and never affects the others.
    pub fn update(&mut self) {
        self.accept_pending();

        let Self {
            ref mut registry,
            ref codec,
            ref dispatcher,
            escaping,
            ref mut sink,
            ref reporter,
            ..
        } = *self;
        let dead = registry.poll_all(codec, |client, frame| {
            match dispatcher.dispatch(&frame, sink) {
                Ok(Some(reply)) => send_reply(codec, escaping, client, &reply),
                Ok(None) => Ok(()),
                Err(error) => {
                    reporter.message_rejected(client.id(), &error);
                    Ok(())
                }
            }
        });
        self.evict(dead);
    }

    /// Broadcasts a structured log message to every client.
    pub fn log(&mut self, message: &str, severity: Severity) {
        match ServerMessage::log(message, severity).to_json(self.escaping) {
            Ok(json) => self.broadcast(&json),
            Err(error) => warn!(
                target: SERVER_TARGET,
                error = %error,
                "failed to encode log message"
            ),
        }
    }

    /// Sends a frame to every client in registry order.
    ///
    /// Clients whose write fails are evicted before this returns.
    pub fn broadcast(&mut self, json: &str) {
        let dead = self.registry.broadcast(&self.codec, json);
        self.evict(dead);
    }

    /// Sends a frame to one client.
    ///
    /// A failed write evicts the client.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::UnknownClient`] when no client has the given
    /// identifier and [`SendError::Transport`] when the write failed.
    pub fn send_to(&mut self, id: ClientId, json: &str) -> Result<(), SendError> {
        let index = self
            .registry
            .position(id)
            .ok_or(SendError::UnknownClient { id })?;
        let Some(Err(error)) = self
            .registry
            .get_mut(id)
            .map(|client| self.codec.write(client.stream_mut(), json))
        else {
            return Ok(());
        };
        let evicted = self.registry.evict(vec![DeadClient::new(index, error)]);
        match evicted.into_iter().next() {
            Some(Evicted { id, peer, reason }) => {
                self.reporter.client_evicted(id, peer, &reason);
                Err(SendError::Transport { id, source: reason })
            }
            None => Ok(()),
        }
    }

    /// Closes every client and the listening socket.
    pub fn shutdown(mut self) {
        debug!(
            target: SERVER_TARGET,
            clients = self.registry.len(),
            "shutting down console server"
        );
        self.registry.shutdown();
    }

    fn accept_pending(&mut self) {
        match self.listener.accept_pending() {
            Ok(Some((stream, peer))) => self.register(stream, peer),
            Ok(None) => {}
            Err(error) => warn!(
                target: SERVER_TARGET,
                error = %error,
                "console accept failed"
            ),
        }
    }

    fn register(&mut self, stream: TcpStream, peer: SocketAddr) {
        let id = self.registry.register(stream, peer);
        self.reporter.client_connected(id, peer);
    }

    fn evict(&mut self, dead: Vec<DeadClient>) {
        if dead.is_empty() {
            return;
        }
        for evicted in self.registry.evict(dead) {
            self.reporter
                .client_evicted(evicted.id, evicted.peer, &evicted.reason);
        }
    }
}

fn send_reply(
    codec: &FrameCodec,
    escaping: MessageEscaping,
    client: &mut Client<TcpStream>,
    reply: &ServerMessage,
) -> Result<(), TransportError> {
    match reply.to_json(escaping) {
        Ok(json) => codec.write(client.stream_mut(), &json),
        Err(error) => {
            warn!(
                target: SERVER_TARGET,
                client = %client.id(),
                error = %error,
                "failed to encode reply"
            );
            Ok(())
        }
    }
}

/// Failure of [`ConsoleServer::send_to`].
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// No connected client has the identifier.
    #[error("no connected client {id}")]
    UnknownClient {
        /// Requested identifier.
        id: ClientId,
    },
    /// The write failed and the client was evicted.
    #[error("write to {id} failed: {source}")]
    Transport {
        /// Identifier of the evicted client.
        id: ClientId,
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },
}
