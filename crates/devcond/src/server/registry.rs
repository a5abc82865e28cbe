//! Bookkeeping for connected console clients.

use std::fmt;
use std::net::{SocketAddr, TcpStream};

use tracing::debug;

use crate::transport::{FrameCodec, FrameStream, TransportError};

use super::SERVER_TARGET;

/// Identifier assigned to a client when it connects.
///
/// Identifiers increase monotonically and are never reused within one
/// registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(u64);

impl ClientId {
    /// Numeric value of the identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "client-{}", self.0)
    }
}

/// A connected console client.
#[derive(Debug)]
pub struct Client<S = TcpStream> {
    id: ClientId,
    peer: SocketAddr,
    stream: S,
}

impl<S> Client<S> {
    /// Identifier assigned on connection.
    #[must_use]
    pub const fn id(&self) -> ClientId {
        self.id
    }

    /// Remote address of the client.
    #[must_use]
    pub const fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Mutable access to the client's stream.
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }
}

/// A client found dead during a scan, identified by its current index.
#[derive(Debug)]
pub struct DeadClient {
    index: usize,
    error: TransportError,
}

impl DeadClient {
    /// Marks the client at `index` as dead.
    #[must_use]
    pub const fn new(index: usize, error: TransportError) -> Self {
        Self { index, error }
    }

    /// Position of the client in the registry at the time of the scan.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Failure that killed the client.
    #[must_use]
    pub const fn error(&self) -> &TransportError {
        &self.error
    }
}

/// A client removed from the registry along with the reason.
#[derive(Debug)]
pub struct Evicted {
    /// Identifier of the removed client.
    pub id: ClientId,
    /// Remote address of the removed client.
    pub peer: SocketAddr,
    /// Failure that caused the eviction.
    pub reason: TransportError,
}

/// Unordered collection of connected clients.
///
/// The registry is the only owner of client streams. Streams are closed when
/// their client is evicted or when the registry shuts down.
#[derive(Debug)]
pub struct ClientRegistry<S = TcpStream> {
    clients: Vec<Client<S>>,
    next_id: u64,
}

impl<S> Default for ClientRegistry<S> {
    fn default() -> Self {
        Self {
            clients: Vec::new(),
            next_id: 1,
        }
    }
}

impl<S> ClientRegistry<S>
where
    S: FrameStream,
{
    /// Builds an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of connected clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns `true` when no client is connected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Identifiers of connected clients in registry order.
    #[must_use]
    pub fn ids(&self) -> Vec<ClientId> {
        self.clients.iter().map(Client::id).collect()
    }

    /// Current index of the client with the given identifier.
    #[must_use]
    pub fn position(&self, id: ClientId) -> Option<usize> {
        self.clients.iter().position(|client| client.id == id)
    }

    /// Looks up a client by identifier.
    pub fn get_mut(&mut self, id: ClientId) -> Option<&mut Client<S>> {
        self.clients.iter_mut().find(|client| client.id == id)
    }

    /// Tracks a newly accepted stream and returns its identifier.
    pub fn register(&mut self, stream: S, peer: SocketAddr) -> ClientId {
        let id = ClientId(self.next_id);
        self.next_id += 1;
        self.clients.push(Client { id, peer, stream });
        id
    }

    /// Reads at most one frame from every client.
    ///
    /// `on_frame` receives each decoded body together with its client. A
    /// read failure, or an error returned by `on_frame` (typically a failed
    /// reply), marks the client dead. Dead clients are returned in ascending
    /// index order for [`ClientRegistry::evict`].
    pub fn poll_all<F>(&mut self, codec: &FrameCodec, mut on_frame: F) -> Vec<DeadClient>
    where
        F: FnMut(&mut Client<S>, Vec<u8>) -> Result<(), TransportError>,
    {
        let mut dead = Vec::new();
        for (index, client) in self.clients.iter_mut().enumerate() {
            let outcome = match codec.read(&mut client.stream) {
                Ok(None) => continue,
                Ok(Some(frame)) => on_frame(client, frame),
                Err(error) => Err(error),
            };
            if let Err(error) = outcome {
                dead.push(DeadClient { index, error });
            }
        }
        dead
    }

    /// Writes `json` to every client in registry order.
    ///
    /// Clients whose write fails are returned as dead; the others still
    /// receive the frame.
    pub fn broadcast(&mut self, codec: &FrameCodec, json: &str) -> Vec<DeadClient> {
        self.clients
            .iter_mut()
            .enumerate()
            .filter_map(|(index, client)| {
                codec
                    .write(&mut client.stream, json)
                    .err()
                    .map(|error| DeadClient { index, error })
            })
            .collect()
    }

    /// Closes and removes the given clients.
    ///
    /// Removal swaps each dead client with the last one, so the order of the
    /// remaining clients is not preserved. Indices are processed from the
    /// highest down, which keeps every pending index valid while the vector
    /// shrinks.
    pub fn evict(&mut self, mut dead: Vec<DeadClient>) -> Vec<Evicted> {
        dead.sort_unstable_by(|left, right| right.index.cmp(&left.index));
        dead.dedup_by_key(|entry| entry.index);

        let mut evicted = Vec::with_capacity(dead.len());
        for DeadClient { index, error } in dead {
            if index >= self.clients.len() {
                continue;
            }
            let mut client = self.clients.swap_remove(index);
            if let Err(close_error) = client.stream.close() {
                debug!(
                    target: SERVER_TARGET,
                    client = %client.id,
                    error = %close_error,
                    "error closing evicted client"
                );
            }
            evicted.push(Evicted {
                id: client.id,
                peer: client.peer,
                reason: error,
            });
        }
        evicted
    }

    /// Closes every client and empties the registry.
    pub fn shutdown(&mut self) {
        for mut client in self.clients.drain(..) {
            if let Err(error) = client.stream.close() {
                debug!(
                    target: SERVER_TARGET,
                    client = %client.id,
                    error = %error,
                    "error closing client during shutdown"
                );
            }
        }
    }
}
