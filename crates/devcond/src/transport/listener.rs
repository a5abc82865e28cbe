//! Non-blocking TCP listener for console clients.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use devcon_config::ListenEndpoint;

use super::{ListenerError, TRANSPORT_TARGET, TransportError};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// Listening socket the console server accepts clients from.
///
/// The socket is non-blocking, so [`ConsoleListener::accept_pending`] can be
/// called once per tick. Dropping the listener closes the socket.
#[derive(Debug)]
pub struct ConsoleListener {
    endpoint: ListenEndpoint,
    listener: TcpListener,
}

impl ConsoleListener {
    /// Resolves and binds `endpoint`, then switches the socket to
    /// non-blocking mode.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError`] when the host does not resolve, the port is
    /// unavailable or the socket rejects non-blocking mode.
    pub fn bind(endpoint: &ListenEndpoint) -> Result<Self, ListenerError> {
        let listener = bind_tcp(endpoint.host(), endpoint.port())?;
        listener
            .set_nonblocking(true)
            .map_err(|source| ListenerError::NonBlocking { source })?;
        info!(
            target: TRANSPORT_TARGET,
            endpoint = %endpoint,
            local_addr = ?listener.local_addr().ok(),
            "console listener bound"
        );
        Ok(Self {
            endpoint: endpoint.clone(),
            listener,
        })
    }

    /// Endpoint the listener was configured with.
    #[must_use]
    pub const fn endpoint(&self) -> &ListenEndpoint {
        &self.endpoint
    }

    /// Address the socket is actually bound to, useful when port 0 was
    /// requested.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr().ok()
    }

    /// Accepts one waiting connection without blocking.
    ///
    /// Accepted streams are placed in non-blocking mode with Nagle's
    /// algorithm disabled.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the accept call fails for a reason
    /// other than an empty backlog.
    pub fn accept_pending(&self) -> Result<Option<(TcpStream, SocketAddr)>, TransportError> {
        match self.listener.accept() {
            Ok((stream, peer)) => {
                prepare_stream(&stream)?;
                debug!(target: TRANSPORT_TARGET, peer = %peer, "accepted connection");
                Ok(Some((stream, peer)))
            }
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Polls until a client connects.
    ///
    /// Transient accept failures are logged once per error kind and retried
    /// after a short backoff.
    pub fn wait_for_client(&self) -> (TcpStream, SocketAddr) {
        info!(
            target: TRANSPORT_TARGET,
            endpoint = %self.endpoint,
            "waiting for the first console client"
        );
        let mut last_error = None::<String>;
        loop {
            match self.accept_pending() {
                Ok(Some(accepted)) => return accepted,
                Ok(None) => thread::sleep(ACCEPT_BACKOFF),
                Err(error) => {
                    let rendered = error.to_string();
                    if last_error.as_deref() != Some(rendered.as_str()) {
                        warn!(
                            target: TRANSPORT_TARGET,
                            error = %error,
                            "console accept error"
                        );
                    }
                    last_error = Some(rendered);
                    thread::sleep(ERROR_BACKOFF);
                }
            }
        }
    }
}

fn prepare_stream(stream: &TcpStream) -> io::Result<()> {
    stream.set_nonblocking(true)?;
    stream.set_nodelay(true)
}

fn bind_tcp(host: &str, port: u16) -> Result<TcpListener, ListenerError> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_string(),
            port,
            source,
        })?;
    let addr = addrs.next().ok_or_else(|| ListenerError::ResolveEmpty {
        host: host.to_string(),
        port,
    })?;
    TcpListener::bind(addr).map_err(|source| ListenerError::BindTcp { addr, source })
}
