//! Lifecycle notifications for startup and for client churn.

use std::net::SocketAddr;
use std::sync::Arc;

use devcon_config::Config;

use crate::bootstrap::BootstrapError;
use crate::protocol::ProtocolError;
use crate::server::ClientId;
use crate::transport::TransportError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Receives server lifecycle notifications.
///
/// Calls happen synchronously on the thread driving the server, so
/// implementations should return quickly.
pub trait HealthReporter: Send + Sync {
    /// Startup has begun; no configuration is loaded yet.
    fn bootstrap_starting(&self);

    /// The listener is bound with `config`.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Startup stopped at the stage named by `error`.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// `client` was accepted from `peer` and now receives broadcasts.
    fn client_connected(&self, client: ClientId, peer: SocketAddr);

    /// `client` was closed and dropped after `reason`.
    fn client_evicted(&self, client: ClientId, peer: SocketAddr, reason: &TransportError);

    /// A frame from `client` was discarded without a reply.
    fn message_rejected(&self, client: ClientId, error: &ProtocolError);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn client_connected(&self, client: ClientId, peer: SocketAddr) {
        (**self).client_connected(client, peer);
    }

    fn client_evicted(&self, client: ClientId, peer: SocketAddr, reason: &TransportError) {
        (**self).client_evicted(client, peer, reason);
    }

    fn message_rejected(&self, client: ClientId, error: &ProtocolError) {
        (**self).message_rejected(client, error);
    }
}

/// Emits each notification as a `tracing` event with an `event` field.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Creates the reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting console bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            listen = %config.listen(),
            wait_for_client = config.wait_for_client(),
            message_escaping = %config.message_escaping(),
            log_filter = %config.log_filter(),
            log_format = ?config.log_format(),
            "console bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "console bootstrap failed"
        );
    }

    fn client_connected(&self, client: ClientId, peer: SocketAddr) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "client_connected",
            client = %client,
            peer = %peer,
            "console client connected"
        );
    }

    fn client_evicted(&self, client: ClientId, peer: SocketAddr, reason: &TransportError) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "client_evicted",
            client = %client,
            peer = %peer,
            reason = %reason,
            "console client evicted"
        );
    }

    fn message_rejected(&self, client: ClientId, error: &ProtocolError) {
        tracing::warn!(
            target: HEALTH_TARGET,
            event = "message_rejected",
            client = %client,
            error = %error,
            "dropped invalid console message"
        );
    }
}
