//! In-memory [`HealthReporter`].

use std::net::SocketAddr;
use std::sync::Mutex;

use devcon_config::Config;

use crate::bootstrap::BootstrapError;
use crate::health::HealthReporter;
use crate::protocol::ProtocolError;
use crate::server::ClientId;
use crate::transport::TransportError;

/// Notification as seen by [`RecordingHealthReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded,
    BootstrapFailed(String),
    ClientConnected(ClientId),
    ClientEvicted(ClientId),
    MessageRejected { client: ClientId, error: String },
}

/// Keeps every notification in arrival order.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Snapshot of the notifications so far.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn client_connected(&self, client: ClientId, _peer: SocketAddr) {
        self.record(HealthEvent::ClientConnected(client));
    }

    fn client_evicted(&self, client: ClientId, _peer: SocketAddr, _reason: &TransportError) {
        self.record(HealthEvent::ClientEvicted(client));
    }

    fn message_rejected(&self, client: ClientId, error: &ProtocolError) {
        self.record(HealthEvent::MessageRejected {
            client,
            error: error.to_string(),
        });
    }
}
