//! BDD test world: a live console server plus the clients talking to it.

use std::cell::RefCell;
use std::sync::Arc;

use devcon_config::ListenEndpoint;

use crate::server::{ConsoleServer, ServerOptions};
use crate::transport::ConsoleListener;

use super::client::{TestClient, tick_until};
use super::reporter::{HealthEvent, RecordingHealthReporter};
use super::sink::RecordingCommandSink;

/// Scenario world shared across BDD steps.
pub struct ConsoleWorld {
    server: Option<ConsoleServer<RecordingCommandSink>>,
    clients: Vec<Option<TestClient>>,
    pub sink: RecordingCommandSink,
    pub reporter: Arc<RecordingHealthReporter>,
}

impl ConsoleWorld {
    /// Builds a world with no server running.
    #[must_use]
    pub fn new() -> Self {
        Self {
            server: None,
            clients: Vec::new(),
            sink: RecordingCommandSink::default(),
            reporter: Arc::new(RecordingHealthReporter::default()),
        }
    }

    /// Binds a server on an ephemeral loopback port.
    pub fn start_server(&mut self) {
        let listener =
            ConsoleListener::bind(&ListenEndpoint::tcp("127.0.0.1", 0)).expect("bind listener");
        self.server = Some(ConsoleServer::new(
            listener,
            self.sink.clone(),
            self.reporter.clone(),
            ServerOptions::default(),
        ));
    }

    /// The running server.
    pub fn server_mut(&mut self) -> &mut ConsoleServer<RecordingCommandSink> {
        self.server.as_mut().expect("console server should be running")
    }

    /// Connects `count` clients and waits until the server registered them.
    pub fn connect_clients(&mut self, count: usize) {
        let server = self.server_mut();
        let addr = server.local_addr().expect("listener address");
        let expected = server.client_count() + count;
        let clients: Vec<_> = (0..count).map(|_| TestClient::connect(addr)).collect();
        assert!(
            tick_until(server, |server| server.client_count() == expected),
            "server did not register {count} clients"
        );
        self.clients.extend(clients.into_iter().map(Some));
    }

    /// Mutable access to the client numbered from one.
    pub fn client(&mut self, number: usize) -> &mut TestClient {
        self.clients
            .get_mut(number - 1)
            .and_then(Option::as_mut)
            .expect("client should be connected")
    }

    /// Closes the client numbered from one.
    pub fn disconnect(&mut self, number: usize) {
        let slot = self.clients.get_mut(number - 1).expect("known client");
        *slot = None;
    }

    /// Sends `json` from the client numbered from one.
    pub fn send(&mut self, number: usize, json: &str) {
        self.client(number).send(json);
    }

    /// Ticks until the given client receives a frame.
    pub fn await_frame(&mut self, number: usize) -> Option<String> {
        let mut client = self
            .clients
            .get_mut(number - 1)
            .and_then(Option::take)
            .expect("client should be connected");
        let mut frame = None;
        tick_until(self.server_mut(), |_| {
            frame = client.receive();
            frame.is_some()
        });
        if let Some(slot) = self.clients.get_mut(number - 1) {
            *slot = Some(client);
        }
        frame
    }

    /// Ticks until `done` holds for the world's recorders.
    pub fn tick_until_recorded(
        &mut self,
        mut done: impl FnMut(&RecordingCommandSink, &[HealthEvent]) -> bool,
    ) -> bool {
        let sink = self.sink.clone();
        let reporter = Arc::clone(&self.reporter);
        tick_until(self.server_mut(), |_| done(&sink, &reporter.events()))
    }

    /// Ticks a handful of times without waiting for anything.
    pub fn settle(&mut self) {
        let server = self.server_mut();
        for _ in 0..5 {
            server.update();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }

    /// Ticks until the server tracks exactly `count` clients.
    pub fn await_client_count(&mut self, count: usize) -> bool {
        tick_until(self.server_mut(), |server| server.client_count() == count)
    }
}

/// Builds a fresh scenario world.
#[must_use]
pub fn world() -> RefCell<ConsoleWorld> {
    RefCell::new(ConsoleWorld::new())
}
