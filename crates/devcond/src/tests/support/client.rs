//! Blocking console client used against a real listener.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::{Duration, Instant};

use crate::protocol::CommandSink;
use crate::server::ConsoleServer;

const READ_TIMEOUT: Duration = Duration::from_millis(200);
const TICK_DEADLINE: Duration = Duration::from_secs(2);

/// Minimal client speaking the console framing.
pub struct TestClient {
    stream: TcpStream,
}

impl TestClient {
    /// Connects to `addr`.
    pub fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).expect("connect console client");
        stream
            .set_read_timeout(Some(READ_TIMEOUT))
            .expect("set read timeout");
        Self { stream }
    }

    /// Sends `json` as one frame.
    pub fn send(&mut self, json: &str) {
        self.send_raw(json.as_bytes());
    }

    /// Sends `body` as one frame without checking its contents.
    pub fn send_raw(&mut self, body: &[u8]) {
        let length = u32::try_from(body.len()).expect("frame length fits u32");
        self.stream
            .write_all(&length.to_le_bytes())
            .expect("write header");
        self.stream.write_all(body).expect("write body");
        self.stream.flush().expect("flush");
    }

    /// Reads one frame, returning `None` if nothing arrives in time.
    pub fn receive(&mut self) -> Option<String> {
        let mut header = [0_u8; 4];
        match self.stream.read_exact(&mut header) {
            Ok(()) => {}
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::WouldBlock
                        | io::ErrorKind::TimedOut
                        | io::ErrorKind::UnexpectedEof
                ) =>
            {
                return None;
            }
            Err(error) => panic!("read header: {error}"),
        }
        let length = usize::try_from(u32::from_le_bytes(header)).expect("length fits usize");
        let mut body = vec![0_u8; length];
        self.stream.read_exact(&mut body).expect("read body");
        Some(String::from_utf8(body).expect("utf8 body"))
    }

    /// Returns `true` once the server has closed the connection.
    pub fn is_closed_by_server(&mut self) -> bool {
        let mut probe = [0_u8; 1];
        match self.stream.read(&mut probe) {
            Ok(0) => true,
            Ok(_) => false,
            Err(error) => matches!(
                error.kind(),
                io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted
            ),
        }
    }
}

/// Ticks `server` until `done` holds, giving up after a short deadline.
pub fn tick_until<K>(
    server: &mut ConsoleServer<K>,
    mut done: impl FnMut(&ConsoleServer<K>) -> bool,
) -> bool
where
    K: CommandSink,
{
    let deadline = Instant::now() + TICK_DEADLINE;
    while Instant::now() < deadline {
        server.update();
        if done(server) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}
