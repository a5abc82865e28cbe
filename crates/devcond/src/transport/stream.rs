//! Byte streams the frame codec can drive.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

/// A bidirectional client stream whose blocking mode can be switched.
///
/// Client streams normally sit in non-blocking mode so a tick can poll for a
/// frame header without stalling. The codec switches to blocking mode to
/// finish a frame once its header has started to arrive, and while writing.
pub trait FrameStream: Read + Write {
    /// Switches between blocking and non-blocking I/O.
    fn set_blocking(&mut self, blocking: bool) -> io::Result<()>;

    /// Shuts down both directions of the stream.
    fn close(&mut self) -> io::Result<()>;
}

impl FrameStream for TcpStream {
    fn set_blocking(&mut self, blocking: bool) -> io::Result<()> {
        self.set_nonblocking(!blocking)
    }

    fn close(&mut self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            Err(error) if error.kind() != io::ErrorKind::NotConnected => Err(error),
            _ => Ok(()),
        }
    }
}
