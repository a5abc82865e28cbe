//! In-memory stream used to exercise the codec and client registry.

use std::cell::Cell;
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::rc::Rc;

use super::FrameStream;

/// Scripted [`FrameStream`] double.
///
/// Each inbound chunk is delivered by at most one `read` call, so tests can
/// split a frame across reads. Once the chunks run out the stream reports
/// end-of-file when closed and `WouldBlock` otherwise.
#[derive(Debug, Default)]
pub(crate) struct MemoryStream {
    inbound: VecDeque<Vec<u8>>,
    closed: bool,
    fail_writes: bool,
    shut_down: Rc<Cell<bool>>,
    outbound: Vec<u8>,
    blocking_changes: Vec<bool>,
}

impl MemoryStream {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_chunk(mut self, chunk: &[u8]) -> Self {
        self.inbound.push_back(chunk.to_vec());
        self
    }

    pub(crate) fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    pub(crate) fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub(crate) fn outbound(&self) -> &[u8] {
        &self.outbound
    }

    pub(crate) fn blocking_changes(&self) -> &[bool] {
        &self.blocking_changes
    }

    /// Shared flag set once the stream is closed, observable after the
    /// stream itself has been dropped.
    pub(crate) fn close_probe(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.shut_down)
    }
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(chunk) = self.inbound.front_mut() else {
            return if self.closed {
                Ok(0)
            } else {
                Err(io::Error::from(io::ErrorKind::WouldBlock))
            };
        };
        let count = chunk.len().min(buf.len());
        for (slot, byte) in buf.iter_mut().zip(chunk.drain(..count)) {
            *slot = byte;
        }
        if chunk.is_empty() {
            self.inbound.pop_front();
        }
        Ok(count)
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        self.outbound.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FrameStream for MemoryStream {
    fn set_blocking(&mut self, blocking: bool) -> io::Result<()> {
        self.blocking_changes.push(blocking);
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.shut_down.set(true);
        Ok(())
    }
}
