//! TCP plumbing for the console server.
//!
//! The listener accepts debug clients without blocking, and the frame codec
//! moves length-prefixed JSON messages over each client stream. Everything
//! here runs on the thread that drives the server tick.

mod errors;
mod frame;
mod listener;
mod stream;
#[cfg(test)]
mod test_utils;

pub use self::errors::{ListenerError, TransportError};
pub use self::frame::{FrameCodec, HEADER_LEN};
pub use self::listener::ConsoleListener;
pub use self::stream::FrameStream;
#[cfg(test)]
pub(crate) use self::test_utils::MemoryStream;

const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
