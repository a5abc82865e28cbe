//! Length-prefixed framing for console messages.
//!
//! Each frame is a 4-byte little-endian body length followed by that many
//! bytes of UTF-8 JSON. No terminator is sent; the end of the body is the
//! end of the message.

use std::io::{self, Read};

use tracing::trace;

use super::{FrameStream, TRANSPORT_TARGET, TransportError};

/// Size of the length prefix in bytes.
pub const HEADER_LEN: usize = 4;

/// Reads and writes frames on a [`FrameStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCodec {
    max_frame_bytes: u32,
}

impl FrameCodec {
    /// Builds a codec that rejects inbound bodies longer than `max_frame_bytes`.
    #[must_use]
    pub const fn new(max_frame_bytes: u32) -> Self {
        Self { max_frame_bytes }
    }

    /// Inbound body limit.
    #[must_use]
    pub const fn max_frame_bytes(&self) -> u32 {
        self.max_frame_bytes
    }

    /// Encodes `json` as a complete frame.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::MessageTooLong`] when the body does not fit
    /// the 32-bit length prefix.
    pub fn encode(json: &str) -> Result<Vec<u8>, TransportError> {
        let length = body_length(json)?;
        let mut frame = Vec::with_capacity(HEADER_LEN + json.len());
        frame.extend_from_slice(&length.to_le_bytes());
        frame.extend_from_slice(json.as_bytes());
        Ok(frame)
    }

    /// Writes one frame, blocking until it has been handed to the socket.
    ///
    /// The stream is switched to blocking mode for the duration of the write
    /// and returned to non-blocking mode afterwards, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::RemoteClosed`] when the peer has gone away
    /// and [`TransportError::Io`] for any other socket failure.
    pub fn write<S>(&self, stream: &mut S, json: &str) -> Result<(), TransportError>
    where
        S: FrameStream + ?Sized,
    {
        let length = body_length(json)?;
        stream.set_blocking(true)?;
        let written = write_parts(stream, length, json.as_bytes());
        let restored = stream.set_blocking(false);
        written?;
        restored?;
        trace!(target: TRANSPORT_TARGET, length, "frame written");
        Ok(())
    }

    /// Reads one frame if its header has started to arrive.
    ///
    /// The header is first polled without blocking. `Ok(None)` means nothing
    /// was waiting. Once any header byte is available the rest of the header
    /// and the body are read in blocking mode, so a frame is never returned
    /// half read.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::RemoteClosed`] when the peer closed the
    /// connection, [`TransportError::FrameTooLarge`] when the header exceeds
    /// the configured limit and [`TransportError::Io`] for other failures.
    pub fn read<S>(&self, stream: &mut S) -> Result<Option<Vec<u8>>, TransportError>
    where
        S: FrameStream + ?Sized,
    {
        let mut header = [0_u8; HEADER_LEN];
        let received = match read_retrying(stream, &mut header) {
            Ok(0) => return Err(TransportError::RemoteClosed),
            Ok(received) => received,
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        stream.set_blocking(true)?;
        let body = self.finish_frame(stream, &mut header, received);
        let restored = stream.set_blocking(false);
        let body = body?;
        restored?;
        Ok(Some(body))
    }

    fn finish_frame<S>(
        &self,
        stream: &mut S,
        header: &mut [u8; HEADER_LEN],
        received: usize,
    ) -> Result<Vec<u8>, TransportError>
    where
        S: FrameStream + ?Sized,
    {
        if let Some(rest) = header.get_mut(received..) {
            stream.read_exact(rest)?;
        }
        let length = u32::from_le_bytes(*header);
        if length > self.max_frame_bytes {
            return Err(TransportError::FrameTooLarge {
                length,
                max: self.max_frame_bytes,
            });
        }
        let size = usize::try_from(length).map_err(|_| TransportError::FrameTooLarge {
            length,
            max: self.max_frame_bytes,
        })?;
        let mut body = vec![0_u8; size];
        stream.read_exact(&mut body)?;
        trace!(target: TRANSPORT_TARGET, length, "frame read");
        Ok(body)
    }
}

fn body_length(json: &str) -> Result<u32, TransportError> {
    u32::try_from(json.len()).map_err(|_| TransportError::MessageTooLong { length: json.len() })
}

fn write_parts<S>(stream: &mut S, length: u32, body: &[u8]) -> Result<(), TransportError>
where
    S: FrameStream + ?Sized,
{
    stream.write_all(&length.to_le_bytes())?;
    stream.write_all(body)?;
    stream.flush()?;
    Ok(())
}

fn read_retrying<S>(stream: &mut S, buffer: &mut [u8]) -> io::Result<usize>
where
    S: Read + ?Sized,
{
    loop {
        match stream.read(buffer) {
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::transport::MemoryStream;

    #[fixture]
    fn codec() -> FrameCodec {
        FrameCodec::new(1024)
    }

    #[test]
    fn header_is_little_endian_length() {
        let frame = FrameCodec::encode(r#"{"type":"pong"}"#).expect("encode");
        assert_eq!(frame.get(..HEADER_LEN), Some(&[15_u8, 0, 0, 0][..]));
        assert_eq!(frame.get(HEADER_LEN..), Some(&br#"{"type":"pong"}"#[..]));
    }

    fn write_then_read(codec: FrameCodec, json: &str) -> Result<Vec<u8>, TransportError> {
        let mut writer = MemoryStream::new();
        codec.write(&mut writer, json)?;
        let mut reader = MemoryStream::new().with_chunk(writer.outbound());
        codec
            .read(&mut reader)
            .map(|frame| frame.expect("frame should be waiting"))
    }

    #[rstest]
    #[case::empty("")]
    #[case::ping(r#"{"type":"ping"}"#)]
    #[case::multibyte(r#"{"type":"script","script":"print('héllo ☺ 日本')"}"#)]
    #[case::four_byte_scalars("[\"\u{1f980}\u{1f980}\"]")]
    fn written_frames_read_back(codec: FrameCodec, #[case] json: &str) {
        let body = write_then_read(codec, json).expect("round trip");
        assert_eq!(String::from_utf8(body).expect("utf8"), json);
    }

    #[rstest]
    fn body_at_the_limit_is_accepted(codec: FrameCodec) {
        let json = "x".repeat(1024);
        let body = write_then_read(codec, &json).expect("at limit");
        assert_eq!(body.len(), 1024);
    }

    #[rstest]
    fn body_one_past_the_limit_is_rejected(codec: FrameCodec) {
        let json = "x".repeat(1025);
        let error = write_then_read(codec, &json).expect_err("over limit");
        assert!(matches!(
            error,
            TransportError::FrameTooLarge {
                length: 1025,
                max: 1024
            }
        ));
    }

    #[rstest]
    fn limit_counts_bytes_not_characters(codec: FrameCodec) {
        // 342 three-byte characters make 1026 bytes.
        let json = "\u{263a}".repeat(342);
        let error = write_then_read(codec, &json).expect_err("over limit");
        assert!(matches!(
            error,
            TransportError::FrameTooLarge { length: 1026, .. }
        ));
    }

    #[rstest]
    fn write_restores_non_blocking_mode(codec: FrameCodec) {
        let mut stream = MemoryStream::new();
        codec.write(&mut stream, "{}").expect("write");
        assert_eq!(stream.blocking_changes(), &[true, false]);
    }

    #[rstest]
    fn idle_stream_yields_nothing(codec: FrameCodec) {
        let mut stream = MemoryStream::new();
        assert!(codec.read(&mut stream).expect("poll").is_none());
        assert!(stream.blocking_changes().is_empty());
    }

    #[rstest]
    fn closed_stream_reports_remote_closed(codec: FrameCodec) {
        let mut stream = MemoryStream::new().closed();
        let error = codec.read(&mut stream).expect_err("closed");
        assert!(matches!(error, TransportError::RemoteClosed));
    }

    #[rstest]
    fn split_header_is_completed_in_blocking_mode(codec: FrameCodec) {
        let frame = FrameCodec::encode("[1]").expect("encode");
        let (head, tail) = frame.split_at(2);
        let mut stream = MemoryStream::new().with_chunk(head).with_chunk(tail);

        let body = codec.read(&mut stream).expect("read").expect("frame");
        assert_eq!(body, b"[1]");
        assert_eq!(stream.blocking_changes(), &[true, false]);
    }

    #[rstest]
    fn truncated_body_reports_remote_closed(codec: FrameCodec) {
        let mut stream = MemoryStream::new()
            .with_chunk(&[10, 0, 0, 0])
            .with_chunk(b"{}")
            .closed();
        let error = codec.read(&mut stream).expect_err("truncated");
        assert!(matches!(error, TransportError::RemoteClosed));
        assert_eq!(stream.blocking_changes(), &[true, false]);
    }

    #[rstest]
    fn oversized_header_is_rejected(codec: FrameCodec) {
        let mut stream = MemoryStream::new().with_chunk(&2048_u32.to_le_bytes());
        let error = codec.read(&mut stream).expect_err("too large");
        assert!(matches!(
            error,
            TransportError::FrameTooLarge {
                length: 2048,
                max: 1024
            }
        ));
    }

    #[rstest]
    fn empty_body_is_a_valid_frame(codec: FrameCodec) {
        let mut stream = MemoryStream::new().with_chunk(&[0, 0, 0, 0]);
        let body = codec.read(&mut stream).expect("read").expect("frame");
        assert!(body.is_empty());
    }

    #[rstest]
    fn consecutive_frames_are_read_one_at_a_time(codec: FrameCodec) {
        let mut bytes = FrameCodec::encode("1").expect("first");
        bytes.extend(FrameCodec::encode("22").expect("second"));
        let mut stream = MemoryStream::new().with_chunk(&bytes);

        assert_eq!(codec.read(&mut stream).expect("first").as_deref(), Some(&b"1"[..]));
        assert_eq!(codec.read(&mut stream).expect("second").as_deref(), Some(&b"22"[..]));
        assert!(codec.read(&mut stream).expect("drained").is_none());
    }

    #[rstest]
    fn write_failures_surface_as_remote_closed(codec: FrameCodec) {
        let mut stream = MemoryStream::new().failing_writes();
        let error = codec.write(&mut stream, "{}").expect_err("broken pipe");
        assert!(matches!(error, TransportError::RemoteClosed));
        assert_eq!(stream.blocking_changes(), &[true, false]);
    }

    mod properties {
        use proptest::prelude::*;
        use proptest::sample::Index;

        use super::super::*;
        use crate::transport::MemoryStream;

        proptest! {
            #[test]
            fn any_text_survives_a_round_trip(json in "\\PC{0,256}") {
                let codec = FrameCodec::new(u32::MAX);
                let mut writer = MemoryStream::new();
                codec.write(&mut writer, &json).expect("write");
                let mut reader = MemoryStream::new().with_chunk(writer.outbound());
                let body = codec.read(&mut reader).expect("read").expect("frame");
                prop_assert_eq!(String::from_utf8(body).expect("utf8"), json);
            }

            #[test]
            fn split_delivery_yields_the_same_body(
                json in "\\PC{0,64}",
                split in any::<Index>(),
            ) {
                let codec = FrameCodec::new(u32::MAX);
                let frame = FrameCodec::encode(&json).expect("encode");
                let at = split.index(frame.len() - 1) + 1;
                let (head, tail) = frame.split_at(at);
                let mut stream = MemoryStream::new().with_chunk(head).with_chunk(tail);
                let body = codec.read(&mut stream).expect("read").expect("frame");
                prop_assert_eq!(body, json.into_bytes());
                prop_assert!(codec.read(&mut stream).expect("drained").is_none());
            }
        }
    }
}
