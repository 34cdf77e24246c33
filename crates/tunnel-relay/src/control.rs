// Copyright 2024-2026 Farlight Networks, LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Message-level reader and writer over a control connection half.
//!
//! Combines the proto crate's framing and codec so session tasks deal in
//! whole [`ControlMessage`]s. The reader distinguishes a clean end-of-stream
//! (`Ok(None)`) from every other fault.

use crate::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;
use tunnel_relay_proto::{BincodeCodec, Codec, ControlMessage, FrameReader, FrameWriter, WireError};

const READ_CHUNK: usize = 4096;

/// Reads control messages from the read half of a connection.
pub struct ControlReader<R> {
    recv: R,
    frames: FrameReader,
    codec: BincodeCodec,
    chunk: Vec<u8>,
}

impl<R: AsyncRead + Send + Unpin> ControlReader<R> {
    /// Creates a reader over the given read half.
    pub fn new(recv: R) -> Self {
        Self {
            recv,
            frames: FrameReader::with_capacity(READ_CHUNK),
            codec: BincodeCodec::new(),
            chunk: vec![0u8; READ_CHUNK],
        }
    }

    /// Reads the next control message.
    ///
    /// Returns `Ok(None)` when the peer has cleanly closed its write side
    /// with no partial frame outstanding.
    ///
    /// # Errors
    ///
    /// Returns an error on transport faults, framing violations, undecodable
    /// messages, and streams that end mid-frame.
    pub async fn read_message(&mut self) -> Result<Option<ControlMessage>, Error> {
        loop {
            if let Some(frame) = self.frames.next_frame()? {
                let message = self.codec.decode(&frame)?;
                trace!(kind = message.kind(), len = frame.len(), "received message");
                return Ok(Some(message));
            }

            let n = self.recv.read(&mut self.chunk).await?;
            if n == 0 {
                if self.frames.is_mid_frame() {
                    return Err(WireError::TruncatedFrame {
                        buffered: self.frames.buffered(),
                    }
                    .into());
                }
                return Ok(None);
            }
            self.frames.extend(&self.chunk[..n]);
        }
    }
}

/// Writes control messages to the write half of a connection.
pub struct ControlWriter<W> {
    send: W,
    frames: FrameWriter,
    codec: BincodeCodec,
}

impl<W: AsyncWrite + Send + Unpin> ControlWriter<W> {
    /// Creates a writer over the given write half.
    pub fn new(send: W) -> Self {
        Self {
            send,
            frames: FrameWriter::with_capacity(READ_CHUNK),
            codec: BincodeCodec::new(),
        }
    }

    /// Encodes, frames, and writes one control message, flushing it to the
    /// transport before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, framing, or the write fails.
    pub async fn write_message(&mut self, message: &ControlMessage) -> Result<(), Error> {
        let payload = self.codec.encode(message)?;
        self.frames.push(&payload)?;
        let bytes = self.frames.take();
        trace!(kind = message.kind(), len = bytes.len(), "sending message");
        self.send.write_all(&bytes).await?;
        self.send.flush().await?;
        Ok(())
    }

    /// Gracefully shuts down the write side, signaling end-of-stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the shutdown fails.
    pub async fn shutdown(&mut self) -> Result<(), Error> {
        self.send.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunnel_relay_proto::{Register, TunnelProtocol};
    use tunnel_relay_transport::{mock_connection_pair, Connection};

    fn message_pipe() -> (
        ControlWriter<tunnel_relay_transport::MockWriteHalf>,
        ControlReader<tunnel_relay_transport::MockReadHalf>,
    ) {
        let (conn_a, conn_b) = mock_connection_pair();
        let (_read_a, write_a) = conn_a.into_split();
        let (read_b, _write_b) = conn_b.into_split();
        (ControlWriter::new(write_a), ControlReader::new(read_b))
    }

    #[tokio::test]
    async fn message_round_trip() {
        let (mut writer, mut reader) = message_pipe();

        let message = ControlMessage::Register(
            Register::new(TunnelProtocol::Tcp).with_client_id("round-trip"),
        );
        writer.write_message(&message).await.expect("write");

        let received = reader
            .read_message()
            .await
            .expect("read should succeed")
            .expect("should have message");
        assert_eq!(received, message);
    }

    #[tokio::test]
    async fn messages_preserve_order() {
        let (mut writer, mut reader) = message_pipe();

        writer.write_message(&ControlMessage::Ping).await.expect("write 1");
        writer
            .write_message(&ControlMessage::VersionRequest)
            .await
            .expect("write 2");
        writer.write_message(&ControlMessage::Pong).await.expect("write 3");

        assert_eq!(
            reader.read_message().await.unwrap(),
            Some(ControlMessage::Ping)
        );
        assert_eq!(
            reader.read_message().await.unwrap(),
            Some(ControlMessage::VersionRequest)
        );
        assert_eq!(
            reader.read_message().await.unwrap(),
            Some(ControlMessage::Pong)
        );
    }

    #[tokio::test]
    async fn clean_shutdown_returns_none() {
        let (mut writer, mut reader) = message_pipe();

        writer.write_message(&ControlMessage::Ping).await.expect("write");
        writer.shutdown().await.expect("shutdown");

        assert_eq!(
            reader.read_message().await.unwrap(),
            Some(ControlMessage::Ping)
        );
        assert_eq!(reader.read_message().await.unwrap(), None);
    }

    #[tokio::test]
    async fn eof_mid_frame_is_an_error() {
        let (conn_a, conn_b) = mock_connection_pair();
        let (_read_a, mut write_a) = conn_a.into_split();
        let (read_b, _write_b) = conn_b.into_split();
        let mut reader = ControlReader::new(read_b);

        // Announce a 100-byte frame, deliver 3 bytes, then close.
        write_a.write_all(&100u32.to_be_bytes()).await.expect("write");
        write_a.write_all(b"abc").await.expect("write");
        write_a.shutdown().await.expect("shutdown");

        let err = reader.read_message().await.expect_err("read should fail");
        assert!(matches!(
            err,
            Error::Wire(WireError::TruncatedFrame { .. })
        ));
    }

    #[tokio::test]
    async fn oversized_frame_is_an_error() {
        let (conn_a, conn_b) = mock_connection_pair();
        let (_read_a, mut write_a) = conn_a.into_split();
        let (read_b, _write_b) = conn_b.into_split();
        let mut reader = ControlReader::new(read_b);

        write_a.write_all(&[0xff; 4]).await.expect("write");

        let err = reader.read_message().await.expect_err("read should fail");
        assert!(matches!(err, Error::Wire(WireError::FrameTooLarge { .. })));
    }

    #[tokio::test]
    async fn write_after_reset_is_an_error() {
        let (conn_a, _conn_b) = mock_connection_pair();
        let (_read_a, mut write_a) = conn_a.into_split();
        write_a.reset();
        let mut writer = ControlWriter::new(write_a);

        let err = writer
            .write_message(&ControlMessage::Pong)
            .await
            .expect_err("write should fail");
        assert!(matches!(err, Error::Transport(_)));
    }
}
