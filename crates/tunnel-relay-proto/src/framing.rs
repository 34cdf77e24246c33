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

//! Length-prefixed framing for control messages.
//!
//! Every control message is transmitted as a length-prefixed frame:
//!
//! ```text
//! ┌──────────────────┬─────────────────────────────────┐
//! │ Length (4 bytes) │         Payload (N bytes)       │
//! │    big-endian    │      codec-encoded message      │
//! └──────────────────┴─────────────────────────────────┘
//! ```
//!
//! Frames larger than [`MAX_FRAME_SIZE`] are rejected.

use crate::WireError;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Maximum frame payload size (64 KiB).
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

/// Length prefix size in bytes.
const LENGTH_PREFIX_SIZE: usize = 4;

/// Incremental reader for length-prefixed frames.
///
/// Bytes are fed in as they arrive from the stream; [`next_frame`]
/// yields complete payloads as soon as they are available.
///
/// [`next_frame`]: FrameReader::next_frame
#[derive(Debug, Default)]
pub struct FrameReader {
    /// Bytes received but not yet consumed.
    buffer: BytesMut,
    /// Payload length of the frame currently being assembled, once its
    /// prefix has been consumed from the buffer.
    pending_len: Option<usize>,
}

impl FrameReader {
    /// Creates an empty frame reader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frame reader with the given initial buffer capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            pending_len: None,
        }
    }

    /// Appends freshly received bytes.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Attempts to extract the next complete frame payload.
    ///
    /// Returns `Ok(None)` when more bytes are needed.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::FrameTooLarge`] if a frame declares a payload
    /// larger than [`MAX_FRAME_SIZE`].
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>, WireError> {
        if self.pending_len.is_none() {
            if self.buffer.len() < LENGTH_PREFIX_SIZE {
                return Ok(None);
            }
            let len = self.buffer.get_u32() as usize;
            if len > MAX_FRAME_SIZE {
                return Err(WireError::FrameTooLarge { size: len });
            }
            self.pending_len = Some(len);
        }

        match self.pending_len {
            Some(len) if self.buffer.len() >= len => {
                self.pending_len = None;
                Ok(Some(self.buffer.split_to(len).to_vec()))
            }
            _ => Ok(None),
        }
    }

    /// Bytes of an unfinished frame currently held, including a consumed
    /// length prefix.
    #[must_use]
    pub fn buffered(&self) -> usize {
        let prefix = if self.pending_len.is_some() {
            LENGTH_PREFIX_SIZE
        } else {
            0
        };
        prefix + self.buffer.len()
    }

    /// Returns true if the reader holds a partially received frame.
    ///
    /// Used to distinguish a clean end-of-stream from one that cuts a
    /// frame short.
    #[must_use]
    pub fn is_mid_frame(&self) -> bool {
        self.pending_len.is_some() || !self.buffer.is_empty()
    }
}

/// Builder for outgoing length-prefixed frames.
#[derive(Debug, Default)]
pub struct FrameWriter {
    buffer: BytesMut,
}

impl FrameWriter {
    /// Creates an empty frame writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frame writer with the given initial buffer capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Appends one frame wrapping the given payload.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::FrameTooLarge`] if the payload exceeds
    /// [`MAX_FRAME_SIZE`].
    pub fn push(&mut self, payload: &[u8]) -> Result<(), WireError> {
        if payload.len() > MAX_FRAME_SIZE {
            return Err(WireError::FrameTooLarge {
                size: payload.len(),
            });
        }
        self.buffer.reserve(LENGTH_PREFIX_SIZE + payload.len());
        self.buffer.put_u32(payload.len() as u32);
        self.buffer.put_slice(payload);
        Ok(())
    }

    /// Takes all framed bytes accumulated so far, leaving the writer empty.
    #[must_use]
    pub fn take(&mut self) -> Bytes {
        self.buffer.split().freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_round_trip() {
        let mut writer = FrameWriter::new();
        writer.push(b"hello").expect("push should succeed");
        let bytes = writer.take();

        let mut reader = FrameReader::new();
        reader.extend(&bytes);
        let frame = reader
            .next_frame()
            .expect("read should succeed")
            .expect("frame should be complete");
        assert_eq!(frame, b"hello");
        assert!(!reader.is_mid_frame());
    }

    #[test]
    fn incremental_delivery() {
        let mut writer = FrameWriter::new();
        writer.push(b"abcdefgh").expect("push should succeed");
        let bytes = writer.take();

        let mut reader = FrameReader::new();
        // Feed one byte at a time; only the final byte completes the frame.
        for (i, byte) in bytes.iter().enumerate() {
            reader.extend(&[*byte]);
            let result = reader.next_frame().expect("read should succeed");
            if i + 1 < bytes.len() {
                assert!(result.is_none(), "frame complete too early at byte {i}");
            } else {
                assert_eq!(result.as_deref(), Some(&b"abcdefgh"[..]));
            }
        }
    }

    #[test]
    fn multiple_frames_in_one_buffer() {
        let mut writer = FrameWriter::new();
        writer.push(b"one").expect("push 1");
        writer.push(b"two").expect("push 2");
        writer.push(b"three").expect("push 3");

        let mut reader = FrameReader::new();
        reader.extend(&writer.take());

        assert_eq!(reader.next_frame().unwrap().as_deref(), Some(&b"one"[..]));
        assert_eq!(reader.next_frame().unwrap().as_deref(), Some(&b"two"[..]));
        assert_eq!(reader.next_frame().unwrap().as_deref(), Some(&b"three"[..]));
        assert_eq!(reader.next_frame().unwrap(), None);
    }

    #[test]
    fn oversized_frame_rejected_on_read() {
        let mut reader = FrameReader::new();
        let len = (MAX_FRAME_SIZE as u32 + 1).to_be_bytes();
        reader.extend(&len);
        assert!(matches!(
            reader.next_frame(),
            Err(WireError::FrameTooLarge { size }) if size == MAX_FRAME_SIZE + 1
        ));
    }

    #[test]
    fn oversized_payload_rejected_on_write() {
        let mut writer = FrameWriter::new();
        let payload = vec![0u8; MAX_FRAME_SIZE + 1];
        assert!(matches!(
            writer.push(&payload),
            Err(WireError::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn empty_payload_is_a_valid_frame() {
        let mut writer = FrameWriter::new();
        writer.push(b"").expect("push should succeed");

        let mut reader = FrameReader::new();
        reader.extend(&writer.take());
        assert_eq!(reader.next_frame().unwrap().as_deref(), Some(&b""[..]));
    }

    #[test]
    fn mid_frame_detection_counts_consumed_prefix() {
        let mut reader = FrameReader::new();
        assert!(!reader.is_mid_frame());

        // A complete prefix announcing 10 bytes, then only 4 of them.
        reader.extend(&10u32.to_be_bytes());
        reader.extend(b"abcd");
        assert_eq!(reader.next_frame().unwrap(), None);
        assert!(reader.is_mid_frame());
        assert_eq!(reader.buffered(), LENGTH_PREFIX_SIZE + 4);
    }

    #[test]
    fn partial_prefix_is_mid_frame() {
        let mut reader = FrameReader::new();
        reader.extend(&[0, 0]);
        assert_eq!(reader.next_frame().unwrap(), None);
        assert!(reader.is_mid_frame());
        assert_eq!(reader.buffered(), 2);
    }
}
