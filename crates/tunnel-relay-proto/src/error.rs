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

//! Error types for the control protocol.

use thiserror::Error;

/// Errors that can occur during message serialization.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Serialization failed.
    #[error("serialization failed: {0}")]
    Serialize(String),

    /// Deserialization failed.
    #[error("deserialization failed: {0}")]
    Deserialize(String),
}

/// Errors that can occur at the framing layer.
#[derive(Debug, Error)]
pub enum WireError {
    /// Frame exceeds the maximum allowed size.
    #[error("frame size {size} exceeds maximum {max}", max = crate::MAX_FRAME_SIZE)]
    FrameTooLarge {
        /// The declared frame size.
        size: usize,
    },

    /// The byte stream ended in the middle of a frame.
    #[error("stream ended mid-frame with {buffered} bytes pending")]
    TruncatedFrame {
        /// Bytes of the incomplete frame that had arrived.
        buffered: usize,
    },

    /// Codec error while encoding or decoding a framed message.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}
