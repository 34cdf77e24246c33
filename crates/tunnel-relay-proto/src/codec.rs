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

//! Codec abstraction for control message serialization.
//!
//! A pluggable trait with a default bincode implementation; the framing
//! layer carries whatever bytes the codec produces.

use crate::{CodecError, ControlMessage};

/// Trait for control message serialization codecs.
///
/// Implementations must be thread-safe; a codec may be used from both
/// session tasks.
pub trait Codec: Send + Sync + 'static {
    /// Encodes a control message to bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn encode(&self, message: &ControlMessage) -> Result<Vec<u8>, CodecError>;

    /// Decodes a control message from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid message.
    fn decode(&self, data: &[u8]) -> Result<ControlMessage, CodecError>;
}

/// Bincode codec for compact binary serialization.
///
/// This is the default codec used on relay control connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl BincodeCodec {
    /// Creates a new bincode codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Codec for BincodeCodec {
    fn encode(&self, message: &ControlMessage) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(message).map_err(|e| CodecError::Serialize(e.to_string()))
    }

    fn decode(&self, data: &[u8]) -> Result<ControlMessage, CodecError> {
        bincode::deserialize(data).map_err(|e| CodecError::Deserialize(e.to_string()))
    }
}
