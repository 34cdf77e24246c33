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

//! Error types for relay sessions.

use thiserror::Error;
use tunnel_relay_proto::{CodecError, WireError};

/// Errors that can occur during session operations.
///
/// Session tasks contain these at their own boundary; they surface to
/// callers only through [`SessionHandle`](crate::SessionHandle) operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error on the control connection.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// Framing violation on the control connection.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    /// Message could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The session has terminated.
    #[error("session closed")]
    SessionClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::from(WireError::FrameTooLarge { size: 1 << 20 });
        assert!(err.to_string().contains("exceeds maximum"));

        assert_eq!(Error::SessionClosed.to_string(), "session closed");
    }
}
