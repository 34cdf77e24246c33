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

//! Transport trait definitions.

use tokio::io::{AsyncRead, AsyncWrite};

/// Abstraction over an accepted control connection.
///
/// The connection is consumed by splitting it into an owned read half and an
/// owned write half. After the split, reads and writes may proceed from two
/// different tasks; each half is closed by dropping it, and shutting down the
/// write half signals end-of-stream to the peer.
pub trait Connection: Send + 'static {
    /// The owned read half produced by [`into_split`](Connection::into_split).
    type ReadHalf: AsyncRead + Send + Unpin + 'static;
    /// The owned write half produced by [`into_split`](Connection::into_split).
    type WriteHalf: AsyncWrite + Send + Unpin + 'static;

    /// Splits the connection into independently owned halves.
    fn into_split(self) -> (Self::ReadHalf, Self::WriteHalf);

    /// A short label identifying the peer, for log output.
    fn peer(&self) -> String;
}
