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

//! Transport abstraction for tunnel-relay control connections.
//!
//! A control connection is an ordered, bidirectional byte stream that can be
//! split into independently owned halves, so the session's reader and manager
//! tasks can use it concurrently without locks. A TCP adapter is provided for
//! production use and an in-memory mock for tests.

mod mock;
mod tcp;
mod traits;

pub use mock::{mock_connection_pair, MockConnection, MockReadHalf, MockWriteHalf};
pub use tcp::TcpConnection;
pub use traits::Connection;
