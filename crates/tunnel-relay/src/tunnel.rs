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

//! Tunnel seam.
//!
//! The session owns at most one tunnel, created on the first registration
//! message and shut down when the session ends. How a tunnel binds listeners
//! and proxies traffic is the server's concern; the session only needs these
//! two traits.

use crate::SessionHandle;
use tunnel_relay_proto::Register;

/// A registered forwarding path owned by a session.
pub trait Tunnel: Send + 'static {
    /// Tears the tunnel down.
    ///
    /// Called exactly once by the owning session's cleanup; implementations
    /// that can also be shut down through other paths must make this
    /// idempotent themselves.
    fn shutdown(&mut self);
}

/// Builds tunnels from registration messages.
pub trait TunnelFactory: Send + 'static {
    /// Creates the tunnel described by `registration`.
    ///
    /// `control` is a handle to the registering session; the tunnel uses it
    /// to send protocol messages back over the control connection.
    fn create(&mut self, registration: &Register, control: SessionHandle) -> Box<dyn Tunnel>;
}
