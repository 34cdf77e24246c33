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

//! Control-plane sessions for a tunneling relay server.
//!
//! A relay client keeps one persistent control connection open to the server.
//! `tunnel-relay` manages the server side of that connection: each accepted
//! connection becomes a [`Session`] running two tasks: a reader that decodes
//! inbound protocol messages and a manager that owns all session state,
//! multiplexing outbound writes, message dispatch, heartbeat monitoring, and
//! shutdown.
//!
//! # Architecture
//!
//! ```text
//!             ┌────────────┐   inbound (cap 1)   ┌─────────────┐
//!  client ───►│   reader   │────────────────────►│   manager   │──► writes
//!  bytes      │    task    │   stop (cap 1)      │    task     │
//!             └────────────┘────────────────────►│             │◄── outbound
//!                                                └─────────────┘    (cap 1)
//! ```
//!
//! The manager alone touches the write half, the heartbeat timestamp, and
//! the registered tunnel, so no session state needs locking. A session ends
//! through exactly one of: a stop request, a stale heartbeat detected by the
//! reap timer, or a transport fault. Its cleanup (connection closed, reader
//! released, tunnel shut down) runs exactly once regardless of which.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tunnel_relay::{NoopMetrics, Session, SessionConfig};
//! use tunnel_relay_transport::TcpConnection;
//!
//! let (stream, _) = listener.accept().await?;
//! let session = Session::spawn(
//!     TcpConnection::new(stream),
//!     SessionConfig::default(),
//!     Box::new(my_tunnel_factory),
//!     Arc::new(NoopMetrics),
//! )?;
//! // The session runs on its own; drop it or `join().await` it.
//! ```

pub use tunnel_relay_proto::{
    ControlMessage, Register, TunnelProtocol, VersionResponse, PROTOCOL_VERSION,
};
pub use tunnel_relay_transport::{Connection, TcpConnection};

mod config;
mod control;
mod error;
mod metrics;
mod session;
mod tunnel;

pub use config::{ConfigError, SessionConfig};
pub use control::{ControlReader, ControlWriter};
pub use error::Error;
pub use metrics::{LostHeartbeatCounter, MetricsSink, NoopMetrics};
pub use session::{Session, SessionHandle};
pub use tunnel::{Tunnel, TunnelFactory};
