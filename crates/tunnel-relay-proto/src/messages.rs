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

//! Control plane message definitions.
//!
//! These are the messages a relay client and server exchange on the
//! persistent control connection: tunnel registration, heartbeats, and
//! version discovery.

use serde::{Deserialize, Serialize};

/// Version string reported in [`VersionResponse`] replies.
pub const PROTOCOL_VERSION: &str = "1.1";

/// The user-facing protocol a tunnel forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TunnelProtocol {
    /// Plain HTTP forwarding.
    Http,
    /// HTTPS forwarding.
    Https,
    /// Raw TCP forwarding.
    Tcp,
}

impl std::fmt::Display for TunnelProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Https => write!(f, "https"),
            Self::Tcp => write!(f, "tcp"),
        }
    }
}

/// Tunnel registration request.
///
/// Sent by a client after the control connection is established to declare
/// the tunnel it wants the relay to expose on its behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    /// Protocol the tunnel forwards.
    pub protocol: TunnelProtocol,
    /// Fully-qualified hostname requested for the tunnel, if any.
    pub hostname: String,
    /// Subdomain requested under the relay's base domain, if any.
    pub subdomain: String,
    /// Client-chosen identifier, echoed in relay-side diagnostics.
    pub client_id: String,
}

impl Register {
    /// Creates a registration for the given protocol with no name requests.
    #[must_use]
    pub const fn new(protocol: TunnelProtocol) -> Self {
        Self {
            protocol,
            hostname: String::new(),
            subdomain: String::new(),
            client_id: String::new(),
        }
    }

    /// Sets the requested hostname.
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Sets the requested subdomain.
    #[must_use]
    pub fn with_subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = subdomain.into();
        self
    }

    /// Sets the client identifier.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }
}

/// Reply to a [`ControlMessage::VersionRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionResponse {
    /// The server's protocol version string.
    pub version: String,
}

impl VersionResponse {
    /// Creates a version response carrying the given version string.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

/// All messages that can appear on a control connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMessage {
    /// Client declares a new tunnel.
    Register(Register),
    /// Heartbeat probe from the client.
    Ping,
    /// Heartbeat response from the server.
    Pong,
    /// Client asks for the server's protocol version.
    VersionRequest,
    /// Server's version reply.
    VersionResponse(VersionResponse),
}

impl ControlMessage {
    /// Returns a short name for the message variant, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Register(_) => "Register",
            Self::Ping => "Ping",
            Self::Pong => "Pong",
            Self::VersionRequest => "VersionRequest",
            Self::VersionResponse(_) => "VersionResponse",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_builder() {
        let reg = Register::new(TunnelProtocol::Http)
            .with_hostname("app.example.com")
            .with_subdomain("app")
            .with_client_id("client-7");

        assert_eq!(reg.protocol, TunnelProtocol::Http);
        assert_eq!(reg.hostname, "app.example.com");
        assert_eq!(reg.subdomain, "app");
        assert_eq!(reg.client_id, "client-7");
    }

    #[test]
    fn register_defaults_are_empty() {
        let reg = Register::new(TunnelProtocol::Tcp);
        assert!(reg.hostname.is_empty());
        assert!(reg.subdomain.is_empty());
        assert!(reg.client_id.is_empty());
    }

    #[test]
    fn message_kind_names() {
        assert_eq!(
            ControlMessage::Register(Register::new(TunnelProtocol::Tcp)).kind(),
            "Register"
        );
        assert_eq!(ControlMessage::Ping.kind(), "Ping");
        assert_eq!(ControlMessage::Pong.kind(), "Pong");
        assert_eq!(ControlMessage::VersionRequest.kind(), "VersionRequest");
        assert_eq!(
            ControlMessage::VersionResponse(VersionResponse::new("1.1")).kind(),
            "VersionResponse"
        );
    }

    #[test]
    fn protocol_display() {
        assert_eq!(TunnelProtocol::Http.to_string(), "http");
        assert_eq!(TunnelProtocol::Https.to_string(), "https");
        assert_eq!(TunnelProtocol::Tcp.to_string(), "tcp");
    }
}
