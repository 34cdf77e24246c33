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

//! Minimal relay server accept loop.
//!
//! Listens for control connections and runs a session for each one. The
//! tunnel factory here only logs registrations; a real relay would bind
//! public listeners and proxy traffic.
//!
//! # Usage
//!
//!     cargo run --example relay_server [bind-addr]
//!
//! The default bind address is 127.0.0.1:4443.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tunnel_relay::{
    LostHeartbeatCounter, Register, Session, SessionConfig, SessionHandle, TcpConnection, Tunnel,
    TunnelFactory,
};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:4443";

/// A tunnel that only logs its own lifecycle.
struct LoggingTunnel {
    subdomain: String,
}

impl Tunnel for LoggingTunnel {
    fn shutdown(&mut self) {
        info!(subdomain = %self.subdomain, "tunnel shut down");
    }
}

struct LoggingTunnelFactory;

impl TunnelFactory for LoggingTunnelFactory {
    fn create(&mut self, registration: &Register, _control: SessionHandle) -> Box<dyn Tunnel> {
        info!(
            protocol = %registration.protocol,
            subdomain = %registration.subdomain,
            client_id = %registration.client_id,
            "tunnel registered"
        );
        Box::new(LoggingTunnel {
            subdomain: registration.subdomain.clone(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(true)
        .init();

    let bind_addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("relay control listener on {bind_addr}");

    let metrics = Arc::new(LostHeartbeatCounter::default());

    loop {
        let (stream, peer) = listener.accept().await?;
        info!(%peer, "control connection accepted");

        let result = Session::spawn(
            TcpConnection::new(stream),
            SessionConfig::default(),
            Box::new(LoggingTunnelFactory),
            metrics.clone(),
        );

        match result {
            // Fire and forget: the session supervises its own tasks.
            Ok(session) => drop(session),
            Err(e) => error!(error = %e, "failed to start session"),
        }
    }
}
