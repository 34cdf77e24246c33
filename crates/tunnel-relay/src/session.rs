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

//! The control-plane session actor.
//!
//! One [`Session`] owns one accepted control connection and runs exactly two
//! tasks over it:
//!
//! - a **reader** that decodes inbound messages and forwards them to the
//!   manager, and
//! - a **manager** that owns all session state (heartbeat freshness, the
//!   registered tunnel, the write half) and multiplexes the outbound queue,
//!   the reap timer, the stop signal, and the inbound queue.
//!
//! The manager is the only task that writes to the connection or mutates
//! session state, which keeps the actor lock-free. Whatever terminates the
//! loop (stop signal, lost heartbeat, transport fault), the manager runs its
//! cleanup exactly once: the write half is shut down, the reader is released,
//! and the tunnel, if one was registered, is torn down.

use crate::control::{ControlReader, ControlWriter};
use crate::tunnel::{Tunnel, TunnelFactory};
use crate::{Error, MetricsSink, SessionConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, timeout, Instant};
use tracing::{debug, error, info, info_span, warn, Instrument};
use tunnel_relay_proto::{ControlMessage, VersionResponse};
use tunnel_relay_transport::Connection;

/// Capacity of the outbound, inbound, and stop queues.
///
/// One slot is deliberate backpressure: the reader can run at most one
/// message ahead of the manager, and outbound producers stay in lockstep
/// with the writer. Widening it changes the ordering guarantees.
const QUEUE_DEPTH: usize = 1;

/// Upper bound on writes performed while the session is shutting down, so a
/// stalled peer cannot hold the cleanup sequence open.
const SHUTDOWN_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// A live control-plane session.
///
/// [`Session::spawn`] starts both session tasks and returns immediately; the
/// returned value supervises them. Callers that need to observe termination
/// (tests, draining shutdown paths) can [`join`](Session::join) it; callers
/// that don't can simply drop it; the tasks run to completion on their own.
pub struct Session {
    handle: SessionHandle,
    manager: JoinHandle<()>,
}

impl Session {
    /// Starts a session over an accepted control connection.
    ///
    /// `factory` builds the tunnel when the client registers one, and
    /// `metrics` receives liveness observations.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn spawn<C>(
        connection: C,
        config: SessionConfig,
        factory: Box<dyn TunnelFactory>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Result<Self, Error>
    where
        C: Connection,
    {
        config.validate()?;

        let peer = connection.peer();
        let (read_half, write_half) = connection.into_split();

        let (outbound_tx, outbound_rx) = mpsc::channel(QUEUE_DEPTH);
        let (inbound_tx, inbound_rx) = mpsc::channel(QUEUE_DEPTH);
        let (stop_tx, stop_rx) = mpsc::channel(QUEUE_DEPTH);

        let handle = SessionHandle {
            outbound: outbound_tx.clone(),
            stop: stop_tx.clone(),
        };

        let span = info_span!("session", %peer);

        let reader = tokio::spawn(
            read_loop(ControlReader::new(read_half), inbound_tx, stop_tx).instrument(span.clone()),
        );

        let manager = Manager {
            writer: ControlWriter::new(write_half),
            outbound_tx,
            outbound_rx,
            inbound_rx,
            stop_rx,
            reader,
            last_heartbeat: Instant::now(),
            tunnel: None,
            factory,
            metrics,
            config,
            handle: handle.clone(),
        };

        let manager = tokio::spawn(manager.run().instrument(span));

        Ok(Self { handle, manager })
    }

    /// Returns a handle for sending messages to and stopping this session.
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Returns true once the session has fully terminated.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.manager.is_finished()
    }

    /// Waits for the session to terminate.
    ///
    /// The manager has already run its cleanup by the time this returns.
    pub async fn join(self) {
        let _ = self.manager.await;
    }
}

/// Cloneable handle to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    outbound: mpsc::Sender<ControlMessage>,
    stop: mpsc::Sender<Option<ControlMessage>>,
}

impl SessionHandle {
    /// Enqueues a message for the session to write to its connection.
    ///
    /// Waits while the single outbound slot is occupied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`] if the session has terminated.
    pub async fn send(&self, message: ControlMessage) -> Result<(), Error> {
        self.outbound
            .send(message)
            .await
            .map_err(|_| Error::SessionClosed)
    }

    /// Asks the session to terminate, optionally writing one final message
    /// before the connection closes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`] if the session has already
    /// terminated.
    pub async fn stop(&self, final_message: Option<ControlMessage>) -> Result<(), Error> {
        self.stop
            .send(final_message)
            .await
            .map_err(|_| Error::SessionClosed)
    }
}

/// Why the manager loop ended.
enum Exit {
    /// A stop signal was received.
    Stopped,
    /// The heartbeat went stale.
    LostHeartbeat,
}

impl std::fmt::Display for Exit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "stop requested"),
            Self::LostHeartbeat => write!(f, "lost heartbeat"),
        }
    }
}

/// The session actor: sole owner of the write half, heartbeat freshness,
/// and the registered tunnel.
struct Manager<W> {
    writer: ControlWriter<W>,
    outbound_tx: mpsc::Sender<ControlMessage>,
    outbound_rx: mpsc::Receiver<ControlMessage>,
    inbound_rx: mpsc::Receiver<ControlMessage>,
    stop_rx: mpsc::Receiver<Option<ControlMessage>>,
    reader: JoinHandle<()>,
    last_heartbeat: Instant,
    tunnel: Option<Box<dyn Tunnel>>,
    factory: Box<dyn TunnelFactory>,
    metrics: Arc<dyn MetricsSink>,
    config: SessionConfig,
    handle: SessionHandle,
}

impl<W: AsyncWrite + Send + Unpin + 'static> Manager<W> {
    async fn run(mut self) {
        match self.run_loop().await {
            Ok(exit) => debug!(reason = %exit, "session loop finished"),
            Err(error) => error!(error = %error, "session loop failed"),
        }
        self.cleanup().await;
    }

    /// The select loop. Every exit path, including the error path taken by
    /// `?`, falls through to [`cleanup`](Self::cleanup) in [`run`](Self::run).
    async fn run_loop(&mut self) -> Result<Exit, Error> {
        let mut reap = interval_at(
            Instant::now() + self.config.reap_interval,
            self.config.reap_interval,
        );

        loop {
            tokio::select! {
                // Draining outbound before polling inbound keeps the
                // capacity-1 reply slot free at dispatch time.
                biased;

                stop = self.stop_rx.recv() => {
                    if let Some(Some(message)) = stop {
                        debug!(kind = message.kind(), "writing final message");
                        match timeout(SHUTDOWN_WRITE_TIMEOUT, self.writer.write_message(&message)).await {
                            Ok(Ok(())) => {}
                            Ok(Err(error)) => debug!(error = %error, "final message write failed"),
                            Err(_) => debug!("final message write timed out"),
                        }
                    }
                    return Ok(Exit::Stopped);
                }

                _ = reap.tick() => {
                    let silent_for = self.last_heartbeat.elapsed();
                    if silent_for > self.config.heartbeat_timeout {
                        warn!(?silent_for, "lost heartbeat");
                        self.metrics.lost_heartbeat();
                        return Ok(Exit::LostHeartbeat);
                    }
                }

                Some(message) = self.outbound_rx.recv() => {
                    self.writer.write_message(&message).await?;
                }

                Some(message) = self.inbound_rx.recv() => {
                    if let Some(reply) = self.dispatch(message) {
                        self.send_reply(reply).await?;
                    }
                }
            }
        }
    }

    /// Handles one inbound message, returning the reply it produces, if any.
    fn dispatch(&mut self, message: ControlMessage) -> Option<ControlMessage> {
        match message {
            ControlMessage::Register(registration) => {
                if self.tunnel.is_some() {
                    // First registration wins; replacing the tunnel here
                    // would leak the one already serving traffic.
                    warn!(
                        client_id = %registration.client_id,
                        "ignoring repeated registration"
                    );
                } else {
                    info!(
                        protocol = %registration.protocol,
                        subdomain = %registration.subdomain,
                        "registering new tunnel"
                    );
                    let tunnel = self.factory.create(&registration, self.handle.clone());
                    self.tunnel = Some(tunnel);
                }
                None
            }
            ControlMessage::Ping => {
                self.last_heartbeat = Instant::now();
                Some(ControlMessage::Pong)
            }
            ControlMessage::VersionRequest => Some(ControlMessage::VersionResponse(
                VersionResponse::new(self.config.version.clone()),
            )),
            // Server-side replies echoed back by a client carry no meaning.
            ControlMessage::Pong | ControlMessage::VersionResponse(_) => None,
        }
    }

    /// Routes a dispatch reply through the outbound queue.
    ///
    /// The biased select drains the queue before dispatching, so the slot is
    /// normally free; an external sender can still race it full, in which
    /// case the reply goes straight to the wire.
    async fn send_reply(&mut self, reply: ControlMessage) -> Result<(), Error> {
        if let Err(err) = self.outbound_tx.try_send(reply) {
            let reply = err.into_inner();
            self.writer.write_message(&reply).await?;
        }
        Ok(())
    }

    /// Releases everything the session owns. Runs exactly once, after the
    /// loop has returned; the reap timer was already dropped with the loop
    /// frame.
    async fn cleanup(mut self) {
        match timeout(SHUTDOWN_WRITE_TIMEOUT, self.writer.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => debug!(error = %error, "connection shutdown failed"),
            Err(_) => debug!("connection shutdown timed out"),
        }

        // The reader may still be parked in a read; closing the write half
        // does not unblock it, so it is released here.
        self.reader.abort();
        let _ = self.reader.await;

        if let Some(mut tunnel) = self.tunnel.take() {
            debug!("shutting down tunnel");
            tunnel.shutdown();
        }

        info!("session closed");
    }
}

/// The reader task: decodes messages off the connection and forwards them
/// to the manager until the stream ends or faults.
async fn read_loop<R>(
    mut reader: ControlReader<R>,
    inbound: mpsc::Sender<ControlMessage>,
    stop: mpsc::Sender<Option<ControlMessage>>,
) where
    R: AsyncRead + Send + Unpin + 'static,
{
    loop {
        match reader.read_message().await {
            Ok(Some(message)) => {
                // Capacity-1 queue: this blocks until the manager has taken
                // the previous message.
                if inbound.send(message).await.is_err() {
                    break;
                }
            }
            Ok(None) => {
                info!("control connection closed by peer");
                break;
            }
            Err(error) => {
                error!(error = %error, "control read failed");
                break;
            }
        }
    }

    // Tell the manager no more input will arrive, whatever the exit cause.
    let _ = stop.send(None).await;
}
