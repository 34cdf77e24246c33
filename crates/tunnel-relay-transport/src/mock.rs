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

// Mutex::lock().unwrap() is the standard pattern in Rust. The lock only fails
// if the mutex is poisoned (a thread panicked while holding it), which indicates
// a bug elsewhere that should propagate.
#![allow(clippy::unwrap_used)]

//! Mock transport implementation for testing.
//!
//! Provides an in-memory connection pair so session logic can be exercised
//! without sockets. The write half can end its direction cleanly (EOF) or
//! abruptly (reset), letting tests drive both termination taxonomies.

use crate::Connection;
use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// One direction of a mock connection.
#[derive(Debug, Default)]
struct Pipe {
    /// Bytes written but not yet read.
    data: VecDeque<u8>,
    /// Waker for a reader waiting on data.
    reader: Option<Waker>,
    /// The write side has finished cleanly.
    closed: bool,
    /// The write side was abruptly reset.
    reset: bool,
}

impl Pipe {
    fn wake_reader(&mut self) {
        if let Some(waker) = self.reader.take() {
            waker.wake();
        }
    }
}

/// Creates a connected pair of mock connections.
///
/// Bytes written on one connection can be read on the other.
#[must_use]
pub fn mock_connection_pair() -> (MockConnection, MockConnection) {
    let a_to_b = Arc::new(Mutex::new(Pipe::default()));
    let b_to_a = Arc::new(Mutex::new(Pipe::default()));

    let conn_a = MockConnection {
        incoming: Arc::clone(&b_to_a),
        outgoing: Arc::clone(&a_to_b),
        label: "mock-peer-a",
    };

    let conn_b = MockConnection {
        incoming: a_to_b,
        outgoing: b_to_a,
        label: "mock-peer-b",
    };

    (conn_a, conn_b)
}

/// An in-memory control connection for testing.
#[derive(Debug)]
pub struct MockConnection {
    incoming: Arc<Mutex<Pipe>>,
    outgoing: Arc<Mutex<Pipe>>,
    label: &'static str,
}

impl Connection for MockConnection {
    type ReadHalf = MockReadHalf;
    type WriteHalf = MockWriteHalf;

    fn into_split(self) -> (Self::ReadHalf, Self::WriteHalf) {
        (
            MockReadHalf {
                pipe: self.incoming,
            },
            MockWriteHalf {
                pipe: self.outgoing,
            },
        )
    }

    fn peer(&self) -> String {
        self.label.to_owned()
    }
}

/// Read half of a mock connection.
#[derive(Debug)]
pub struct MockReadHalf {
    pipe: Arc<Mutex<Pipe>>,
}

impl AsyncRead for MockReadHalf {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let mut pipe = self.pipe.lock().unwrap();

        if pipe.reset {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }

        if !pipe.data.is_empty() {
            let to_read = buf.remaining().min(pipe.data.len());
            for _ in 0..to_read {
                if let Some(byte) = pipe.data.pop_front() {
                    buf.put_slice(&[byte]);
                }
            }
            return Poll::Ready(Ok(()));
        }

        if pipe.closed {
            // EOF
            return Poll::Ready(Ok(()));
        }

        pipe.reader = Some(cx.waker().clone());
        Poll::Pending
    }
}

/// Write half of a mock connection.
#[derive(Debug)]
pub struct MockWriteHalf {
    pipe: Arc<Mutex<Pipe>>,
}

impl MockWriteHalf {
    /// Abruptly resets this direction: the paired reader observes a
    /// connection-reset error instead of a clean EOF.
    pub fn reset(&mut self) {
        let mut pipe = self.pipe.lock().unwrap();
        pipe.reset = true;
        pipe.wake_reader();
    }
}

impl AsyncWrite for MockWriteHalf {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let mut pipe = self.pipe.lock().unwrap();

        if pipe.reset || pipe.closed {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "write half closed",
            )));
        }

        pipe.data.extend(buf);
        pipe.wake_reader();
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let mut pipe = self.pipe.lock().unwrap();
        pipe.closed = true;
        pipe.wake_reader();
        Poll::Ready(Ok(()))
    }
}

impl Drop for MockWriteHalf {
    fn drop(&mut self) {
        let mut pipe = self.pipe.lock().unwrap();
        pipe.closed = true;
        pipe.wake_reader();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn data_crosses_the_pair() {
        let (conn_a, conn_b) = mock_connection_pair();
        let (mut read_a, mut write_a) = conn_a.into_split();
        let (mut read_b, mut write_b) = conn_b.into_split();

        write_a.write_all(b"from a").await.expect("write");
        let mut buf = [0u8; 16];
        let n = read_b.read(&mut buf).await.expect("read");
        assert_eq!(&buf[..n], b"from a");

        write_b.write_all(b"from b").await.expect("write");
        let n = read_a.read(&mut buf).await.expect("read");
        assert_eq!(&buf[..n], b"from b");
    }

    #[tokio::test]
    async fn shutdown_is_clean_eof() {
        let (conn_a, conn_b) = mock_connection_pair();
        let (_read_a, mut write_a) = conn_a.into_split();
        let (mut read_b, _write_b) = conn_b.into_split();

        write_a.write_all(b"last words").await.expect("write");
        write_a.shutdown().await.expect("shutdown");

        let mut buf = [0u8; 16];
        let n = read_b.read(&mut buf).await.expect("read");
        assert_eq!(&buf[..n], b"last words");
        let n = read_b.read(&mut buf).await.expect("read");
        assert_eq!(n, 0, "shutdown should surface as EOF");
    }

    #[tokio::test]
    async fn dropping_write_half_is_clean_eof() {
        let (conn_a, conn_b) = mock_connection_pair();
        let (_read_a, write_a) = conn_a.into_split();
        let (mut read_b, _write_b) = conn_b.into_split();

        drop(write_a);

        let mut buf = [0u8; 16];
        let n = read_b.read(&mut buf).await.expect("read");
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn reset_surfaces_as_read_error() {
        let (conn_a, conn_b) = mock_connection_pair();
        let (_read_a, mut write_a) = conn_a.into_split();
        let (mut read_b, _write_b) = conn_b.into_split();

        write_a.reset();

        let mut buf = [0u8; 16];
        let err = read_b.read(&mut buf).await.expect_err("read should fail");
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }

    #[tokio::test]
    async fn write_after_shutdown_fails() {
        let (conn_a, _conn_b) = mock_connection_pair();
        let (_read_a, mut write_a) = conn_a.into_split();

        write_a.shutdown().await.expect("shutdown");
        let err = write_a
            .write_all(b"too late")
            .await
            .expect_err("write should fail");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn peer_labels_differ() {
        let (conn_a, conn_b) = mock_connection_pair();
        assert_ne!(conn_a.peer(), conn_b.peer());
    }

    #[test]
    fn halves_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<MockReadHalf>();
        assert_send::<MockWriteHalf>();
    }
}
