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

//! Metrics seam.
//!
//! Sessions record liveness observations through an injected sink rather
//! than a process-wide singleton, so tests can substitute a recording
//! implementation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Sink for session liveness observations.
pub trait MetricsSink: Send + Sync + 'static {
    /// Records that a session was reaped after its heartbeat went stale.
    fn lost_heartbeat(&self);
}

/// A metrics sink that discards all observations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn lost_heartbeat(&self) {}
}

/// A metrics sink that counts lost heartbeats.
#[derive(Debug, Default)]
pub struct LostHeartbeatCounter {
    count: AtomicU64,
}

impl LostHeartbeatCounter {
    /// Returns the number of lost heartbeats recorded so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl MetricsSink for LostHeartbeatCounter {
    fn lost_heartbeat(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_counts() {
        let counter = LostHeartbeatCounter::default();
        assert_eq!(counter.count(), 0);
        counter.lost_heartbeat();
        counter.lost_heartbeat();
        assert_eq!(counter.count(), 2);
    }

    #[test]
    fn sinks_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NoopMetrics>();
        assert_send_sync::<LostHeartbeatCounter>();
    }
}
