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

//! Session configuration.

use std::time::Duration;
use tunnel_relay_proto::PROTOCOL_VERSION;

/// Configuration for a relay control session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a session may go without a heartbeat before it is reaped.
    pub heartbeat_timeout: Duration,

    /// How often the session checks heartbeat freshness.
    ///
    /// Independent of the timeout; staleness is computed from elapsed
    /// wall-clock time at each check, so a check interval coarser than the
    /// timeout delays reaping but never miscounts it.
    pub reap_interval: Duration,

    /// Version string reported in `VersionResponse` replies.
    pub version: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout: Duration::from_secs(30),
            reap_interval: Duration::from_secs(10),
            version: PROTOCOL_VERSION.to_owned(),
        }
    }
}

impl SessionConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the heartbeat timeout.
    #[must_use]
    pub const fn with_heartbeat_timeout(mut self, timeout: Duration) -> Self {
        self.heartbeat_timeout = timeout;
        self
    }

    /// Sets the reap check interval.
    #[must_use]
    pub const fn with_reap_interval(mut self, interval: Duration) -> Self {
        self.reap_interval = interval;
        self
    }

    /// Sets the reported version string.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat_timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("heartbeat_timeout"));
        }
        if self.reap_interval.is_zero() {
            return Err(ConfigError::ZeroDuration("reap_interval"));
        }
        if self.version.is_empty() {
            return Err(ConfigError::EmptyVersion);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A duration field was zero.
    #[error("{0} must be non-zero")]
    ZeroDuration(&'static str),

    /// The version string was empty.
    #[error("version string must not be empty")]
    EmptyVersion,
}
