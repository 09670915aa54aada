// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device configuration for the coordinator.

use std::net::IpAddr;
use std::time::Duration;

use serde::Serialize;

use crate::error::ConfigError;
use crate::poller::BackoffPolicy;

/// Default UDP port of the printer query service.
pub const DEFAULT_PORT: u16 = 54321;

/// Default time between the starts of two poll attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default bound on the wait for a reply.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of consecutive failures before a printer is unavailable.
pub const DEFAULT_RETRY_LIMIT: u32 = 3;

/// Configuration of one polled printer.
///
/// Built with [`DeviceConfig::new`] and the `with_*` setters, then handed
/// to the coordinator, which treats it as immutable.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use picaso_lib::coordinator::DeviceConfig;
///
/// let config = DeviceConfig::new("workshop", "192.168.1.50")
///     .with_poll_interval(Duration::from_secs(10))
///     .with_retry_limit(5);
///
/// assert_eq!(config.port(), 54321);
/// assert_eq!(config.timeout(), Duration::from_secs(5));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceConfig {
    id: String,
    host: String,
    port: u16,
    poll_interval: Duration,
    timeout: Duration,
    retry_limit: u32,
    identify: bool,
    backoff: BackoffPolicy,
}

impl DeviceConfig {
    /// Creates a configuration with default port, timing and retry limit.
    #[must_use]
    pub fn new(id: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            host: host.into(),
            port: DEFAULT_PORT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            retry_limit: DEFAULT_RETRY_LIMIT,
            identify: true,
            backoff: BackoffPolicy::default(),
        }
    }

    /// Sets the UDP port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the reply timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many consecutive failures mark the printer unavailable.
    #[must_use]
    pub fn with_retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    /// Enables or disables the identity query on first contact.
    ///
    /// Without it, status frames are decoded with the default profile
    /// (UTF-8 strings, event journal read when present).
    #[must_use]
    pub fn with_identify(mut self, identify: bool) -> Self {
        self.identify = identify;
        self
    }

    /// Sets the backoff policy for unavailable printers.
    #[must_use]
    pub fn with_backoff(mut self, policy: BackoffPolicy) -> Self {
        self.backoff = policy;
        self
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the host name or IP address.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the UDP port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the reply timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry limit.
    #[must_use]
    pub fn retry_limit(&self) -> u32 {
        self.retry_limit
    }

    /// Returns `true` if the identity is queried on first contact.
    #[must_use]
    pub fn identify(&self) -> bool {
        self.identify
    }

    /// Returns the backoff policy.
    #[must_use]
    pub fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::EmptyId);
        }
        if !is_valid_host(&self.host) {
            return Err(ConfigError::InvalidHost(self.host.clone()));
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.retry_limit == 0 {
            return Err(ConfigError::ZeroRetryLimit);
        }
        Ok(())
    }
}

/// Accepts IP literals and DNS host names.
fn is_valid_host(host: &str) -> bool {
    if host.parse::<IpAddr>().is_ok() {
        return true;
    }
    !host.is_empty()
        && host.len() <= 253
        && host.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
