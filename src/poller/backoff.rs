// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Poll interval stretching for unavailable printers.

use std::time::Duration;

use serde::Serialize;

/// Configuration for stretching the poll interval of an unavailable printer.
///
/// While a printer answers, or has failed fewer than `retry_limit` times in
/// a row, it is polled at its regular interval. Past that point an enabled
/// policy multiplies the interval for every further failure, up to
/// `max_interval`. The first successful poll restores the regular interval.
///
/// Disabled by default: a printer that is switched off overnight is then
/// noticed again within one regular interval of being switched on.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use picaso_lib::poller::BackoffPolicy;
///
/// let policy = BackoffPolicy::exponential()
///     .with_multiplier(2.0)
///     .with_max_interval(Duration::from_secs(300));
///
/// let base = Duration::from_secs(30);
/// // Still within the retry limit of 3.
/// assert_eq!(policy.interval_for(base, 2, 3), base);
/// // Unavailable: 30 s doubled per failure past the limit.
/// assert_eq!(policy.interval_for(base, 3, 3), Duration::from_secs(60));
/// assert_eq!(policy.interval_for(base, 4, 3), Duration::from_secs(120));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackoffPolicy {
    /// Whether the interval is stretched at all.
    pub enabled: bool,
    /// Upper bound of the stretched interval.
    pub max_interval: Duration,
    /// Factor applied per failure past the retry limit.
    pub multiplier: f32,
}

impl BackoffPolicy {
    /// Creates a disabled policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an enabled policy doubling up to five minutes.
    #[must_use]
    pub fn exponential() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Sets the maximum interval.
    #[must_use]
    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    /// Sets the multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Returns the interval to wait after an attempt.
    ///
    /// `failures` is the number of consecutive failed attempts so far,
    /// including the one just finished.
    #[must_use]
    pub fn interval_for(&self, base: Duration, failures: u32, retry_limit: u32) -> Duration {
        if !self.enabled || failures < retry_limit {
            return base;
        }

        let exponent = failures - retry_limit + 1;
        let factor = self
            .multiplier
            .max(1.0)
            .powi(i32::try_from(exponent).unwrap_or(i32::MAX));

        // Poll intervals are seconds to minutes, far from f32 limits
        #[allow(clippy::cast_precision_loss)]
        let interval_ms = base.as_millis() as f32 * factor;

        // interval_ms is non-negative; saturating cast for infinity
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let interval = Duration::from_millis(interval_ms as u64);

        interval.min(self.max_interval.max(base))
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            max_interval: Duration::from_secs(300),
            multiplier: 2.0,
        }
    }
}
