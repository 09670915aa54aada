// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Published state of one printer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::coordinator::DeviceConfig;
use crate::poller::PollResult;
use crate::types::PrinterInfo;

use super::PrinterStatus;

/// Result of merging a poll outcome or identity into a [`DeviceState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeOutcome {
    /// Something subscribers can observe changed.
    Changed,
    /// Nothing observable changed.
    Unchanged,
}

impl MergeOutcome {
    /// Returns `true` for [`MergeOutcome::Changed`].
    #[must_use]
    pub const fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Tracked state of a configured printer.
///
/// The last decoded status is kept across failed polls: stale data is
/// preferred over no data. A printer starts out available and is marked
/// unavailable once `retry_limit` polls in a row have failed.
///
/// # Examples
///
/// ```
/// use picaso_lib::coordinator::DeviceConfig;
/// use picaso_lib::state::DeviceState;
///
/// let state = DeviceState::new(DeviceConfig::new("lab", "192.168.1.50"));
///
/// assert_eq!(state.id(), "lab");
/// assert!(state.is_available());
/// assert!(state.last_status().is_none());
/// assert_eq!(state.consecutive_failures(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceState {
    config: DeviceConfig,
    last_status: Option<PrinterStatus>,
    available: bool,
    consecutive_failures: u32,
    last_updated_at: Option<DateTime<Utc>>,
    last_success_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
    info: Option<PrinterInfo>,
}

impl DeviceState {
    /// Creates the initial state of a printer that has not been polled yet.
    #[must_use]
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            last_status: None,
            available: true,
            consecutive_failures: 0,
            last_updated_at: None,
            last_success_at: None,
            last_error: None,
            info: None,
        }
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.config.id()
    }

    /// Returns the configuration of the printer.
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Returns the last successfully decoded status.
    #[must_use]
    pub fn last_status(&self) -> Option<&PrinterStatus> {
        self.last_status.as_ref()
    }

    /// Returns `true` while fewer than `retry_limit` polls in a row failed.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Returns the number of failed polls since the last success.
    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Returns when the last poll outcome was merged.
    #[must_use]
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated_at
    }

    /// Returns when the last successful poll was merged.
    #[must_use]
    pub fn last_success_at(&self) -> Option<DateTime<Utc>> {
        self.last_success_at
    }

    /// Returns the reason of the last failed poll, cleared on success.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns the printer identity, if it has been queried.
    #[must_use]
    pub fn info(&self) -> Option<&PrinterInfo> {
        self.info.as_ref()
    }

    /// Merges one poll outcome.
    ///
    /// A success is a change if the status differs by value from the
    /// previous one or if it restores availability. A failure is a change
    /// only when it is the one that reaches the retry limit.
    pub(crate) fn apply(&mut self, result: PollResult, now: DateTime<Utc>) -> MergeOutcome {
        self.last_updated_at = Some(now);

        if let PollResult::Success(status) = result {
            let changed = !self.available || self.last_status.as_ref() != Some(&status);

            self.last_status = Some(status);
            self.available = true;
            self.consecutive_failures = 0;
            self.last_success_at = Some(now);
            self.last_error = None;

            return if changed {
                MergeOutcome::Changed
            } else {
                MergeOutcome::Unchanged
            };
        }

        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_error = result.failure_reason();

        if self.available && self.consecutive_failures >= self.config.retry_limit() {
            self.available = false;
            MergeOutcome::Changed
        } else {
            MergeOutcome::Unchanged
        }
    }

    /// Records the printer identity.
    pub(crate) fn set_info(&mut self, info: PrinterInfo) -> MergeOutcome {
        if self.info.as_ref() == Some(&info) {
            return MergeOutcome::Unchanged;
        }
        self.info = Some(info);
        MergeOutcome::Changed
    }
}
