// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-printer poll state machine and schedule.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::{PollPhase, PollResult, PollSink};
use crate::codec::{self, DecodeProfile};
use crate::coordinator::DeviceConfig;
use crate::error::TransportError;
use crate::event::DeviceId;
use crate::transport::{self, Transport};
use crate::types::PrinterInfo;

/// Polls one printer.
///
/// A poller owns its transport and performs at most one exchange at a
/// time. [`poll_once`](Self::poll_once) runs a single attempt;
/// [`run`](Self::run) repeats attempts on the configured schedule until
/// cancelled.
///
/// When identification is enabled, the first successful contact also
/// queries the printer identity, which selects the string encoding and
/// event journal handling of later status frames.
#[derive(Debug)]
pub struct Poller<T> {
    id: DeviceId,
    config: DeviceConfig,
    transport: T,
    profile: DecodeProfile,
    identified: bool,
    new_info: Option<PrinterInfo>,
    consecutive_failures: u32,
    phase: watch::Sender<PollPhase>,
}

impl<T: Transport> Poller<T> {
    /// Creates a poller for `config` using `transport`.
    #[must_use]
    pub fn new(config: DeviceConfig, transport: T) -> Self {
        let (phase, _) = watch::channel(PollPhase::Idle);
        Self {
            id: DeviceId::new(config.id()),
            identified: !config.identify(),
            config,
            transport,
            profile: DecodeProfile::default(),
            new_info: None,
            consecutive_failures: 0,
            phase,
        }
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> PollPhase {
        *self.phase.borrow()
    }

    /// Returns a receiver that observes phase transitions.
    #[must_use]
    pub fn watch_phase(&self) -> watch::Receiver<PollPhase> {
        self.phase.subscribe()
    }

    /// Returns the decode profile in use.
    #[must_use]
    pub fn profile(&self) -> DecodeProfile {
        self.profile
    }

    /// Returns the interval to wait after the last attempt.
    #[must_use]
    pub fn next_interval(&self) -> Duration {
        self.config.backoff().interval_for(
            self.config.poll_interval(),
            self.consecutive_failures,
            self.config.retry_limit(),
        )
    }

    /// Takes the identity learned during the last attempt, if any.
    pub fn take_new_info(&mut self) -> Option<PrinterInfo> {
        self.new_info.take()
    }

    fn set_phase(&self, phase: PollPhase) {
        self.phase.send_replace(phase);
    }

    /// Runs one poll attempt.
    ///
    /// Resolves the printer address, sends the status request and waits up
    /// to the configured timeout for the reply. Never retries within the
    /// attempt.
    pub async fn poll_once(&mut self) -> PollResult {
        self.set_phase(PollPhase::Requesting);

        let result = match self.exchange().await {
            Ok(frame) => match codec::decode_status(&frame, self.profile) {
                Ok(status) => PollResult::Success(status),
                Err(e) => {
                    tracing::warn!(device_id = %self.id, error = %e, "Rejected status reply");
                    PollResult::from(e)
                }
            },
            Err(e) => PollResult::from(e),
        };

        if result.is_success() {
            self.consecutive_failures = 0;
            self.set_phase(PollPhase::Succeeded);
        } else {
            self.consecutive_failures = self.consecutive_failures.saturating_add(1);
            tracing::debug!(
                device_id = %self.id,
                failures = self.consecutive_failures,
                result = %result,
                "Poll attempt failed"
            );
            self.set_phase(PollPhase::Failed);
        }

        result
    }

    async fn exchange(&mut self) -> Result<Vec<u8>, TransportError> {
        let target =
            transport::resolve(self.config.host(), self.config.port(), self.config.timeout())
                .await?;

        if !self.identified {
            self.identify(target).await?;
        }

        self.transport.send(&codec::STATUS_REQUEST, target).await?;
        self.set_phase(PollPhase::Waiting);
        let frame = self.transport.receive(target, self.config.timeout()).await?;
        tracing::debug!(device_id = %self.id, len = frame.len(), "Received status reply");
        Ok(frame)
    }

    /// Queries the printer identity.
    ///
    /// A reply that cannot be decoded is logged and the default profile is
    /// kept; only a failed exchange fails the attempt.
    async fn identify(&mut self, target: SocketAddr) -> Result<(), TransportError> {
        self.transport.send(&codec::INFO_REQUEST, target).await?;
        self.set_phase(PollPhase::Waiting);
        let frame = self.transport.receive(target, self.config.timeout()).await?;
        self.set_phase(PollPhase::Requesting);
        self.identified = true;

        match codec::decode_info(&frame) {
            Ok(info) => {
                self.profile = DecodeProfile::from(&info);
                tracing::info!(
                    device_id = %self.id,
                    model = %info.printer_type(),
                    firmware = info.firmware_version().as_deref().unwrap_or("unknown"),
                    utf8 = self.profile.utf8,
                    "Identified printer"
                );
                self.new_info = Some(info);
            }
            Err(e) => {
                tracing::warn!(
                    device_id = %self.id,
                    error = %e,
                    "Rejected identity reply, using default decode profile"
                );
            }
        }
        Ok(())
    }

    /// Polls until `cancel` fires.
    ///
    /// Attempts start one interval apart, measured from the start of the
    /// previous attempt. An attempt that overruns the interval is followed
    /// immediately by the next one; missed ticks are not made up.
    /// Cancellation drops any in-flight exchange and returns without
    /// delivering its result.
    pub async fn run<S>(mut self, sink: Arc<S>, cancel: CancellationToken)
    where
        S: PollSink + ?Sized,
    {
        tracing::debug!(device_id = %self.id, host = self.config.host(), "Poller started");

        loop {
            let started = Instant::now();

            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                result = self.poll_once() => result,
            };

            if let Some(info) = self.take_new_info() {
                sink.on_identified(&self.id, info);
            }
            sink.on_result(&self.id, result);
            self.set_phase(PollPhase::Idle);

            let next = started + self.next_interval();
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep_until(next) => {}
            }
        }

        self.set_phase(PollPhase::Idle);
        tracing::debug!(device_id = %self.id, "Poller stopped");
    }
}
