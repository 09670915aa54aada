// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The coordinator owning all pollers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::DeviceConfig;
use crate::error::{ConfigError, Error};
use crate::event::{DeviceEvent, DeviceId, EventBus};
use crate::poller::{PollPhase, PollResult, PollSink, Poller};
use crate::state::{DeviceState, MergeOutcome, StateStore};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::transport::{Transport, UdpTransport};
use crate::types::PrinterInfo;

/// Builds the transport of one poller.
type TransportFactory<T> = Box<dyn Fn(&DeviceConfig) -> T + Send + Sync>;

/// State shared between the coordinator and its polling tasks.
#[derive(Debug)]
struct Shared {
    store: StateStore,
    callbacks: CallbackRegistry,
    event_bus: EventBus,
}

impl PollSink for Shared {
    fn on_result(&self, device_id: &DeviceId, result: PollResult) {
        let update = match self.store.update(device_id.as_str(), result) {
            Ok(Some(update)) => update,
            Ok(None) => return,
            Err(e) => {
                tracing::error!(%device_id, error = %e, "Dropped poll result");
                return;
            }
        };

        let state = update.state;
        if update.availability_changed {
            let available = state.is_available();
            if available {
                tracing::info!(%device_id, "Printer available");
            } else {
                tracing::info!(
                    %device_id,
                    failures = state.consecutive_failures(),
                    error = state.last_error().unwrap_or_default(),
                    "Printer unavailable"
                );
            }

            self.callbacks.dispatch_availability(device_id, available);
            self.event_bus.publish(DeviceEvent::availability_changed(
                device_id.clone(),
                available,
                state.last_error().map(str::to_string),
            ));
        }

        tracing::debug!(%device_id, available = state.is_available(), "Publishing state");
        self.callbacks.dispatch_state(device_id, &state);
        self.event_bus
            .publish(DeviceEvent::state_changed(device_id.clone(), state));
    }

    fn on_identified(&self, device_id: &DeviceId, info: PrinterInfo) {
        match self.store.record_info(device_id.as_str(), info.clone()) {
            Ok(MergeOutcome::Changed) => {
                self.event_bus
                    .publish(DeviceEvent::identified(device_id.clone(), info));
            }
            Ok(MergeOutcome::Unchanged) => {}
            Err(e) => tracing::error!(%device_id, error = %e, "Dropped printer identity"),
        }
    }
}

/// Polls a fixed set of printers and publishes their state.
///
/// Configurations are validated once, at construction. Invalid ones and
/// repeated IDs are logged, kept in [`rejected`](Self::rejected) and never
/// polled; they do not prevent the other printers from being polled.
///
/// Each started printer is polled by its own task owning its own
/// transport. A slow or silent printer never delays another.
///
/// # Examples
///
/// ```no_run
/// use picaso_lib::Coordinator;
/// use picaso_lib::coordinator::DeviceConfig;
///
/// # async fn example() {
/// let mut coordinator = Coordinator::new([
///     DeviceConfig::new("workshop", "192.168.1.50"),
///     DeviceConfig::new("workshop", "192.168.1.51"),
/// ]);
///
/// assert_eq!(coordinator.device_ids().len(), 1);
/// assert_eq!(coordinator.rejected().len(), 1);
///
/// coordinator.start();
/// // ...
/// coordinator.stop().await;
/// # }
/// ```
pub struct Coordinator<T = UdpTransport> {
    configs: Vec<DeviceConfig>,
    rejected: Vec<(DeviceConfig, ConfigError)>,
    factory: TransportFactory<T>,
    shared: Arc<Shared>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    phases: HashMap<DeviceId, watch::Receiver<PollPhase>>,
}

impl Coordinator<UdpTransport> {
    /// Creates a coordinator polling over UDP.
    #[must_use]
    pub fn new(configs: impl IntoIterator<Item = DeviceConfig>) -> Self {
        Self::with_transport(configs, |_| UdpTransport::new())
    }
}

impl<T: Transport + 'static> Coordinator<T> {
    /// Creates a coordinator building each poller's transport with `factory`.
    #[must_use]
    pub fn with_transport<F>(configs: impl IntoIterator<Item = DeviceConfig>, factory: F) -> Self
    where
        F: Fn(&DeviceConfig) -> T + Send + Sync + 'static,
    {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        let mut seen = HashSet::new();

        for config in configs {
            let check = config.validate().and_then(|()| {
                if seen.insert(config.id().to_string()) {
                    Ok(())
                } else {
                    Err(ConfigError::DuplicateId(config.id().to_string()))
                }
            });

            match check {
                Ok(()) => accepted.push(config),
                Err(e) => {
                    tracing::error!(
                        device_id = config.id(),
                        host = config.host(),
                        error = %e,
                        "Rejected printer configuration"
                    );
                    rejected.push((config, e));
                }
            }
        }

        let shared = Shared {
            store: StateStore::new(accepted.iter().cloned()),
            callbacks: CallbackRegistry::new(),
            event_bus: EventBus::new(),
        };

        Self {
            configs: accepted,
            rejected,
            factory: Box::new(factory),
            shared: Arc::new(shared),
            cancel: CancellationToken::new(),
            tasks: Vec::new(),
            phases: HashMap::new(),
        }
    }

    /// Starts one polling task per accepted printer.
    ///
    /// Does nothing if already running. A stopped coordinator can be
    /// started again; printer state is kept across restarts.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start(&mut self) {
        if self.is_running() {
            tracing::debug!("Coordinator already running");
            return;
        }
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }

        for config in &self.configs {
            let poller = Poller::new(config.clone(), (self.factory)(config));
            self.phases.insert(poller.id().clone(), poller.watch_phase());

            let sink = Arc::clone(&self.shared);
            let cancel = self.cancel.child_token();
            self.tasks.push(tokio::spawn(poller.run(sink, cancel)));
        }

        tracing::info!(devices = self.tasks.len(), "Coordinator started");
    }

    /// Stops all polling tasks and waits for them to finish.
    ///
    /// In-flight requests are abandoned and their sockets closed. No
    /// callback runs and no event is published after this returns.
    pub async fn stop(&mut self) {
        if !self.is_running() {
            return;
        }

        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Polling task ended abnormally");
            }
        }
        self.phases.clear();

        tracing::info!("Coordinator stopped");
    }
}

impl<T> Coordinator<T> {
    /// Returns `true` between [`start`](Self::start) and [`stop`](Self::stop).
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Returns the configurations refused at construction, with the reason.
    #[must_use]
    pub fn rejected(&self) -> &[(DeviceConfig, ConfigError)] {
        &self.rejected
    }

    /// Returns the IDs of the polled printers, sorted.
    #[must_use]
    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.shared.store.device_ids()
    }

    /// Returns the current state of a printer.
    #[must_use]
    pub fn state(&self, device_id: &str) -> Option<DeviceState> {
        self.shared.store.snapshot(device_id)
    }

    /// Returns the current state of every printer, ordered by ID.
    #[must_use]
    pub fn states(&self) -> Vec<DeviceState> {
        self.shared.store.snapshots()
    }

    /// Returns the poll phase of a printer while the coordinator runs.
    #[must_use]
    pub fn phase(&self, device_id: &str) -> Option<PollPhase> {
        self.phases.get(device_id).map(|rx| *rx.borrow())
    }

    /// Subscribes to all device events.
    ///
    /// A receiver that falls behind loses the oldest events and gets
    /// [`broadcast::error::RecvError::Lagged`].
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<DeviceEvent> {
        self.shared.event_bus.subscribe()
    }

    fn ensure_known(&self, device_id: &str) -> Result<DeviceId, Error> {
        if self.shared.store.contains(device_id) {
            Ok(DeviceId::new(device_id))
        } else {
            Err(Error::DeviceNotFound(device_id.to_string()))
        }
    }
}

impl<T> Subscribable for Coordinator<T> {
    fn subscribe<F>(&self, device_id: &str, callback: F) -> Result<SubscriptionId, Error>
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        let device_id = self.ensure_known(device_id)?;
        Ok(self.shared.callbacks.on_state_changed(device_id, callback))
    }

    fn on_availability_changed<F>(
        &self,
        device_id: &str,
        callback: F,
    ) -> Result<SubscriptionId, Error>
    where
        F: Fn(&DeviceId, bool) + Send + Sync + 'static,
    {
        let device_id = self.ensure_known(device_id)?;
        Ok(self
            .shared
            .callbacks
            .on_availability_changed(device_id, callback))
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.callbacks.unsubscribe(id)
    }
}

impl<T> Drop for Coordinator<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<T> std::fmt::Debug for Coordinator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("devices", &self.configs.len())
            .field("rejected", &self.rejected.len())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
