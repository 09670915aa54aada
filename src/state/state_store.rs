// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared store of per-printer state.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;

use crate::coordinator::DeviceConfig;
use crate::error::Error;
use crate::event::DeviceId;
use crate::poller::PollResult;
use crate::types::PrinterInfo;

use super::{DeviceState, MergeOutcome};

/// A change produced by a merge, with the state to publish.
#[derive(Debug, Clone)]
pub(crate) struct StateUpdate {
    pub state: DeviceState,
    pub availability_changed: bool,
}

/// Last known state of every configured printer.
///
/// The set of printers is fixed at construction. Each entry has its own
/// lock, so merges for different printers never contend; the map lock is
/// only held long enough to find an entry.
///
/// # Examples
///
/// ```
/// use picaso_lib::coordinator::DeviceConfig;
/// use picaso_lib::poller::PollResult;
/// use picaso_lib::state::{MergeOutcome, PrinterStatus, StateStore};
///
/// let store = StateStore::new([DeviceConfig::new("lab", "192.168.1.50")]);
/// let status = PrinterStatus::default();
///
/// let first = store.merge("lab", PollResult::Success(status.clone()))?;
/// let second = store.merge("lab", PollResult::Success(status))?;
///
/// assert_eq!(first, MergeOutcome::Changed);
/// assert_eq!(second, MergeOutcome::Unchanged);
/// # Ok::<(), picaso_lib::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct StateStore {
    devices: RwLock<HashMap<DeviceId, RwLock<DeviceState>>>,
}

impl StateStore {
    /// Creates a store with one initial entry per configuration.
    ///
    /// A later configuration with an already used ID replaces the earlier one.
    #[must_use]
    pub fn new(configs: impl IntoIterator<Item = DeviceConfig>) -> Self {
        let devices = configs
            .into_iter()
            .map(|config| (DeviceId::new(config.id()), RwLock::new(DeviceState::new(config))))
            .collect();

        Self {
            devices: RwLock::new(devices),
        }
    }

    /// Merges one poll outcome into the state of a printer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] for an unknown device ID.
    pub fn merge(&self, device_id: &str, result: PollResult) -> Result<MergeOutcome, Error> {
        self.with_entry(device_id, |state| state.apply(result, Utc::now()))
    }

    /// Records the identity of a printer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] for an unknown device ID.
    pub fn record_info(&self, device_id: &str, info: PrinterInfo) -> Result<MergeOutcome, Error> {
        self.with_entry(device_id, |state| state.set_info(info))
    }

    /// Merges one poll outcome and returns the state to publish on change.
    pub(crate) fn update(
        &self,
        device_id: &str,
        result: PollResult,
    ) -> Result<Option<StateUpdate>, Error> {
        self.with_entry(device_id, |state| {
            let was_available = state.is_available();
            match state.apply(result, Utc::now()) {
                MergeOutcome::Changed => Some(StateUpdate {
                    availability_changed: was_available != state.is_available(),
                    state: state.clone(),
                }),
                MergeOutcome::Unchanged => None,
            }
        })
    }

    /// Returns a copy of the state of a printer.
    #[must_use]
    pub fn snapshot(&self, device_id: &str) -> Option<DeviceState> {
        let devices = self.devices.read();
        devices.get(device_id).map(|entry| entry.read().clone())
    }

    /// Returns a copy of the state of every printer, ordered by ID.
    #[must_use]
    pub fn snapshots(&self) -> Vec<DeviceState> {
        let devices = self.devices.read();
        let mut states: Vec<_> = devices.values().map(|entry| entry.read().clone()).collect();
        states.sort_by(|a, b| a.id().cmp(b.id()));
        states
    }

    /// Returns the IDs of all printers, sorted.
    #[must_use]
    pub fn device_ids(&self) -> Vec<DeviceId> {
        let mut ids: Vec<_> = self.devices.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Returns `true` if a printer has this ID.
    #[must_use]
    pub fn contains(&self, device_id: &str) -> bool {
        self.devices.read().contains_key(device_id)
    }

    /// Returns the number of printers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    /// Returns `true` if the store has no printers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }

    fn with_entry<R>(
        &self,
        device_id: &str,
        f: impl FnOnce(&mut DeviceState) -> R,
    ) -> Result<R, Error> {
        let devices = self.devices.read();
        let entry = devices
            .get(device_id)
            .ok_or_else(|| Error::DeviceNotFound(device_id.to_string()))?;
        let mut state = entry.write();
        Ok(f(&mut state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PrinterStatus;
    use crate::types::MachineState;

    fn store(retry_limit: u32) -> StateStore {
        StateStore::new([
            DeviceConfig::new("lab", "192.168.1.50").with_retry_limit(retry_limit),
            DeviceConfig::new("annex", "192.168.1.51"),
        ])
    }

    fn status(state: MachineState) -> PrinterStatus {
        PrinterStatus {
            state: Some(state),
            task_progress: Some(12.5),
            ..PrinterStatus::default()
        }
    }

    #[test]
    fn unknown_device() {
        let store = store(3);

        assert!(matches!(
            store.merge("attic", PollResult::Timeout),
            Err(Error::DeviceNotFound(id)) if id == "attic"
        ));
        assert!(store.snapshot("attic").is_none());
    }

    #[test]
    fn merge_is_idempotent() {
        let store = store(3);
        let a = status(MachineState::Printing);

        assert_eq!(
            store.merge("lab", PollResult::Success(a.clone())).unwrap(),
            MergeOutcome::Changed
        );
        assert_eq!(
            store.merge("lab", PollResult::Success(a.clone())).unwrap(),
            MergeOutcome::Unchanged
        );
        assert_eq!(store.snapshot("lab").unwrap().last_status(), Some(&a));
    }

    #[test]
    fn availability_flips_once_at_retry_limit() {
        let store = store(3);
        let outcomes: Vec<_> = (0..5)
            .map(|_| store.merge("lab", PollResult::Timeout).unwrap())
            .collect();

        assert_eq!(
            outcomes,
            [
                MergeOutcome::Unchanged,
                MergeOutcome::Unchanged,
                MergeOutcome::Changed,
                MergeOutcome::Unchanged,
                MergeOutcome::Unchanged,
            ]
        );
        let state = store.snapshot("lab").unwrap();
        assert!(!state.is_available());
        assert_eq!(state.consecutive_failures(), 5);
    }

    #[test]
    fn success_after_failures_recovers() {
        let store = store(2);
        let a = status(MachineState::Idle);
        store.merge("lab", PollResult::Success(a.clone())).unwrap();
        store.merge("lab", PollResult::Timeout).unwrap();
        store
            .merge("lab", PollResult::TransportError("unreachable".into()))
            .unwrap();
        assert!(!store.snapshot("lab").unwrap().is_available());

        assert_eq!(
            store.merge("lab", PollResult::Success(a)).unwrap(),
            MergeOutcome::Changed
        );
        let state = store.snapshot("lab").unwrap();
        assert!(state.is_available());
        assert_eq!(state.consecutive_failures(), 0);
    }

    #[test]
    fn timeout_scenario_notifies_on_third_and_sixth_attempt() {
        let store = store(3);
        let a = status(MachineState::Printing);
        let script = [
            PollResult::Timeout,
            PollResult::Timeout,
            PollResult::Success(a.clone()),
            PollResult::Timeout,
            PollResult::Timeout,
            PollResult::Timeout,
        ];

        let mut notified = Vec::new();
        for (attempt, result) in (1..).zip(script) {
            if let Some(update) = store.update("lab", result).unwrap() {
                notified.push((attempt, update.state.is_available(), update.availability_changed));
            }
        }

        assert_eq!(notified, [(3, true, false), (6, false, true)]);
        let state = store.snapshot("lab").unwrap();
        assert_eq!(state.last_status(), Some(&a));
    }

    #[test]
    fn devices_are_independent() {
        let store = store(1);
        store.merge("lab", PollResult::Timeout).unwrap();

        assert!(!store.snapshot("lab").unwrap().is_available());
        assert!(store.snapshot("annex").unwrap().is_available());
    }

    #[test]
    fn listing() {
        let store = store(3);

        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
        assert_eq!(store.device_ids(), [DeviceId::new("annex"), DeviceId::new("lab")]);
        let ids: Vec<_> = store.snapshots().iter().map(|s| s.id().to_string()).collect();
        assert_eq!(ids, ["annex", "lab"]);
    }

    #[test]
    fn record_info() {
        let store = store(3);
        let info = PrinterInfo {
            serial: Some("PX-0042".into()),
            ..PrinterInfo::default()
        };

        assert_eq!(store.record_info("lab", info.clone()).unwrap(), MergeOutcome::Changed);
        assert_eq!(store.record_info("lab", info).unwrap(), MergeOutcome::Unchanged);
        assert_eq!(
            store.snapshot("lab").unwrap().info().and_then(|i| i.serial.as_deref()),
            Some("PX-0042")
        );
    }

    #[test]
    fn concurrent_merges_for_different_devices() {
        let store = std::sync::Arc::new(store(100));
        let handles: Vec<_> = ["lab", "annex"]
            .into_iter()
            .map(|id| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        store.merge(id, PollResult::Timeout).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.snapshot("lab").unwrap().consecutive_failures(), 50);
        assert_eq!(store.snapshot("annex").unwrap().consecutive_failures(), 50);
    }
}
