// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for printer state subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry storing callbacks per printer and dispatching to them

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::event::DeviceId;
use crate::state::DeviceState;

/// Unique identifier for a subscription.
///
/// Returned when subscribing and used to unsubscribe later. IDs are never
/// reused by a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Callback receiving the published state of a printer.
type StateCallback = Arc<dyn Fn(&DeviceState) + Send + Sync>;

/// Callback receiving the new availability of a printer.
type AvailabilityCallback = Arc<dyn Fn(&DeviceId, bool) + Send + Sync>;

/// Registry of subscription callbacks, keyed by printer.
///
/// Callbacks are copied out of the registry before they are called, so a
/// callback may subscribe or unsubscribe without deadlocking. Callbacks of
/// one printer run in subscription order.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    state_callbacks: RwLock<BTreeMap<SubscriptionId, (DeviceId, StateCallback)>>,
    availability_callbacks: RwLock<BTreeMap<SubscriptionId, (DeviceId, AvailabilityCallback)>>,
}

impl CallbackRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state_callbacks: RwLock::new(BTreeMap::new()),
            availability_callbacks: RwLock::new(BTreeMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback for state changes of one printer.
    pub fn on_state_changed<F>(&self, device_id: DeviceId, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_callbacks
            .write()
            .insert(id, (device_id, Arc::new(callback)));
        id
    }

    /// Registers a callback for availability transitions of one printer.
    pub fn on_availability_changed<F>(&self, device_id: DeviceId, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceId, bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.availability_callbacks
            .write()
            .insert(id, (device_id, Arc::new(callback)));
        id
    }

    /// Unregisters a callback.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state_callbacks.write().remove(&id).is_some()
            || self.availability_callbacks.write().remove(&id).is_some()
    }

    /// Removes every callback.
    pub fn clear(&self) {
        self.state_callbacks.write().clear();
        self.availability_callbacks.write().clear();
    }

    /// Calls the state callbacks registered for the printer of `state`.
    pub fn dispatch_state(&self, device_id: &DeviceId, state: &DeviceState) {
        let callbacks: Vec<_> = self
            .state_callbacks
            .read()
            .values()
            .filter(|(id, _)| id == device_id)
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(state);
        }
    }

    /// Calls the availability callbacks registered for a printer.
    pub fn dispatch_availability(&self, device_id: &DeviceId, available: bool) {
        let callbacks: Vec<_> = self
            .availability_callbacks
            .read()
            .values()
            .filter(|(id, _)| id == device_id)
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(device_id, available);
        }
    }

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.state_callbacks.read().len() + self.availability_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::DeviceConfig;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicU32;

    fn state(id: &str) -> DeviceState {
        DeviceState::new(DeviceConfig::new(id, "192.168.1.50"))
    }

    #[test]
    fn subscription_id_display() {
        assert_eq!(SubscriptionId::new(42).to_string(), "Sub(42)");
        assert_eq!(SubscriptionId::new(42).value(), 42);
    }

    #[test]
    fn dispatches_only_to_matching_device() {
        let registry = CallbackRegistry::new();
        let lab = Arc::new(AtomicU32::new(0));
        let annex = Arc::new(AtomicU32::new(0));
        let lab_clone = lab.clone();
        let annex_clone = annex.clone();

        registry.on_state_changed(DeviceId::new("lab"), move |state| {
            assert_eq!(state.id(), "lab");
            lab_clone.fetch_add(1, Ordering::SeqCst);
        });
        registry.on_state_changed(DeviceId::new("annex"), move |_| {
            annex_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch_state(&DeviceId::new("lab"), &state("lab"));
        registry.dispatch_state(&DeviceId::new("lab"), &state("lab"));

        assert_eq!(lab.load(Ordering::SeqCst), 2);
        assert_eq!(annex.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dispatches_in_subscription_order() {
        let registry = CallbackRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let order = order.clone();
            registry.on_state_changed(DeviceId::new("lab"), move |_| order.lock().push(n));
        }
        registry.dispatch_state(&DeviceId::new("lab"), &state("lab"));

        assert_eq!(*order.lock(), [0, 1, 2]);
    }

    #[test]
    fn availability_callbacks() {
        let registry = CallbackRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        registry.on_availability_changed(DeviceId::new("lab"), move |id, available| {
            seen_clone.lock().push((id.to_string(), available));
        });
        registry.dispatch_availability(&DeviceId::new("lab"), false);
        registry.dispatch_availability(&DeviceId::new("annex"), false);
        registry.dispatch_availability(&DeviceId::new("lab"), true);

        assert_eq!(
            *seen.lock(),
            [("lab".to_string(), false), ("lab".to_string(), true)]
        );
    }

    #[test]
    fn unsubscribe() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let id = registry.on_state_changed(DeviceId::new("lab"), move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        let other = registry.on_availability_changed(DeviceId::new("lab"), |_, _| {});
        assert_eq!(registry.callback_count(), 2);

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.dispatch_state(&DeviceId::new("lab"), &state("lab"));
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        assert!(registry.unsubscribe(other));
        assert!(registry.is_empty());
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let registry = Arc::new(CallbackRegistry::new());
        let slot = Arc::new(Mutex::new(None::<SubscriptionId>));
        let calls = Arc::new(AtomicU32::new(0));

        let id = {
            let inner = Arc::clone(&registry);
            let slot = slot.clone();
            let calls = calls.clone();
            registry.on_state_changed(DeviceId::new("lab"), move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                if let Some(id) = slot.lock().take() {
                    inner.unsubscribe(id);
                }
            })
        };
        *slot.lock() = Some(id);

        registry.dispatch_state(&DeviceId::new("lab"), &state("lab"));
        registry.dispatch_state(&DeviceId::new("lab"), &state("lab"));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn unique_ids_and_clear() {
        let registry = CallbackRegistry::new();
        let a = registry.on_state_changed(DeviceId::new("lab"), |_| {});
        let b = registry.on_availability_changed(DeviceId::new("lab"), |_, _| {});

        assert_ne!(a, b);
        registry.clear();
        assert!(registry.is_empty());
        assert!(format!("{registry:?}").contains("callback_count"));
    }
}
