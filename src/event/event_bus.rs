// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting device events.

use tokio::sync::broadcast;

use super::DeviceEvent;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Broadcast channel carrying [`DeviceEvent`]s to any number of receivers.
///
/// A receiver that falls more than the channel capacity behind loses the
/// oldest events and gets `RecvError::Lagged`. Pollers never wait on slow
/// receivers.
///
/// # Examples
///
/// ```
/// use picaso_lib::event::{DeviceEvent, DeviceId, EventBus};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DeviceEvent::availability_changed(DeviceId::new("lab"), true, None));
///
/// let event = rx.try_recv().unwrap();
/// assert!(event.is_availability_change());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DeviceEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus buffering up to `capacity` events per receiver.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns a receiver for all events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all receivers.
    ///
    /// Without receivers the event is dropped.
    pub fn publish(&self, event: DeviceEvent) {
        if self.sender.receiver_count() == 0 {
            return;
        }
        // Only fails when every receiver was dropped in between
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
