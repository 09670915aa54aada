// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that publish printer state.

use crate::error::Error;
use crate::event::DeviceId;
use crate::state::DeviceState;
use crate::subscription::SubscriptionId;

/// Trait for types that publish printer state to callbacks.
///
/// Callbacks run on the polling task of the printer, after the state has
/// been stored and outside every internal lock. They must not block.
///
/// # Examples
///
/// ```no_run
/// use picaso_lib::Coordinator;
/// use picaso_lib::coordinator::DeviceConfig;
/// use picaso_lib::subscription::Subscribable;
///
/// # async fn example() -> picaso_lib::Result<()> {
/// let mut coordinator = Coordinator::new([DeviceConfig::new("lab", "192.168.1.50")]);
///
/// let sub_id = coordinator.subscribe("lab", |state| {
///     println!("{} available: {}", state.id(), state.is_available());
/// })?;
///
/// coordinator.start();
/// // ...
/// coordinator.unsubscribe(sub_id);
/// coordinator.stop().await;
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to published state changes of one printer.
    ///
    /// The callback receives the complete state whenever the status
    /// changes by value or the availability flips.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] if no printer has this ID.
    fn subscribe<F>(&self, device_id: &str, callback: F) -> Result<SubscriptionId, Error>
    where
        F: Fn(&DeviceState) + Send + Sync + 'static;

    /// Subscribes to availability transitions of one printer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] if no printer has this ID.
    fn on_availability_changed<F>(
        &self,
        device_id: &str,
        callback: F,
    ) -> Result<SubscriptionId, Error>
    where
        F: Fn(&DeviceId, bool) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
