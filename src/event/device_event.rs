// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use serde::Serialize;

use crate::state::DeviceState;
use crate::types::PrinterInfo;

use super::DeviceId;

/// Events emitted by the coordinator.
///
/// Events are only emitted for significant changes: a poll that reports
/// the same status as the previous one produces nothing.
///
/// # Examples
///
/// ```
/// use picaso_lib::event::{DeviceEvent, DeviceId};
///
/// let event =
///     DeviceEvent::availability_changed(DeviceId::new("lab"), false, Some("no reply".into()));
///
/// assert!(event.is_availability_change());
/// assert_eq!(event.device_id().as_str(), "lab");
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// The published state of a device changed.
    ///
    /// Emitted for a new status and for availability transitions alike.
    StateChanged {
        /// The ID of the device.
        device_id: DeviceId,
        /// The complete new state of the device.
        state: DeviceState,
    },

    /// A device became available or unavailable.
    AvailabilityChanged {
        /// The ID of the device.
        device_id: DeviceId,
        /// Whether the device is now available.
        available: bool,
        /// Last failure when the device became unavailable.
        error: Option<String>,
    },

    /// The identity of a device became known or changed.
    Identified {
        /// The ID of the device.
        device_id: DeviceId,
        /// The reported identity.
        info: PrinterInfo,
    },
}

impl DeviceEvent {
    /// Returns the device ID associated with this event.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::StateChanged { device_id, .. }
            | Self::AvailabilityChanged { device_id, .. }
            | Self::Identified { device_id, .. } => device_id,
        }
    }

    /// Returns `true` if this is a state change event.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Returns `true` if this is an availability event.
    #[must_use]
    pub fn is_availability_change(&self) -> bool {
        matches!(self, Self::AvailabilityChanged { .. })
    }

    /// Creates a state changed event.
    #[must_use]
    pub fn state_changed(device_id: DeviceId, state: DeviceState) -> Self {
        Self::StateChanged { device_id, state }
    }

    /// Creates an availability event.
    #[must_use]
    pub fn availability_changed(
        device_id: DeviceId,
        available: bool,
        error: Option<String>,
    ) -> Self {
        Self::AvailabilityChanged {
            device_id,
            available,
            error,
        }
    }

    /// Creates an identified event.
    #[must_use]
    pub fn identified(device_id: DeviceId, info: PrinterInfo) -> Self {
        Self::Identified { device_id, info }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::DeviceConfig;

    #[test]
    fn device_id_extraction() {
        let id = DeviceId::new("lab");

        let identified = DeviceEvent::identified(id.clone(), PrinterInfo::default());
        assert_eq!(identified.device_id(), &id);

        let offline = DeviceEvent::availability_changed(id.clone(), false, None);
        assert_eq!(offline.device_id(), &id);
    }

    #[test]
    fn kind_predicates() {
        let id = DeviceId::new("lab");
        let state = DeviceState::new(DeviceConfig::new("lab", "192.168.1.50"));

        let event = DeviceEvent::state_changed(id.clone(), state);
        assert!(event.is_state_change());
        assert!(!event.is_availability_change());

        assert!(DeviceEvent::availability_changed(id, true, None).is_availability_change());
    }

    #[test]
    fn serializes_with_type_tag() {
        let event =
            DeviceEvent::availability_changed(DeviceId::new("lab"), false, Some("no reply".into()));
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "availability_changed");
        assert_eq!(json["device_id"], "lab");
        assert_eq!(json["available"], false);
        assert_eq!(json["error"], "no reply");
    }
}
