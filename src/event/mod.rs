// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for printer state changes.
//!
//! The [`EventBus`] broadcasts [`DeviceEvent`]s over a tokio broadcast
//! channel. It complements the per-device callbacks of the coordinator:
//! callbacks run synchronously on the poller task, while bus receivers
//! consume events at their own pace.
//!
//! # Examples
//!
//! ```
//! use picaso_lib::event::{DeviceEvent, DeviceId, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(DeviceEvent::availability_changed(DeviceId::new("lab"), false, None));
//! assert!(rx.try_recv().is_ok());
//! ```

mod device_event;
mod device_id;
mod event_bus;

pub use device_event::DeviceEvent;
pub use device_id::DeviceId;
pub use event_bus::EventBus;
