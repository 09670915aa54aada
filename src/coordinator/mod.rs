// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinator polling a fixed set of printers.
//!
//! The [`Coordinator`] is the entry point for applications. It:
//!
//! - validates the [`DeviceConfig`] list once, rejecting invalid or duplicate entries
//! - runs one polling task per printer, each with its own cancellation token
//! - merges every poll outcome into a shared [`StateStore`](crate::state::StateStore)
//! - publishes significant changes to callbacks and to a broadcast channel
//!
//! # Examples
//!
//! ## Callbacks
//!
//! ```no_run
//! use std::time::Duration;
//! use picaso_lib::Coordinator;
//! use picaso_lib::coordinator::DeviceConfig;
//! use picaso_lib::subscription::Subscribable;
//!
//! #[tokio::main]
//! async fn main() -> picaso_lib::Result<()> {
//!     let mut coordinator = Coordinator::new([
//!         DeviceConfig::new("workshop", "192.168.1.50"),
//!         DeviceConfig::new("lab", "printer-lab.local")
//!             .with_poll_interval(Duration::from_secs(10)),
//!     ]);
//!
//!     coordinator.subscribe("workshop", |state| {
//!         if let Some(status) = state.last_status() {
//!             println!("workshop: {:?} {:?}%", status.state, status.task_progress);
//!         }
//!     })?;
//!     coordinator.on_availability_changed("lab", |id, available| {
//!         println!("{id} available: {available}");
//!     })?;
//!
//!     coordinator.start();
//!     tokio::time::sleep(Duration::from_secs(60)).await;
//!     coordinator.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Event Channel
//!
//! ```no_run
//! use picaso_lib::Coordinator;
//! use picaso_lib::coordinator::DeviceConfig;
//! use picaso_lib::event::DeviceEvent;
//!
//! # async fn example() {
//! let mut coordinator = Coordinator::new([DeviceConfig::new("workshop", "192.168.1.50")]);
//! let mut events = coordinator.events();
//! coordinator.start();
//!
//! while let Ok(event) = events.recv().await {
//!     match event {
//!         DeviceEvent::StateChanged { device_id, state } => {
//!             println!("{device_id}: {:?}", state.last_status());
//!         }
//!         DeviceEvent::AvailabilityChanged { device_id, available, .. } => {
//!             println!("{device_id} available: {available}");
//!         }
//!         DeviceEvent::Identified { device_id, info } => {
//!             println!("{device_id} is a {}", info.printer_type());
//!         }
//!     }
//! }
//! # }
//! ```

mod device_config;
mod device_coordinator;

pub use device_config::{
    DEFAULT_POLL_INTERVAL, DEFAULT_PORT, DEFAULT_RETRY_LIMIT, DEFAULT_TIMEOUT, DeviceConfig,
};
pub use device_coordinator::Coordinator;
