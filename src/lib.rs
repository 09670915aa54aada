// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `PicasoLib` - A Rust library to monitor PICASO 3D printers.
//!
//! This library polls printers over their UDP query service, decodes the
//! binary status replies and keeps a live, fault-tolerant view of every
//! printer. Only significant changes are published: a new status, or a
//! printer going offline after several missed replies.
//!
//! # Supported Features
//!
//! - **Status polling**: Machine state, job progress, temperatures, pause/stop reasons
//! - **Identity**: Model, firmware version, serial number, nozzle setup
//! - **Event journal**: Error codes reported by the printer (protocol 2)
//! - **Availability**: Printers are marked offline after `retry_limit` missed polls
//!
//! # Protocol Versions
//!
//! - 0.1: Original status frame
//! - 1.1: Adds the ready flag
//! - 2.1: Adds preheating and a timestamped event journal
//!
//! # Quick Start
//!
//! ```no_run
//! use picaso_lib::{Coordinator, DeviceConfig, Subscribable};
//!
//! #[tokio::main]
//! async fn main() -> picaso_lib::Result<()> {
//!     let mut coordinator = Coordinator::new([DeviceConfig::new("workshop", "192.168.1.50")]);
//!
//!     coordinator.subscribe("workshop", |state| {
//!         match state.last_status() {
//!             Some(status) if state.is_available() => {
//!                 println!("{:?}, bed at {:?} °C", status.state, status.bed_temperature);
//!             }
//!             _ => println!("workshop is offline"),
//!         }
//!     })?;
//!
//!     coordinator.start();
//!     tokio::time::sleep(std::time::Duration::from_secs(300)).await;
//!     coordinator.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Decoding a Reply Directly
//!
//! ```
//! use picaso_lib::codec::{self, DecodeProfile};
//!
//! let reply = [0u8; 8];
//! assert!(codec::decode_status(&reply, DecodeProfile::default()).is_err());
//! assert_eq!(codec::STATUS_REQUEST, [1, 0, 1, 0, 0, 0, 8, 0]);
//! ```

pub mod codec;
pub mod coordinator;
pub mod error;
pub mod event;
pub mod poller;
pub mod state;
pub mod subscription;
pub mod transport;
pub mod types;

pub use coordinator::{Coordinator, DeviceConfig};
pub use error::{ConfigError, DecodeError, Error, Result, TransportError};
pub use event::{DeviceEvent, DeviceId, EventBus};
pub use poller::{BackoffPolicy, PollPhase, PollResult, PollSink, Poller};
pub use state::{DeviceState, FieldValue, MergeOutcome, PrinterStatus, StateStore};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use transport::{Transport, UdpTransport};
pub use types::{
    EventSeverity, EventSource, MachineState, MachineStatus, NozzleSize, NozzleSlot, PauseReason,
    PrinterEvent, PrinterInfo, PrinterType, StopReason,
};
