// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types of the PICASO 3D status protocol.
//!
//! # Types
//!
//! - [`MachineState`] / [`MachineStatus`] - What the printer is doing
//! - [`PauseReason`] / [`StopReason`] - Bit masks explaining pauses and stops
//! - [`PrinterEvent`] - Entries of the event journal
//! - [`PrinterType`] / [`NozzleSize`] - Printer model and installed nozzles
//! - [`PrinterInfo`] - Identity reported by the identity query

mod machine;
mod printer_event;
mod printer_info;
mod printer_model;
mod reason;

pub use machine::{MachineState, MachineStatus};
pub use printer_event::{EventSeverity, EventSource, PrinterEvent};
pub use printer_info::{NozzleSlot, PrinterInfo};
pub use printer_model::{NozzleSize, PrinterType};
pub use reason::{PauseReason, StopReason};
