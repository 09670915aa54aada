// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Printer state tracking.
//!
//! [`PrinterStatus`] is one decoded status reply. [`DeviceState`] is what is
//! published for a printer: the last good status, availability and
//! timestamps. [`StateStore`] holds one `DeviceState` per printer and
//! decides, on every poll outcome, whether the change is worth publishing.
//!
//! # Examples
//!
//! ```
//! use picaso_lib::coordinator::DeviceConfig;
//! use picaso_lib::poller::PollResult;
//! use picaso_lib::state::{MergeOutcome, StateStore};
//!
//! let store = StateStore::new([DeviceConfig::new("lab", "192.168.1.50").with_retry_limit(2)]);
//!
//! assert_eq!(store.merge("lab", PollResult::Timeout)?, MergeOutcome::Unchanged);
//! assert_eq!(store.merge("lab", PollResult::Timeout)?, MergeOutcome::Changed);
//! assert!(!store.snapshot("lab").unwrap().is_available());
//! # Ok::<(), picaso_lib::Error>(())
//! ```

mod device_state;
mod printer_status;
mod state_store;

pub use device_state::{DeviceState, MergeOutcome};
pub use printer_status::{FieldValue, PrinterStatus};
pub use state_store::StateStore;
