// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scheduled polling of a single printer.
//!
//! A [`Poller`] turns each request/reply exchange into a [`PollResult`] and
//! hands it to a [`PollSink`]. It never decides availability itself; it
//! only reports what happened on every attempt.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use picaso_lib::coordinator::DeviceConfig;
//! use picaso_lib::event::DeviceId;
//! use picaso_lib::poller::{PollResult, PollSink, Poller};
//! use picaso_lib::transport::UdpTransport;
//! use tokio_util::sync::CancellationToken;
//!
//! struct Print;
//!
//! impl PollSink for Print {
//!     fn on_result(&self, device_id: &DeviceId, result: PollResult) {
//!         println!("{device_id}: {result}");
//!     }
//! }
//!
//! # async fn example() {
//! let config = DeviceConfig::new("lab", "192.168.1.50");
//! let poller = Poller::new(config, UdpTransport::new());
//! let cancel = CancellationToken::new();
//!
//! tokio::spawn(poller.run(Arc::new(Print), cancel.clone()));
//! // ...
//! cancel.cancel();
//! # }
//! ```

mod backoff;
mod device_poller;
mod poll_result;

pub use backoff::BackoffPolicy;
pub use device_poller::Poller;
pub use poll_result::{PollPhase, PollResult};

use crate::event::DeviceId;
use crate::types::PrinterInfo;

/// Receiver of poll outcomes.
///
/// Called on the poller task, once per finished attempt. Implementations
/// must not block.
pub trait PollSink: Send + Sync {
    /// Handles the result of one attempt.
    fn on_result(&self, device_id: &DeviceId, result: PollResult);

    /// Handles a newly learned printer identity.
    ///
    /// Called before [`on_result`](Self::on_result) of the same attempt.
    fn on_identified(&self, device_id: &DeviceId, info: PrinterInfo) {
        let _ = (device_id, info);
    }
}
