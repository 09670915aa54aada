// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback subscriptions to printer state.
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Registry that stores callbacks per printer and dispatches to them
//! - [`Subscribable`] - Trait for types that accept subscriptions
//!
//! Callbacks are one of two ways to observe printers; the other is the
//! broadcast channel returned by
//! [`Coordinator::events`](crate::Coordinator::events).

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
