// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `picaso_lib` library.
//!
//! Three families of errors exist:
//!
//! - [`TransportError`]: the datagram exchange failed (timeout, socket failure)
//! - [`DecodeError`]: a reply arrived but could not be interpreted
//! - [`ConfigError`]: a device configuration was rejected at startup
//!
//! Transport and decode errors are device-local and expected in normal
//! operation. They are absorbed by the poller's retry policy and only ever
//! surface to subscribers as an availability change.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while exchanging datagrams with a printer.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error occurred while decoding a printer reply.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A device configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Device was not found in the coordinator.
    #[error("device not found: {0}")]
    DeviceNotFound(String),
}

/// Errors related to the UDP exchange with a printer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No reply arrived within the configured bound.
    #[error("no reply within {0} ms")]
    Timeout(u64),

    /// Socket or network failure (host unreachable, bind failure, ...).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured host name could not be resolved.
    #[error("cannot resolve address: {0}")]
    AddressResolution(String),
}

impl TransportError {
    /// Returns `true` if this error is a reply timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Errors related to decoding printer replies.
///
/// A decode error always means the whole reply was rejected; no partially
/// decoded status is ever produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The datagram is shorter than the smallest valid frame.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    TooShort {
        /// Minimum number of bytes required.
        expected: usize,
        /// Number of bytes received.
        actual: usize,
    },

    /// The frame length does not match the declared or expected size.
    #[error("frame size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Size the frame should have.
        expected: usize,
        /// Size the frame actually has.
        actual: usize,
    },

    /// The reply answers a different command than the one requested.
    #[error("unexpected command code {actual:#06x}, expected {expected:#06x}")]
    UnexpectedCommand {
        /// Command code that was requested.
        expected: u16,
        /// Command code found in the reply header.
        actual: u16,
    },

    /// The reply uses a protocol version this library cannot interpret.
    #[error("unsupported protocol version {major}.{minor}")]
    UnsupportedProtocol {
        /// Protocol major version from the header.
        major: u8,
        /// Protocol minor version from the header.
        minor: u8,
    },

    /// A field holds a value outside its documented domain.
    #[error("invalid {field}: {message}")]
    InvalidValue {
        /// The field that failed to decode.
        field: &'static str,
        /// Description of the failure.
        message: String,
    },
}

/// Errors related to device configuration.
///
/// These are the only errors that prevent a poller from starting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The device identifier is empty.
    #[error("device id must not be empty")]
    EmptyId,

    /// Another device was already configured with this identifier.
    #[error("duplicate device id: {0}")]
    DuplicateId(String),

    /// The host is empty or not a valid address.
    #[error("invalid host: {0:?}")]
    InvalidHost(String),

    /// The port is outside 1-65535.
    #[error("port must be in range [1, 65535]")]
    InvalidPort,

    /// The poll interval is zero.
    #[error("poll interval must be greater than zero")]
    ZeroInterval,

    /// The reply timeout is zero.
    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    /// The retry limit is zero.
    #[error("retry limit must be at least 1")]
    ZeroRetryLimit,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
