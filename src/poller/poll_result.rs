// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outcome of one poll attempt.

use std::fmt;

use crate::error::{DecodeError, TransportError};
use crate::state::PrinterStatus;

/// Classified outcome of a single poll attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum PollResult {
    /// A valid status reply was decoded.
    Success(PrinterStatus),
    /// No reply arrived within the timeout.
    Timeout,
    /// A reply arrived but was rejected by the decoder.
    Malformed(String),
    /// The request could not be sent or the socket failed.
    TransportError(String),
}

impl PollResult {
    /// Returns `true` for [`PollResult::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the decoded status of a successful attempt.
    #[must_use]
    pub const fn status(&self) -> Option<&PrinterStatus> {
        match self {
            Self::Success(status) => Some(status),
            _ => None,
        }
    }

    /// Returns a description of the failure, or `None` on success.
    #[must_use]
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success(_) => None,
            Self::Timeout => Some("no reply".to_string()),
            Self::Malformed(reason) => Some(format!("malformed reply: {reason}")),
            Self::TransportError(reason) => Some(format!("transport error: {reason}")),
        }
    }
}

impl From<TransportError> for PollResult {
    fn from(error: TransportError) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::TransportError(error.to_string())
        }
    }
}

impl From<DecodeError> for PollResult {
    fn from(error: DecodeError) -> Self {
        Self::Malformed(error.to_string())
    }
}

impl fmt::Display for PollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(_) => f.write_str("success"),
            Self::Timeout => f.write_str("timeout"),
            Self::Malformed(reason) => write!(f, "malformed: {reason}"),
            Self::TransportError(reason) => write!(f, "transport error: {reason}"),
        }
    }
}

/// Observable phase of a poller.
///
/// Each attempt moves `Idle → Requesting → Waiting → Succeeded | Failed`
/// and back to `Idle` once the result has been delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PollPhase {
    /// Between attempts.
    #[default]
    Idle,
    /// Resolving the address and sending the request.
    Requesting,
    /// Waiting for the reply.
    Waiting,
    /// The attempt produced a status.
    Succeeded,
    /// The attempt failed.
    Failed,
}

impl fmt::Display for PollPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Waiting => "waiting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_error_classifies_as_timeout() {
        assert_eq!(PollResult::from(TransportError::Timeout(5000)), PollResult::Timeout);
    }

    #[test]
    fn io_error_classifies_as_transport_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let result = PollResult::from(TransportError::Io(io));
        assert!(matches!(result, PollResult::TransportError(ref r) if r.contains("denied")));
        assert!(!result.is_success());
    }

    #[test]
    fn decode_error_classifies_as_malformed() {
        let result = PollResult::from(DecodeError::TooShort {
            expected: 343,
            actual: 3,
        });
        assert!(matches!(result, PollResult::Malformed(_)));
        assert!(result.failure_reason().unwrap().starts_with("malformed reply"));
    }

    #[test]
    fn success_accessors() {
        let result = PollResult::Success(PrinterStatus::default());
        assert!(result.is_success());
        assert_eq!(result.status(), Some(&PrinterStatus::default()));
        assert_eq!(result.failure_reason(), None);
        assert_eq!(result.to_string(), "success");
    }

    #[test]
    fn phase_default_is_idle() {
        assert_eq!(PollPhase::default(), PollPhase::Idle);
        assert_eq!(PollPhase::Waiting.to_string(), "waiting");
    }
}
