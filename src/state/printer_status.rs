// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded status snapshot of a printer.

use std::fmt;

use serde::Serialize;

use crate::types::{MachineState, MachineStatus, PauseReason, PrinterEvent, StopReason};

/// Structured status decoded from one status reply.
///
/// Every field is optional: `None` means the printer did not report the
/// value (unset sentinel on the wire, or a field the protocol version does
/// not carry). Two snapshots are equal only if every field is equal by value;
/// floats are compared exactly.
///
/// # Examples
///
/// ```
/// use picaso_lib::state::{FieldValue, PrinterStatus};
/// use picaso_lib::types::MachineState;
///
/// let status = PrinterStatus {
///     state: Some(MachineState::Printing),
///     bed_temperature: Some(60.0),
///     ..PrinterStatus::default()
/// };
///
/// assert_eq!(status.field("state"), Some(FieldValue::Text("printing".into())));
/// assert_eq!(status.field("bed_temperature"), Some(FieldValue::Float(60.0)));
/// assert_eq!(status.field("chamber_temperature"), Some(FieldValue::NotReported));
/// assert_eq!(status.field("no_such_field"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrinterStatus {
    /// Protocol major version of the reply this snapshot was decoded from.
    pub protocol_major: u8,
    /// What the mechanics are doing.
    pub state: Option<MachineState>,
    /// Overall status as shown on the printer display.
    pub status: Option<MachineStatus>,
    /// Name of the current or last job.
    pub task_name: Option<String>,
    /// Job progress in percent.
    pub task_progress: Option<f32>,
    /// Estimated remaining job time in seconds.
    pub task_remaining_secs: Option<u32>,
    /// First nozzle temperature in °C.
    pub first_nozzle_temperature: Option<f32>,
    /// Second nozzle temperature in °C.
    pub second_nozzle_temperature: Option<f32>,
    /// Chamber temperature in °C.
    pub chamber_temperature: Option<f32>,
    /// Bed temperature in °C.
    pub bed_temperature: Option<f32>,
    /// Why the job is paused.
    pub pause_reason: Option<PauseReason>,
    /// Why the last job was stopped.
    pub stop_reason: Option<StopReason>,
    /// Printer is ready to accept a job (protocol 1 and later).
    pub ready: Option<bool>,
    /// Printer is preheating (protocol 2).
    pub preheating: Option<bool>,
    /// Event journal entries. `None` when the printer cannot report them.
    pub events: Option<Vec<PrinterEvent>>,
}

/// Value of a single status field, as seen by a presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Integral value.
    Integer(i64),
    /// Floating-point value.
    Float(f32),
    /// Boolean flag.
    Bool(bool),
    /// Text or enumeration name.
    Text(String),
    /// The printer did not report this field.
    NotReported,
}

impl FieldValue {
    /// Returns `true` if the field was reported.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        !matches!(self, Self::NotReported)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::NotReported => f.write_str("-"),
        }
    }
}

impl PrinterStatus {
    /// Names of all fields exposed through [`field`](Self::field), in
    /// presentation order.
    pub const FIELDS: [&'static str; 14] = [
        "state",
        "status",
        "task_name",
        "task_progress",
        "task_remaining_secs",
        "first_nozzle_temperature",
        "second_nozzle_temperature",
        "chamber_temperature",
        "bed_temperature",
        "pause_reason",
        "stop_reason",
        "ready",
        "preheating",
        "error_code",
    ];

    /// Returns the value of the named field.
    ///
    /// Returns `None` for a name not listed in [`FIELDS`](Self::FIELDS).
    #[must_use]
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "state" => text(self.state.map(|s| s.as_str())),
            "status" => text(self.status.map(|s| s.as_str())),
            "task_name" => text(self.task_name.as_deref()),
            "task_progress" => float(self.task_progress),
            "task_remaining_secs" => integer(self.task_remaining_secs.map(i64::from)),
            "first_nozzle_temperature" => float(self.first_nozzle_temperature),
            "second_nozzle_temperature" => float(self.second_nozzle_temperature),
            "chamber_temperature" => float(self.chamber_temperature),
            "bed_temperature" => float(self.bed_temperature),
            "pause_reason" => self
                .pause_reason
                .map_or(FieldValue::NotReported, |r| FieldValue::Text(r.to_string())),
            "stop_reason" => self
                .stop_reason
                .map_or(FieldValue::NotReported, |r| FieldValue::Text(r.to_string())),
            "ready" => boolean(self.ready),
            "preheating" => boolean(self.preheating),
            "error_code" => integer(self.error_code().map(i64::from)),
            _ => return None,
        };
        Some(value)
    }

    /// Returns every field with its value, in [`FIELDS`](Self::FIELDS) order.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        Self::FIELDS
            .iter()
            .filter_map(|name| self.field(name).map(|value| (*name, value)))
            .collect()
    }

    /// Returns the code of the most severe event in the journal.
    ///
    /// Events without a severity rank lowest; among equals the first entry
    /// wins. An empty journal yields `0`; a printer that cannot report its
    /// journal yields `None`.
    #[must_use]
    pub fn error_code(&self) -> Option<i32> {
        let events = self.events.as_ref()?;
        let mut worst: Option<&PrinterEvent> = None;
        for event in events {
            let rank = event.severity.map_or(0, |s| s.rank());
            let worst_rank = worst.and_then(|w| w.severity).map_or(0, |s| s.rank());
            if worst.is_none() || rank > worst_rank {
                worst = Some(event);
            }
        }
        Some(worst.map_or(0, |event| event.code))
    }

    /// Returns `true` if the status reports an error condition.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.status.is_some_and(|s| s.is_error())
            || self.stop_reason.is_some_and(|r| !r.is_empty())
    }
}

fn text(value: Option<&str>) -> FieldValue {
    value.map_or(FieldValue::NotReported, |v| FieldValue::Text(v.to_string()))
}

fn float(value: Option<f32>) -> FieldValue {
    value.map_or(FieldValue::NotReported, FieldValue::Float)
}

fn integer(value: Option<i64>) -> FieldValue {
    value.map_or(FieldValue::NotReported, FieldValue::Integer)
}

fn boolean(value: Option<bool>) -> FieldValue {
    value.map_or(FieldValue::NotReported, FieldValue::Bool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventSeverity, EventSource, MachineStatus};

    fn event(code: i32, severity: Option<EventSeverity>) -> PrinterEvent {
        PrinterEvent {
            code,
            severity,
            source: Some(EventSource::None),
            timestamp: Some(0),
        }
    }

    #[test]
    fn every_listed_field_resolves() {
        let status = PrinterStatus::default();
        for name in PrinterStatus::FIELDS {
            assert_eq!(status.field(name), Some(FieldValue::NotReported), "{name}");
        }
        assert_eq!(status.fields().len(), PrinterStatus::FIELDS.len());
    }

    #[test]
    fn equality_is_exact_on_floats() {
        let a = PrinterStatus {
            bed_temperature: Some(60.0),
            ..PrinterStatus::default()
        };
        let mut b = a.clone();
        assert_eq!(a, b);

        b.bed_temperature = Some(60.000_004);
        assert_ne!(a, b);
    }

    #[test]
    fn error_code_picks_most_severe() {
        let status = PrinterStatus {
            events: Some(vec![
                event(11, Some(EventSeverity::Warning)),
                event(42, Some(EventSeverity::Critical)),
                event(7, Some(EventSeverity::Critical)),
                event(3, Some(EventSeverity::Info)),
            ]),
            ..PrinterStatus::default()
        };
        assert_eq!(status.error_code(), Some(42));
    }

    #[test]
    fn error_code_without_severity_uses_first() {
        let status = PrinterStatus {
            events: Some(vec![PrinterEvent::code_only(5), PrinterEvent::code_only(9)]),
            ..PrinterStatus::default()
        };
        assert_eq!(status.error_code(), Some(5));
    }

    #[test]
    fn error_code_empty_and_unreported() {
        let empty = PrinterStatus {
            events: Some(Vec::new()),
            ..PrinterStatus::default()
        };
        assert_eq!(empty.error_code(), Some(0));
        assert_eq!(PrinterStatus::default().error_code(), None);
    }

    #[test]
    fn has_error_from_status_or_stop_reason() {
        let mut status = PrinterStatus {
            status: Some(MachineStatus::WaitNewTask),
            stop_reason: Some(StopReason::default()),
            ..PrinterStatus::default()
        };
        assert!(!status.has_error());

        status.stop_reason = Some(StopReason::from_bits(StopReason::GCODE_ERROR));
        assert!(status.has_error());
    }

    #[test]
    fn field_value_display() {
        assert_eq!(FieldValue::Integer(3).to_string(), "3");
        assert_eq!(FieldValue::NotReported.to_string(), "-");
        assert!(!FieldValue::NotReported.is_reported());
    }
}
