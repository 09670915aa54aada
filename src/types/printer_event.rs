// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entries of the printer's event journal.

use serde::Serialize;

/// Severity of a journal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    /// Informational.
    Info,
    /// Warning.
    Warning,
    /// Error.
    Error,
    /// Critical error.
    Critical,
    /// Fatal error.
    Fatal,
    /// A severity value this library has no name for.
    Unrecognized(u8),
}

impl EventSeverity {
    /// Maps a 3-bit wire value to a severity.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Info,
            1 => Self::Warning,
            2 => Self::Error,
            3 => Self::Critical,
            4 => Self::Fatal,
            other => Self::Unrecognized(other),
        }
    }

    /// Returns the ordering rank; higher is more severe.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Info => 1,
            Self::Warning => 2,
            Self::Error => 3,
            Self::Critical => 4,
            Self::Fatal => 5,
            Self::Unrecognized(_) => 0,
        }
    }
}

/// Subsystem that raised a journal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Not attributed to a subsystem.
    None,
    /// First nozzle.
    FirstNozzle,
    /// Second nozzle.
    SecondNozzle,
    /// Rotation axis.
    R,
    /// Table heater.
    T,
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
    /// Extruder.
    E,
    /// Table Z.
    TableZ,
    /// Print head.
    PrintHead,
    /// XY gantry.
    Xy,
    /// A source value this library has no name for.
    Unrecognized(u8),
}

impl EventSource {
    /// Maps a 6-bit wire value to a source.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::None,
            1 => Self::FirstNozzle,
            2 => Self::SecondNozzle,
            3 => Self::R,
            4 => Self::T,
            5 => Self::X,
            6 => Self::Y,
            7 => Self::Z,
            8 => Self::E,
            9 => Self::TableZ,
            10 => Self::PrintHead,
            11 => Self::Xy,
            other => Self::Unrecognized(other),
        }
    }

    /// Returns the wire value.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::FirstNozzle => 1,
            Self::SecondNozzle => 2,
            Self::R => 3,
            Self::T => 4,
            Self::X => 5,
            Self::Y => 6,
            Self::Z => 7,
            Self::E => 8,
            Self::TableZ => 9,
            Self::PrintHead => 10,
            Self::Xy => 11,
            Self::Unrecognized(code) => *code,
        }
    }
}

/// A single entry of the event journal.
///
/// Older protocol versions only carry the event code; severity, source and
/// timestamp are then `None` rather than invented defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PrinterEvent {
    /// Vendor event code.
    pub code: i32,
    /// Severity, if the protocol reports it.
    pub severity: Option<EventSeverity>,
    /// Originating subsystem, if the protocol reports it.
    pub source: Option<EventSource>,
    /// Device timestamp in seconds, if the protocol reports it.
    pub timestamp: Option<u32>,
}

impl PrinterEvent {
    /// Creates an event that carries only a code.
    #[must_use]
    pub const fn code_only(code: i32) -> Self {
        Self {
            code,
            severity: None,
            source: None,
            timestamp: None,
        }
    }

    /// Unpacks a protocol v2 journal word.
    ///
    /// Bits 0-2 hold the severity, bits 3-9 the code and bits 10-15 the source.
    #[must_use]
    pub const fn from_packed(packed: u16, timestamp: u32) -> Self {
        // Masks keep each value inside its bit field, so the narrowing is exact.
        #[allow(clippy::cast_possible_truncation)]
        let severity = (packed & 0x7) as u8;
        #[allow(clippy::cast_possible_truncation)]
        let source = ((packed >> 10) & 0x3F) as u8;
        let code = ((packed >> 3) & 0x7F) as i32;
        Self {
            code,
            severity: Some(EventSeverity::from_code(severity)),
            source: Some(EventSource::from_code(source)),
            timestamp: Some(timestamp),
        }
    }

    /// Packs the event into a protocol v2 journal word.
    ///
    /// Missing severity and source pack as zero.
    #[must_use]
    pub fn packed(&self) -> u16 {
        let severity = match self.severity {
            Some(EventSeverity::Info) | None => 0,
            Some(EventSeverity::Warning) => 1,
            Some(EventSeverity::Error) => 2,
            Some(EventSeverity::Critical) => 3,
            Some(EventSeverity::Fatal) => 4,
            Some(EventSeverity::Unrecognized(code)) => u16::from(code & 0x7),
        };
        let source = u16::from(self.source.map_or(0, |s| s.code()) & 0x3F);
        let code = u16::try_from(self.code & 0x7F).unwrap_or(0);
        severity | (code << 3) | (source << 10)
    }
}
