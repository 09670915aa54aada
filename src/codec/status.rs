// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status reply decoding.

use super::reader::FrameReader;
use super::text::decode_text;
use super::{DecodeProfile, FrameHeader, STATUS_COMMAND};
use crate::error::DecodeError;
use crate::state::PrinterStatus;
use crate::types::{MachineState, MachineStatus, PauseReason, PrinterEvent, StopReason};

/// Frame-relative offsets of the protocol 0 layout.
///
/// Fields from the task name on move by [`Layout::shift`] bytes in later
/// protocol versions.
pub(super) mod offset {
    pub const STATE: usize = 8;
    pub const STATUS: usize = 12;
    pub const FLAGS: usize = 16;
    pub const TASK_NAME: usize = 16;
    pub const TASK_NAME_LEN: usize = 255;
    pub const TASK_PROGRESS: usize = 275;
    pub const TASK_REMAINING: usize = 287;
    pub const FIRST_NOZZLE: usize = 295;
    pub const SECOND_NOZZLE: usize = 299;
    pub const CHAMBER: usize = 303;
    pub const BED: usize = 307;
    pub const EVENTS: usize = 315;
    pub const PAUSE_REASON: usize = 335;
    pub const STOP_REASON: usize = 339;
}

/// Smallest valid status frame (protocol 0).
const MIN_FRAME_SIZE: usize = 343;

/// Status reply minor version this decoder understands.
pub(super) const STATUS_MINOR: u8 = 1;

const REMAINING_UNSET: u32 = 0xFFFF_FFFF;

/// Version-dependent frame geometry.
#[derive(Debug, Clone, Copy)]
pub(super) struct Layout {
    pub major: u8,
    pub size: usize,
    pub shift: usize,
}

impl Layout {
    pub(super) const fn for_major(major: u8) -> Option<Self> {
        let (size, shift) = match major {
            0 => (343, 0),
            1 => (344, 1),
            2 => (387, 4),
            _ => return None,
        };
        Some(Self { major, size, shift })
    }

    pub(super) const fn at(&self, base: usize) -> usize {
        base + self.shift
    }

    /// Size of one event journal slot.
    pub(super) const fn event_slot_len(&self) -> usize {
        if self.major >= 2 { 6 } else { 4 }
    }

    /// Number of journal slots that fit before the reason block.
    pub(super) const fn event_slots(&self) -> usize {
        (offset::PAUSE_REASON - offset::EVENTS) / self.event_slot_len()
    }
}

/// Returns the expected status frame size for a protocol major version.
#[must_use]
pub fn status_frame_size(major: u8) -> Option<usize> {
    Layout::for_major(major).map(|layout| layout.size)
}

/// Decodes a status reply.
///
/// Checks run in a fixed order: minimum length, header, command code,
/// protocol version, declared size against the received length, and
/// finally the size expected for the version.
///
/// # Errors
///
/// Returns a [`DecodeError`] if any check fails or a state or status code is
/// outside its known domain.
pub fn decode_status(frame: &[u8], profile: DecodeProfile) -> Result<PrinterStatus, DecodeError> {
    if frame.len() < MIN_FRAME_SIZE {
        return Err(DecodeError::TooShort {
            expected: MIN_FRAME_SIZE,
            actual: frame.len(),
        });
    }

    let header = FrameHeader::parse(frame)?;
    header.expect_command(STATUS_COMMAND)?;

    let layout = Layout::for_major(header.major)
        .filter(|_| header.minor == STATUS_MINOR)
        .ok_or(DecodeError::UnsupportedProtocol {
            major: header.major,
            minor: header.minor,
        })?;

    header.expect_size(frame.len())?;
    if frame.len() != layout.size {
        return Err(DecodeError::SizeMismatch {
            expected: layout.size,
            actual: frame.len(),
        });
    }

    let reader = FrameReader::new(frame);

    let (ready, preheating) = match layout.major {
        0 => (None, None),
        1 => (Some(reader.u8(offset::FLAGS)? != 0), None),
        _ => {
            let flags = reader.u32(offset::FLAGS)?;
            (Some(flags & 0x1 != 0), Some(flags & 0x2 != 0))
        }
    };

    let events = if profile.series_2 && layout.major >= 1 {
        None
    } else {
        Some(decode_events(&reader, layout)?)
    };

    let remaining = reader.u32(layout.at(offset::TASK_REMAINING))?;

    Ok(PrinterStatus {
        protocol_major: layout.major,
        state: decode_state(reader.i32(offset::STATE)?)?,
        status: decode_machine_status(reader.u32(offset::STATUS)?)?,
        task_name: decode_text(
            reader.bytes(layout.at(offset::TASK_NAME), offset::TASK_NAME_LEN)?,
            profile.utf8,
        ),
        task_progress: reported(reader.f32(layout.at(offset::TASK_PROGRESS))?),
        task_remaining_secs: (remaining != REMAINING_UNSET).then_some(remaining),
        first_nozzle_temperature: reported(reader.f32(layout.at(offset::FIRST_NOZZLE))?),
        second_nozzle_temperature: reported(reader.f32(layout.at(offset::SECOND_NOZZLE))?),
        chamber_temperature: reported(reader.f32(layout.at(offset::CHAMBER))?),
        bed_temperature: reported(reader.f32(layout.at(offset::BED))?),
        pause_reason: Some(PauseReason::from_bits(
            reader.u32(layout.at(offset::PAUSE_REASON))?,
        )),
        stop_reason: Some(StopReason::from_bits(
            reader.u32(layout.at(offset::STOP_REASON))?,
        )),
        ready,
        preheating,
        events,
    })
}

fn decode_state(code: i32) -> Result<Option<MachineState>, DecodeError> {
    if code == 0 {
        return Ok(None);
    }
    MachineState::from_code(code)
        .map(Some)
        .ok_or_else(|| DecodeError::InvalidValue {
            field: "state",
            message: format!("unknown machine state code {code}"),
        })
}

fn decode_machine_status(code: u32) -> Result<Option<MachineStatus>, DecodeError> {
    if code == 0 || code == MachineStatus::INITIAL_STATE_CODE {
        return Ok(None);
    }
    MachineStatus::from_code(code)
        .map(Some)
        .ok_or_else(|| DecodeError::InvalidValue {
            field: "status",
            message: format!("unknown machine status code {code:#010x}"),
        })
}

fn decode_events(
    reader: &FrameReader<'_>,
    layout: Layout,
) -> Result<Vec<PrinterEvent>, DecodeError> {
    let start = layout.at(offset::EVENTS);
    let slot_len = layout.event_slot_len();
    let mut events = Vec::new();

    for slot in 0..layout.event_slots() {
        let at = start + slot * slot_len;
        if layout.major >= 2 {
            let packed = reader.u16(at)?;
            if packed != 0 {
                events.push(PrinterEvent::from_packed(packed, reader.u32(at + 2)?));
            }
        } else {
            let id = reader.i32(at)?;
            if id > 0 {
                events.push(PrinterEvent::code_only(id));
            }
        }
    }

    Ok(events)
}

fn reported(value: f32) -> Option<f32> {
    (!value.is_nan()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::fixture;
    use crate::types::{EventSeverity, EventSource};

    fn printing(major: u8) -> PrinterStatus {
        PrinterStatus {
            protocol_major: major,
            state: Some(MachineState::Printing),
            status: Some(MachineStatus::MainPrint),
            task_name: Some("calibration_cube.gcode".to_string()),
            task_progress: Some(42.5),
            task_remaining_secs: Some(3_600),
            first_nozzle_temperature: Some(215.0),
            second_nozzle_temperature: Some(24.5),
            chamber_temperature: Some(31.25),
            bed_temperature: Some(60.0),
            pause_reason: Some(PauseReason::default()),
            stop_reason: Some(StopReason::default()),
            ready: (major >= 1).then_some(false),
            preheating: (major >= 2).then_some(false),
            events: Some(Vec::new()),
        }
    }

    #[test]
    fn frame_sizes() {
        assert_eq!(status_frame_size(0), Some(343));
        assert_eq!(status_frame_size(1), Some(344));
        assert_eq!(status_frame_size(2), Some(387));
        assert_eq!(status_frame_size(3), None);
    }

    #[test]
    fn decodes_every_version() {
        for major in 0..=2 {
            let status = printing(major);
            let frame = fixture::encode_status(&status, DecodeProfile::default());
            assert_eq!(frame.len(), status_frame_size(major).unwrap());

            let decoded = decode_status(&frame, DecodeProfile::default()).unwrap();
            assert_eq!(decoded, status, "protocol {major}");
        }
    }

    #[test]
    fn unset_sentinels_are_not_reported() {
        let status = PrinterStatus {
            protocol_major: 1,
            ..PrinterStatus::default()
        };
        let frame = fixture::encode_status(&status, DecodeProfile::default());
        let decoded = decode_status(&frame, DecodeProfile::default()).unwrap();

        assert_eq!(decoded.state, None);
        assert_eq!(decoded.status, None);
        assert_eq!(decoded.task_name, None);
        assert_eq!(decoded.task_progress, None);
        assert_eq!(decoded.task_remaining_secs, None);
        assert_eq!(decoded.bed_temperature, None);
        assert_eq!(decoded.preheating, None);
        assert_eq!(decoded.ready, Some(false));
    }

    #[test]
    fn initial_status_code_is_unset() {
        let mut frame = fixture::encode_status(&printing(0), DecodeProfile::default());
        frame[offset::STATUS..offset::STATUS + 4]
            .copy_from_slice(&MachineStatus::INITIAL_STATE_CODE.to_le_bytes());

        let decoded = decode_status(&frame, DecodeProfile::default()).unwrap();
        assert_eq!(decoded.status, None);
        assert_eq!(decoded.state, Some(MachineState::Printing));
    }

    #[test]
    fn connection_error_status_decodes() {
        let status = PrinterStatus {
            status: Some(MachineStatus::ConnectionError),
            ..printing(2)
        };
        let frame = fixture::encode_status(&status, DecodeProfile::default());
        let decoded = decode_status(&frame, DecodeProfile::default()).unwrap();
        assert_eq!(decoded.status, Some(MachineStatus::ConnectionError));
    }

    #[test]
    fn short_frames_are_rejected() {
        let frame = fixture::encode_status(&printing(0), DecodeProfile::default());
        for len in [0, 7, 8, 100, 342] {
            assert!(
                matches!(
                    decode_status(&frame[..len], DecodeProfile::default()),
                    Err(DecodeError::TooShort { expected: 343, .. })
                ),
                "length {len}"
            );
        }
    }

    #[test]
    fn truncated_v2_frame_is_size_mismatch() {
        let frame = fixture::encode_status(&printing(2), DecodeProfile::default());
        let err = decode_status(&frame[..350], DecodeProfile::default()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::SizeMismatch {
                expected: 387,
                actual: 350
            }
        );
    }

    #[test]
    fn declared_size_must_match_version() {
        // A protocol 0 frame relabelled as protocol 1: the declared size
        // matches the datagram but not the version.
        let mut frame = fixture::encode_status(&printing(0), DecodeProfile::default());
        frame[0] = 1;
        let err = decode_status(&frame, DecodeProfile::default()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::SizeMismatch {
                expected: 344,
                actual: 343
            }
        );
    }

    #[test]
    fn wrong_command_is_rejected() {
        let mut frame = fixture::encode_status(&printing(0), DecodeProfile::default());
        frame[2] = 0x0C;
        assert_eq!(
            decode_status(&frame, DecodeProfile::default()).unwrap_err(),
            DecodeError::UnexpectedCommand {
                expected: STATUS_COMMAND,
                actual: 0x000C
            }
        );
    }

    #[test]
    fn unsupported_versions_are_rejected() {
        let mut frame = fixture::encode_status(&printing(0), DecodeProfile::default());
        frame[1] = 0;
        assert_eq!(
            decode_status(&frame, DecodeProfile::default()).unwrap_err(),
            DecodeError::UnsupportedProtocol { major: 0, minor: 0 }
        );

        frame[0] = 3;
        frame[1] = 1;
        assert_eq!(
            decode_status(&frame, DecodeProfile::default()).unwrap_err(),
            DecodeError::UnsupportedProtocol { major: 3, minor: 1 }
        );
    }

    #[test]
    fn unknown_state_code_is_invalid() {
        let mut frame = fixture::encode_status(&printing(0), DecodeProfile::default());
        frame[offset::STATE..offset::STATE + 4].copy_from_slice(&99i32.to_le_bytes());
        assert!(matches!(
            decode_status(&frame, DecodeProfile::default()),
            Err(DecodeError::InvalidValue { field: "state", .. })
        ));
    }

    #[test]
    fn v1_events_carry_codes_only() {
        let status = PrinterStatus {
            events: Some(vec![PrinterEvent::code_only(17), PrinterEvent::code_only(4)]),
            ..printing(1)
        };
        let frame = fixture::encode_status(&status, DecodeProfile::default());
        let decoded = decode_status(&frame, DecodeProfile::default()).unwrap();
        assert_eq!(decoded.events, status.events);
    }

    #[test]
    fn v2_events_are_unpacked() {
        let event = PrinterEvent {
            code: 33,
            severity: Some(EventSeverity::Critical),
            source: Some(EventSource::SecondNozzle),
            timestamp: Some(1_234_567),
        };
        let status = PrinterStatus {
            events: Some(vec![event]),
            ..printing(2)
        };
        let frame = fixture::encode_status(&status, DecodeProfile::default());
        let decoded = decode_status(&frame, DecodeProfile::default()).unwrap();
        assert_eq!(decoded.events, Some(vec![event]));
        assert_eq!(decoded.error_code(), Some(33));
    }

    #[test]
    fn series_2_journal_is_not_reported() {
        let profile = DecodeProfile {
            utf8: true,
            series_2: true,
        };
        let status = PrinterStatus {
            events: Some(vec![PrinterEvent::code_only(17)]),
            ..printing(1)
        };
        let frame = fixture::encode_status(&status, profile);
        let decoded = decode_status(&frame, profile).unwrap();
        assert_eq!(decoded.events, None);

        // Protocol 0 predates the restriction.
        let frame = fixture::encode_status(
            &PrinterStatus {
                events: Some(vec![PrinterEvent::code_only(17)]),
                ..printing(0)
            },
            profile,
        );
        let decoded = decode_status(&frame, profile).unwrap();
        assert_eq!(decoded.events, Some(vec![PrinterEvent::code_only(17)]));
    }

    #[test]
    fn windows_1251_task_name() {
        let profile = DecodeProfile {
            utf8: false,
            series_2: false,
        };
        let status = PrinterStatus {
            task_name: Some("Ваза".to_string()),
            ..printing(1)
        };
        let frame = fixture::encode_status(&status, profile);
        let decoded = decode_status(&frame, profile).unwrap();
        assert_eq!(decoded.task_name.as_deref(), Some("Ваза"));
    }

    #[test]
    fn v2_flags() {
        let status = PrinterStatus {
            ready: Some(true),
            preheating: Some(true),
            ..printing(2)
        };
        let frame = fixture::encode_status(&status, DecodeProfile::default());
        assert_eq!(frame[offset::FLAGS], 0b11);

        let decoded = decode_status(&frame, DecodeProfile::default()).unwrap();
        assert_eq!(decoded.ready, Some(true));
        assert_eq!(decoded.preheating, Some(true));
    }
}
