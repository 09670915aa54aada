// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reply encoders for printer simulators and tests.
//!
//! These build well-formed replies from decoded values, so that decoding
//! an encoded value gives back every field the protocol version can carry.
//! Unreported fields are written as their unset sentinel.

use super::info::{
    MAX_INFO_MINOR, NAME_LEN, NOZZLE_NAME_LEN, PROFILE_LEN, SERIAL_LEN, info_frame_size,
};
use super::status::{Layout, STATUS_MINOR, offset};
use super::text::encode_text;
use super::{DecodeProfile, FrameHeader, INFO_COMMAND, STATUS_COMMAND};
use crate::state::PrinterStatus;
use crate::types::PrinterInfo;

/// Builds a status reply for `status.protocol_major`.
///
/// Protocol versions above 2 are encoded as version 2. Strings use the
/// encoding selected by `profile`; the event journal is always written,
/// even for printers whose journal the decoder ignores.
#[must_use]
pub fn encode_status(status: &PrinterStatus, profile: DecodeProfile) -> Vec<u8> {
    let major = status.protocol_major.min(2);
    let Some(layout) = Layout::for_major(major) else {
        return Vec::new();
    };

    let mut frame = vec![0u8; layout.size];
    write_header(&mut frame, major, STATUS_MINOR, STATUS_COMMAND);

    put(&mut frame, offset::STATE, &status.state.map_or(0, |s| s.code()).to_le_bytes());
    put(&mut frame, offset::STATUS, &status.status.map_or(0, |s| s.code()).to_le_bytes());

    match major {
        0 => {}
        1 => frame[offset::FLAGS] = u8::from(status.ready.unwrap_or(false)),
        _ => {
            let flags = u32::from(status.ready.unwrap_or(false))
                | (u32::from(status.preheating.unwrap_or(false)) << 1);
            put(&mut frame, offset::FLAGS, &flags.to_le_bytes());
        }
    }

    let name = encode_text(
        status.task_name.as_deref().unwrap_or_default(),
        offset::TASK_NAME_LEN,
        profile.utf8,
    );
    put(&mut frame, layout.at(offset::TASK_NAME), &name);

    let floats = [
        (offset::TASK_PROGRESS, status.task_progress),
        (offset::FIRST_NOZZLE, status.first_nozzle_temperature),
        (offset::SECOND_NOZZLE, status.second_nozzle_temperature),
        (offset::CHAMBER, status.chamber_temperature),
        (offset::BED, status.bed_temperature),
    ];
    for (at, value) in floats {
        put(&mut frame, layout.at(at), &value.unwrap_or(f32::NAN).to_le_bytes());
    }

    put(
        &mut frame,
        layout.at(offset::TASK_REMAINING),
        &status.task_remaining_secs.unwrap_or(u32::MAX).to_le_bytes(),
    );

    let events = status.events.as_deref().unwrap_or_default();
    let slot_len = layout.event_slot_len();
    for (slot, event) in events.iter().take(layout.event_slots()).enumerate() {
        let at = layout.at(offset::EVENTS) + slot * slot_len;
        if major >= 2 {
            put(&mut frame, at, &event.packed().to_le_bytes());
            put(&mut frame, at + 2, &event.timestamp.unwrap_or(0).to_le_bytes());
        } else {
            put(&mut frame, at, &event.code.to_le_bytes());
        }
    }

    put(
        &mut frame,
        layout.at(offset::PAUSE_REASON),
        &status.pause_reason.map_or(0, |r| r.bits()).to_le_bytes(),
    );
    put(
        &mut frame,
        layout.at(offset::STOP_REASON),
        &status.stop_reason.map_or(0, |r| r.bits()).to_le_bytes(),
    );

    frame
}

/// Builds an identity reply for `info.protocol_minor`.
///
/// Minor versions above 2 are encoded as version 2. Firmware minor values
/// that do not fit the field of the version are truncated.
#[must_use]
pub fn encode_info(info: &PrinterInfo) -> Vec<u8> {
    let minor = info.protocol_minor.min(MAX_INFO_MINOR);
    let mut frame = Vec::with_capacity(info_frame_size(minor));
    frame.extend_from_slice(&[0; FrameHeader::LEN]);

    frame.extend_from_slice(&info.hardware_minor.to_le_bytes());
    frame.extend_from_slice(&info.hardware_major.to_le_bytes());

    // Fields narrower than i16 keep the low byte.
    #[allow(clippy::cast_possible_truncation)]
    let narrow_minor = info.firmware_minor as i8;
    match minor {
        0 => frame.extend_from_slice(&narrow_minor.to_le_bytes()),
        1 => frame.extend_from_slice(&info.firmware_minor.to_le_bytes()),
        _ => {
            frame.extend_from_slice(&info.firmware_revision.to_le_bytes());
            frame.extend_from_slice(&narrow_minor.to_le_bytes());
        }
    }
    frame.extend_from_slice(&info.firmware_major.to_le_bytes());

    let utf8 = info.supports_utf8();
    let text = |value: Option<&str>, width| encode_text(value.unwrap_or_default(), width, utf8);

    frame.extend_from_slice(&text(info.name.as_deref(), NAME_LEN));
    frame.extend_from_slice(&text(info.serial.as_deref(), SERIAL_LEN));
    frame.extend_from_slice(&info.mac);

    for slot in &info.nozzles {
        frame.extend_from_slice(&text(slot.name.as_deref(), NOZZLE_NAME_LEN));
        frame.extend_from_slice(&slot.size.map_or(-1, |s| s.code()).to_le_bytes());
        frame.extend_from_slice(&text(slot.profile.as_deref(), PROFILE_LEN));
    }

    write_header(&mut frame, info.protocol_major, minor, INFO_COMMAND);
    frame
}

fn write_header(frame: &mut [u8], major: u8, minor: u8, command: u16) {
    let header = FrameHeader {
        major,
        minor,
        command,
        reserved: 0,
        size: u16::try_from(frame.len()).unwrap_or(u16::MAX),
    };
    put(frame, 0, &header.to_bytes());
}

fn put(frame: &mut [u8], at: usize, bytes: &[u8]) {
    frame[at..at + bytes.len()].copy_from_slice(bytes);
}
