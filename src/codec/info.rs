// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identity reply decoding.
//!
//! The payload is a packed sequence whose firmware fields depend on the
//! protocol minor version:
//!
//! | Minor | Firmware fields after the hardware version |
//! |-------|--------------------------------------------|
//! | 0     | `minor: i8`, `major: i8`                   |
//! | 1     | `minor: i16`, `major: i8`                  |
//! | 2     | `revision: i8`, `minor: i8`, `major: i8`   |
//!
//! followed by `name[20]`, `serial[50]`, `mac[6]` and two nozzle slots of
//! `name[10]`, `size: i8`, `profile[40]`.

use super::reader::FrameReader;
use super::text::decode_text;
use super::{FrameHeader, INFO_COMMAND};
use crate::error::DecodeError;
use crate::types::{NozzleSize, NozzleSlot, PrinterInfo};

pub(super) const NAME_LEN: usize = 20;
pub(super) const SERIAL_LEN: usize = 50;
pub(super) const MAC_LEN: usize = 6;
pub(super) const NOZZLE_NAME_LEN: usize = 10;
pub(super) const PROFILE_LEN: usize = 40;

/// Highest identity minor version this decoder understands.
pub(super) const MAX_INFO_MINOR: u8 = 2;

/// Length of the identity frame for a protocol minor version.
pub(super) const fn info_frame_size(minor: u8) -> usize {
    let firmware = if minor == 0 { 2 } else { 3 };
    FrameHeader::LEN
        + 2
        + firmware
        + NAME_LEN
        + SERIAL_LEN
        + MAC_LEN
        + 2 * (NOZZLE_NAME_LEN + 1 + PROFILE_LEN)
}

/// Sequential reader over the identity payload.
struct Cursor<'a> {
    reader: FrameReader<'a>,
    at: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let bytes = self.reader.bytes(self.at, len)?;
        self.at += len;
        Ok(bytes)
    }

    fn i8(&mut self) -> Result<i8, DecodeError> {
        let value = self.reader.i8(self.at)?;
        self.at += 1;
        Ok(value)
    }

    fn i16(&mut self) -> Result<i16, DecodeError> {
        let value = self.reader.i16(self.at)?;
        self.at += 2;
        Ok(value)
    }
}

/// Decodes an identity reply.
///
/// Strings are decoded with the encoding the reported firmware uses.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the frame is too short, answers another
/// command, uses an unknown minor version, or its declared size does not
/// match the datagram.
pub fn decode_info(frame: &[u8]) -> Result<PrinterInfo, DecodeError> {
    let header = FrameHeader::parse(frame)?;
    header.expect_command(INFO_COMMAND)?;

    if header.minor > MAX_INFO_MINOR {
        return Err(DecodeError::UnsupportedProtocol {
            major: header.major,
            minor: header.minor,
        });
    }

    let minimum = info_frame_size(header.minor);
    if frame.len() < minimum {
        return Err(DecodeError::TooShort {
            expected: minimum,
            actual: frame.len(),
        });
    }
    header.expect_size(frame.len())?;

    let mut cursor = Cursor {
        reader: FrameReader::new(frame),
        at: FrameHeader::LEN,
    };

    let mut info = PrinterInfo {
        protocol_major: header.major,
        protocol_minor: header.minor,
        hardware_minor: cursor.i8()?,
        hardware_major: cursor.i8()?,
        ..PrinterInfo::default()
    };

    match header.minor {
        0 => info.firmware_minor = i16::from(cursor.i8()?),
        1 => info.firmware_minor = cursor.i16()?,
        _ => {
            info.firmware_revision = cursor.i8()?;
            info.firmware_minor = i16::from(cursor.i8()?);
        }
    }
    info.firmware_major = cursor.i8()?;

    let utf8 = info.supports_utf8();
    info.name = decode_text(cursor.take(NAME_LEN)?, utf8);
    info.serial = decode_text(cursor.take(SERIAL_LEN)?, utf8);
    info.mac.copy_from_slice(cursor.take(MAC_LEN)?);

    for slot in &mut info.nozzles {
        *slot = NozzleSlot {
            name: decode_text(cursor.take(NOZZLE_NAME_LEN)?, utf8),
            size: NozzleSize::from_code(cursor.i8()?),
            profile: decode_text(cursor.take(PROFILE_LEN)?, utf8),
        };
    }

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::fixture;
    use crate::types::PrinterType;

    fn designer_x_pro(minor: u8) -> PrinterInfo {
        PrinterInfo {
            protocol_major: 1,
            protocol_minor: minor,
            hardware_major: 4,
            hardware_minor: 1,
            firmware_major: 6,
            firmware_minor: 2,
            firmware_revision: if minor == 2 { 17 } else { 0 },
            name: Some("Lab printer".to_string()),
            serial: Some("XP-000123".to_string()),
            mac: [0x02, 0x00, 0x5e, 0x10, 0x20, 0x30],
            nozzles: [
                NozzleSlot {
                    name: Some("Left".to_string()),
                    size: Some(NozzleSize::D0_4),
                    profile: Some("PLA".to_string()),
                },
                NozzleSlot {
                    name: None,
                    size: None,
                    profile: None,
                },
            ],
        }
    }

    #[test]
    fn frame_sizes_by_minor() {
        assert_eq!(info_frame_size(0), 190);
        assert_eq!(info_frame_size(1), 191);
        assert_eq!(info_frame_size(2), 191);
    }

    #[test]
    fn decodes_every_minor() {
        for minor in 0..=2 {
            let info = designer_x_pro(minor);
            let frame = fixture::encode_info(&info);
            assert_eq!(frame.len(), info_frame_size(minor));
            assert_eq!(decode_info(&frame).unwrap(), info, "minor {minor}");
        }
    }

    #[test]
    fn wide_firmware_minor() {
        let info = PrinterInfo {
            firmware_minor: 300,
            ..designer_x_pro(1)
        };
        let decoded = decode_info(&fixture::encode_info(&info)).unwrap();
        assert_eq!(decoded.firmware_minor, 300);
        assert_eq!(decoded.firmware_version().as_deref(), Some("6.300"));
    }

    #[test]
    fn derived_values() {
        let decoded = decode_info(&fixture::encode_info(&designer_x_pro(2))).unwrap();
        assert_eq!(decoded.printer_type(), PrinterType::DesignerXPro);
        assert_eq!(decoded.firmware_version().as_deref(), Some("6.2.17"));
        assert_eq!(decoded.mac_address(), "02:00:5e:10:20:30");
        assert!(decoded.supports_utf8());
    }

    #[test]
    fn old_firmware_uses_windows_1251() {
        let info = PrinterInfo {
            name: Some("Принтер".to_string()),
            ..designer_x_pro(0)
        };
        assert!(!info.supports_utf8());
        let decoded = decode_info(&fixture::encode_info(&info)).unwrap();
        assert_eq!(decoded.name.as_deref(), Some("Принтер"));
    }

    #[test]
    fn rejects_unknown_minor() {
        let mut frame = fixture::encode_info(&designer_x_pro(2));
        frame[1] = 3;
        assert_eq!(
            decode_info(&frame).unwrap_err(),
            DecodeError::UnsupportedProtocol { major: 1, minor: 3 }
        );
    }

    #[test]
    fn rejects_short_and_foreign_frames() {
        let frame = fixture::encode_info(&designer_x_pro(1));
        assert!(matches!(
            decode_info(&frame[..120]),
            Err(DecodeError::TooShort { expected: 191, .. })
        ));

        let mut status_reply = frame.clone();
        status_reply[2] = 0x01;
        assert!(matches!(
            decode_info(&status_reply),
            Err(DecodeError::UnexpectedCommand { .. })
        ));
    }
}
