// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary codec for the PICASO 3D UDP query protocol.
//!
//! Every datagram starts with an 8-byte little-endian header:
//!
//! | Offset | Type  | Field                                   |
//! |--------|-------|-----------------------------------------|
//! | 0      | `u8`  | protocol major version                  |
//! | 1      | `u8`  | protocol minor version                  |
//! | 2      | `u16` | command code                            |
//! | 4      | `u16` | reserved                                |
//! | 6      | `u16` | total frame size, header included       |
//!
//! Requests are header-only frames, so they are constants
//! ([`STATUS_REQUEST`], [`INFO_REQUEST`]). Replies are decoded by
//! [`decode_status`] and [`decode_info`]; both reject the whole frame on any
//! inconsistency and never return a partial result.
//!
//! # Examples
//!
//! ```
//! use picaso_lib::codec::{self, DecodeProfile, fixture};
//! use picaso_lib::state::PrinterStatus;
//! use picaso_lib::types::MachineState;
//!
//! let status = PrinterStatus {
//!     protocol_major: 2,
//!     state: Some(MachineState::Idle),
//!     ..PrinterStatus::default()
//! };
//! let frame = fixture::encode_status(&status, DecodeProfile::default());
//!
//! let decoded = codec::decode_status(&frame, DecodeProfile::default()).unwrap();
//! assert_eq!(decoded.state, Some(MachineState::Idle));
//! ```

pub mod fixture;
mod info;
mod reader;
mod status;
mod text;

pub use info::decode_info;
pub use status::{decode_status, status_frame_size};

use crate::error::DecodeError;
use crate::types::PrinterInfo;

/// Command code of the status query.
pub const STATUS_COMMAND: u16 = 0x0001;

/// Command code of the identity query.
pub const INFO_COMMAND: u16 = 0x000C;

/// Status query datagram.
pub const STATUS_REQUEST: [u8; FrameHeader::LEN] = FrameHeader::request(STATUS_COMMAND).to_bytes();

/// Identity query datagram.
pub const INFO_REQUEST: [u8; FrameHeader::LEN] = FrameHeader::request(INFO_COMMAND).to_bytes();

/// The fixed header at the start of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Protocol major version.
    pub major: u8,
    /// Protocol minor version.
    pub minor: u8,
    /// Command code.
    pub command: u16,
    /// Reserved word, zero in practice.
    pub reserved: u16,
    /// Declared total frame size.
    pub size: u16,
}

impl FrameHeader {
    /// Header length in bytes.
    pub const LEN: usize = 8;

    /// Builds the header of a header-only request frame.
    #[must_use]
    pub const fn request(command: u16) -> Self {
        Self {
            major: 1,
            minor: 0,
            command,
            reserved: 0,
            size: 8,
        }
    }

    /// Parses the header at the start of `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::TooShort`] if `frame` is shorter than the header.
    pub fn parse(frame: &[u8]) -> Result<Self, DecodeError> {
        let reader = reader::FrameReader::new(frame);
        Ok(Self {
            major: reader.u8(0)?,
            minor: reader.u8(1)?,
            command: reader.u16(2)?,
            reserved: reader.u16(4)?,
            size: reader.u16(6)?,
        })
    }

    /// Serializes the header.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; Self::LEN] {
        let command = self.command.to_le_bytes();
        let reserved = self.reserved.to_le_bytes();
        let size = self.size.to_le_bytes();
        [
            self.major,
            self.minor,
            command[0],
            command[1],
            reserved[0],
            reserved[1],
            size[0],
            size[1],
        ]
    }

    /// Checks the command code.
    pub(crate) fn expect_command(&self, expected: u16) -> Result<(), DecodeError> {
        if self.command == expected {
            Ok(())
        } else {
            Err(DecodeError::UnexpectedCommand {
                expected,
                actual: self.command,
            })
        }
    }

    /// Checks that the declared size matches the received length.
    pub(crate) fn expect_size(&self, actual: usize) -> Result<(), DecodeError> {
        if usize::from(self.size) == actual {
            Ok(())
        } else {
            Err(DecodeError::SizeMismatch {
                expected: usize::from(self.size),
                actual,
            })
        }
    }
}

/// Per-printer settings that change how a status frame is decoded.
///
/// Derived from the printer's identity; [`Default`] is used until the
/// identity is known (UTF-8 strings, event journal read when present).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeProfile {
    /// Strings are UTF-8 rather than Windows-1251.
    pub utf8: bool,
    /// The printer is a second-series model, whose event journal cannot be
    /// read on protocol versions 1 and 2.
    pub series_2: bool,
}

impl Default for DecodeProfile {
    fn default() -> Self {
        Self {
            utf8: true,
            series_2: false,
        }
    }
}

impl From<&PrinterInfo> for DecodeProfile {
    fn from(info: &PrinterInfo) -> Self {
        Self {
            utf8: info.supports_utf8(),
            series_2: info.printer_type().is_series_2(),
        }
    }
}
