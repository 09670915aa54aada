// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Printer identity reported by the identity query.

use serde::Serialize;

use super::{NozzleSize, PrinterType};
use crate::codec::DecodeProfile;

/// One nozzle slot of the print head.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NozzleSlot {
    /// Nozzle name, if set.
    pub name: Option<String>,
    /// Installed nozzle size; `None` for an empty slot.
    pub size: Option<NozzleSize>,
    /// Name of the material profile loaded for this nozzle.
    pub profile: Option<String>,
}

/// Identity and firmware information of a printer.
///
/// Obtained once per poller from the identity query. It selects how the
/// status frame is decoded (string encoding, event journal availability).
///
/// # Examples
///
/// ```
/// use picaso_lib::types::{PrinterInfo, PrinterType};
///
/// let info = PrinterInfo {
///     protocol_major: 1,
///     protocol_minor: 2,
///     hardware_major: 7,
///     firmware_major: 6,
///     firmware_minor: 1,
///     firmware_revision: 40,
///     ..PrinterInfo::default()
/// };
///
/// assert_eq!(info.printer_type(), PrinterType::DesignerX);
/// assert_eq!(info.firmware_version().as_deref(), Some("6.1.40"));
/// assert!(info.supports_utf8());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrinterInfo {
    /// Protocol major version of the identity reply.
    pub protocol_major: u8,
    /// Protocol minor version of the identity reply.
    pub protocol_minor: u8,
    /// Hardware major version (selects the model).
    pub hardware_major: i8,
    /// Hardware minor version.
    pub hardware_minor: i8,
    /// Firmware major version.
    pub firmware_major: i8,
    /// Firmware minor version.
    pub firmware_minor: i16,
    /// Firmware revision (protocol 1.2 and later).
    pub firmware_revision: i8,
    /// User-assigned printer name.
    pub name: Option<String>,
    /// Serial number.
    pub serial: Option<String>,
    /// MAC address of the network interface.
    pub mac: [u8; 6],
    /// The two nozzle slots.
    pub nozzles: [NozzleSlot; 2],
}

impl PrinterInfo {
    /// Returns the printer model.
    #[must_use]
    pub const fn printer_type(&self) -> PrinterType {
        PrinterType::from_hardware_major(self.hardware_major)
    }

    /// Returns the name shown to users: the printer name, or the serial
    /// number when no name is set.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.serial.as_deref())
    }

    /// Returns the hardware version as `major.minor`.
    #[must_use]
    pub fn hardware_version(&self) -> String {
        format!("{}.{}", self.hardware_major, self.hardware_minor)
    }

    /// Returns the firmware version string.
    ///
    /// Only protocol 1 reports a firmware version; the revision is included
    /// from protocol 1.2 on.
    #[must_use]
    pub fn firmware_version(&self) -> Option<String> {
        if self.protocol_major != 1 {
            return None;
        }
        if self.protocol_minor <= 1 {
            Some(format!("{}.{}", self.firmware_major, self.firmware_minor))
        } else {
            Some(format!(
                "{}.{}.{}",
                self.firmware_major, self.firmware_minor, self.firmware_revision
            ))
        }
    }

    /// Returns the MAC address as colon-separated lowercase hex.
    #[must_use]
    pub fn mac_address(&self) -> String {
        self.mac
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Returns how status frames from this printer are decoded.
    #[must_use]
    pub fn decode_profile(&self) -> DecodeProfile {
        DecodeProfile::from(self)
    }

    /// Returns `true` if the printer encodes strings as UTF-8.
    ///
    /// Older firmware uses Windows-1251.
    #[must_use]
    pub fn supports_utf8(&self) -> bool {
        match (self.protocol_major, self.protocol_minor) {
            (major, _) if major > 1 => true,
            (1, minor) if minor > 2 => true,
            (1, 2) => {
                self.firmware_major > 5 || (self.firmware_major == 5 && self.firmware_minor >= 9)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(protocol: (u8, u8), firmware: (i8, i16, i8)) -> PrinterInfo {
        PrinterInfo {
            protocol_major: protocol.0,
            protocol_minor: protocol.1,
            firmware_major: firmware.0,
            firmware_minor: firmware.1,
            firmware_revision: firmware.2,
            ..PrinterInfo::default()
        }
    }

    #[test]
    fn utf8_support_by_version() {
        assert!(!info((1, 0), (6, 0, 0)).supports_utf8());
        assert!(!info((1, 2), (5, 8, 0)).supports_utf8());
        assert!(info((1, 2), (5, 9, 0)).supports_utf8());
        assert!(info((1, 3), (0, 0, 0)).supports_utf8());
        assert!(info((2, 0), (0, 0, 0)).supports_utf8());
    }

    #[test]
    fn firmware_version_formats() {
        assert_eq!(
            info((1, 1), (5, 220, 0)).firmware_version().as_deref(),
            Some("5.220")
        );
        assert_eq!(
            info((1, 2), (6, 1, 33)).firmware_version().as_deref(),
            Some("6.1.33")
        );
        assert_eq!(info((2, 0), (6, 1, 33)).firmware_version(), None);
    }

    #[test]
    fn display_name_falls_back_to_serial() {
        let mut printer = PrinterInfo {
            serial: Some("PX-0042".to_string()),
            ..PrinterInfo::default()
        };
        assert_eq!(printer.display_name(), Some("PX-0042"));

        printer.name = Some("Workshop".to_string());
        assert_eq!(printer.display_name(), Some("Workshop"));
    }

    #[test]
    fn mac_address_format() {
        let printer = PrinterInfo {
            mac: [0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e],
            ..PrinterInfo::default()
        };
        assert_eq!(printer.mac_address(), "00:1a:2b:3c:4d:5e");
    }

    #[test]
    fn hardware_version_and_type() {
        let printer = PrinterInfo {
            hardware_major: 13,
            hardware_minor: 2,
            ..PrinterInfo::default()
        };
        assert_eq!(printer.hardware_version(), "13.2");
        assert_eq!(printer.printer_type(), PrinterType::DesignerXl2);
    }
}
