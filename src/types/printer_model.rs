// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Printer models and nozzle sizes.

use std::fmt;

use serde::Serialize;

/// PICASO 3D printer model, derived from the hardware major version.
///
/// # Examples
///
/// ```
/// use picaso_lib::types::PrinterType;
///
/// let model = PrinterType::from_hardware_major(14);
/// assert_eq!(model, PrinterType::DesignerXPro2);
/// assert_eq!(model.friendly_name(), "Designer X Pro 2");
/// assert!(model.is_series_2());
/// assert!(model.is_multi_nozzle());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrinterType {
    /// Designer X Pro.
    DesignerXPro,
    /// Designer PRO 250.
    DesignerPro250,
    /// Designer.
    Designer,
    /// Designer X.
    DesignerX,
    /// Designer XL.
    DesignerXl,
    /// Designer XL Pro.
    DesignerXlPro,
    /// Designer Classic.
    DesignerClassic,
    /// Designer Classic Advanced.
    DesignerClassicAdv,
    /// Designer X S2.
    DesignerX2,
    /// Designer XL S2.
    DesignerXl2,
    /// Designer X Pro S2.
    DesignerXPro2,
    /// Designer XL Pro S2.
    DesignerXlPro2,
    /// A hardware version this library does not know.
    Unknown,
}

impl PrinterType {
    /// Maps the hardware major version to a model.
    #[must_use]
    pub const fn from_hardware_major(major: i8) -> Self {
        match major {
            4 => Self::DesignerXPro,
            5 => Self::DesignerPro250,
            6 => Self::Designer,
            7 => Self::DesignerX,
            8 => Self::DesignerXl,
            9 => Self::DesignerXlPro,
            10 => Self::DesignerClassic,
            11 => Self::DesignerClassicAdv,
            12 => Self::DesignerX2,
            13 => Self::DesignerXl2,
            14 => Self::DesignerXPro2,
            15 => Self::DesignerXlPro2,
            _ => Self::Unknown,
        }
    }

    /// Returns the marketing name of the model.
    #[must_use]
    pub const fn friendly_name(&self) -> &'static str {
        match self {
            Self::DesignerXPro => "Designer X Pro",
            Self::DesignerPro250 => "Designer PRO 250",
            Self::Designer => "Designer",
            Self::DesignerX => "Designer X",
            Self::DesignerXl => "Designer XL",
            Self::DesignerXlPro => "Designer XL Pro",
            Self::DesignerClassic => "Designer Classic",
            Self::DesignerClassicAdv => "Designer Classic Adv",
            Self::DesignerX2 => "Designer X 2",
            Self::DesignerXl2 => "Designer XL 2",
            Self::DesignerXPro2 => "Designer X Pro 2",
            Self::DesignerXlPro2 => "Designer XL Pro 2",
            Self::Unknown => "Unknown",
        }
    }

    /// Returns `true` for large-format models.
    #[must_use]
    pub const fn is_xl(&self) -> bool {
        matches!(
            self,
            Self::DesignerXl | Self::DesignerXlPro | Self::DesignerXl2 | Self::DesignerXlPro2
        )
    }

    /// Returns `true` for second-series models.
    ///
    /// On protocol versions 1 and 2 these models need a firmware upgrade
    /// before their event journal can be read from the status frame.
    #[must_use]
    pub const fn is_series_2(&self) -> bool {
        matches!(
            self,
            Self::DesignerX2 | Self::DesignerXl2 | Self::DesignerXPro2 | Self::DesignerXlPro2
        )
    }

    /// Returns `true` for models with two nozzles.
    #[must_use]
    pub const fn is_multi_nozzle(&self) -> bool {
        matches!(
            self,
            Self::DesignerPro250
                | Self::DesignerXPro
                | Self::DesignerXPro2
                | Self::DesignerXlPro
                | Self::DesignerXlPro2
        )
    }
}

impl fmt::Display for PrinterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.friendly_name())
    }
}

/// Nozzle diameter installed in a nozzle slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NozzleSize {
    /// 0.2 mm.
    D0_2,
    /// 0.3 mm.
    D0_3,
    /// 0.4 mm.
    D0_4,
    /// 0.5 mm.
    D0_5,
    /// 0.6 mm.
    D0_6,
    /// 0.8 mm.
    D0_8,
    /// 1.0 mm.
    D1_0,
    /// A size code this library has no name for.
    Unrecognized(i8),
}

impl NozzleSize {
    /// Maps a wire code to a nozzle size.
    ///
    /// Returns `None` for `-1`, the code for an empty slot.
    #[must_use]
    pub const fn from_code(code: i8) -> Option<Self> {
        match code {
            -1 => None,
            20 => Some(Self::D0_2),
            30 => Some(Self::D0_3),
            40 => Some(Self::D0_4),
            50 => Some(Self::D0_5),
            60 => Some(Self::D0_6),
            80 => Some(Self::D0_8),
            100 => Some(Self::D1_0),
            other => Some(Self::Unrecognized(other)),
        }
    }

    /// Returns the wire code.
    #[must_use]
    pub const fn code(&self) -> i8 {
        match self {
            Self::D0_2 => 20,
            Self::D0_3 => 30,
            Self::D0_4 => 40,
            Self::D0_5 => 50,
            Self::D0_6 => 60,
            Self::D0_8 => 80,
            Self::D1_0 => 100,
            Self::Unrecognized(code) => *code,
        }
    }

    /// Returns the diameter in millimetres, if known.
    #[must_use]
    pub fn diameter_mm(&self) -> Option<f32> {
        match self {
            Self::Unrecognized(_) => None,
            known => Some(f32::from(known.code()) / 100.0),
        }
    }
}
