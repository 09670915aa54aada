// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pause and stop reason bit masks.
//!
//! Both masks keep every raw bit, including bits this library has no name
//! for, so that two masks compare equal only if the device sent the same
//! value.

use std::fmt;

use serde::Serialize;

/// Why the current job is paused.
///
/// # Examples
///
/// ```
/// use picaso_lib::types::PauseReason;
///
/// let reason = PauseReason::from_bits(PauseReason::BY_USER | PauseReason::NOZZLE_CLEAN);
/// assert!(reason.contains(PauseReason::BY_USER));
/// assert_eq!(reason.primary(), Some("by_user"));
/// assert!(PauseReason::from_bits(0).is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct PauseReason(u32);

impl PauseReason {
    /// Layer time limit reached.
    pub const LAYER_TIME: u32 = 1 << 0;
    /// Paused by the user.
    pub const BY_USER: u32 = 1 << 1;
    /// Nozzle cleaning.
    pub const NOZZLE_CLEAN: u32 = 1 << 2;
    /// First nozzle blocked.
    pub const FIRST_NOZZLE_BLOCKED: u32 = 1 << 3;
    /// Radiator overheated.
    pub const RADIATOR_OVERHEAT: u32 = 1 << 4;
    /// First nozzle ran out of filament.
    pub const FIRST_NOZZLE_RUNOUT: u32 = 1 << 5;
    /// Z end stop hit.
    pub const HIT_Z_ENDSTOP: u32 = 1 << 6;
    /// Z board error.
    pub const ZBOARD_ERROR: u32 = 1 << 7;
    /// Pause requested at a layer.
    pub const LAYER_PAUSE: u32 = 1 << 8;
    /// Second nozzle blocked.
    pub const SECOND_NOZZLE_BLOCKED: u32 = 1 << 9;
    /// First nozzle filament slippage.
    pub const FIRST_NOZZLE_SLIPPAGE: u32 = 1 << 10;
    /// Second nozzle filament slippage.
    pub const SECOND_NOZZLE_SLIPPAGE: u32 = 1 << 11;
    /// Second nozzle ran out of filament.
    pub const SECOND_NOZZLE_RUNOUT: u32 = 1 << 12;
    /// The wrong nozzle is extruding.
    pub const WRONG_NOZZLE_EXTRUDES: u32 = 1 << 13;

    const NAMES: [(u32, &'static str); 14] = [
        (Self::LAYER_TIME, "layer_time"),
        (Self::BY_USER, "by_user"),
        (Self::NOZZLE_CLEAN, "nozzle_clean"),
        (Self::FIRST_NOZZLE_BLOCKED, "first_nozzle_blocked"),
        (Self::RADIATOR_OVERHEAT, "radiator_overheat"),
        (Self::FIRST_NOZZLE_RUNOUT, "first_nozzle_runout"),
        (Self::HIT_Z_ENDSTOP, "hit_z_endstop"),
        (Self::ZBOARD_ERROR, "zboard_error"),
        (Self::LAYER_PAUSE, "layer_pause"),
        (Self::SECOND_NOZZLE_BLOCKED, "second_nozzle_blocked"),
        (Self::FIRST_NOZZLE_SLIPPAGE, "first_nozzle_slippage"),
        (Self::SECOND_NOZZLE_SLIPPAGE, "second_nozzle_slippage"),
        (Self::SECOND_NOZZLE_RUNOUT, "second_nozzle_runout"),
        (Self::WRONG_NOZZLE_EXTRUDES, "wrong_nozzle_extrudes"),
    ];

    /// Creates a mask from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Returns `true` if no reason is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if all bits of `flag` are set.
    #[must_use]
    pub const fn contains(&self, flag: u32) -> bool {
        self.0 & flag == flag
    }

    /// Returns the names of all known reasons that are set.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Returns the name of the lowest known reason that is set.
    #[must_use]
    pub fn primary(&self) -> Option<&'static str> {
        self.names().first().copied()
    }
}

impl fmt::Display for PauseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.primary().unwrap_or("none"))
    }
}

/// Why the last job was stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct StopReason(u32);

impl StopReason {
    /// The G-code could not be executed.
    pub const GCODE_ERROR: u32 = 1 << 1;
    /// A hardware fault stopped the job.
    pub const HARDWARE_ERROR: u32 = 1 << 4;

    const NAMES: [(u32, &'static str); 2] = [
        (Self::GCODE_ERROR, "gcode_error"),
        (Self::HARDWARE_ERROR, "hardware_error"),
    ];

    /// Creates a mask from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Returns `true` if no reason is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if all bits of `flag` are set.
    #[must_use]
    pub const fn contains(&self, flag: u32) -> bool {
        self.0 & flag == flag
    }

    /// Returns the name of the highest known reason that is set.
    ///
    /// Hardware errors outrank G-code errors.
    #[must_use]
    pub fn primary(&self) -> Option<&'static str> {
        Self::NAMES
            .iter()
            .rev()
            .find(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.primary().unwrap_or("none"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_reason_names_in_bit_order() {
        let reason = PauseReason::from_bits(PauseReason::LAYER_PAUSE | PauseReason::BY_USER);
        assert_eq!(reason.names(), vec!["by_user", "layer_pause"]);
        assert_eq!(reason.to_string(), "by_user");
    }

    #[test]
    fn pause_reason_keeps_unknown_bits() {
        let reason = PauseReason::from_bits(1 << 20);
        assert!(!reason.is_empty());
        assert_eq!(reason.primary(), None);
        assert_eq!(reason.bits(), 1 << 20);
        assert_eq!(reason.to_string(), "none");
    }

    #[test]
    fn stop_reason_primary_prefers_hardware() {
        let reason =
            StopReason::from_bits(StopReason::GCODE_ERROR | StopReason::HARDWARE_ERROR);
        assert_eq!(reason.primary(), Some("hardware_error"));
    }

    #[test]
    fn empty_stop_reason_displays_none() {
        assert_eq!(StopReason::default().to_string(), "none");
    }
}
