// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Machine state and status codes reported in the status frame.

use std::fmt;

use serde::Serialize;

/// What the printer mechanics are currently doing.
///
/// Code `0` on the wire means the printer has not determined its state yet;
/// it is decoded as "not reported" and therefore has no variant here.
///
/// # Examples
///
/// ```
/// use picaso_lib::types::MachineState;
///
/// assert_eq!(MachineState::from_code(1), Some(MachineState::Printing));
/// assert_eq!(MachineState::Printing.as_str(), "printing");
/// assert_eq!(MachineState::from_code(0), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineState {
    /// A job is being printed.
    Printing,
    /// The current job is paused.
    Paused,
    /// Nothing is being printed.
    Idle,
    /// Service mode.
    Service,
    /// Preparing to start a job.
    PrepareForPrinting,
    /// Preparing to pause the current job.
    PrepareForPause,
    /// Preparing to stop the current job.
    PrepareForStop,
    /// Pre-print routine (homing, heating).
    PrePrint,
}

impl MachineState {
    /// Maps a wire code to a state.
    ///
    /// Returns `None` for the "unset" code `0` and for codes this library
    /// does not know.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Printing),
            2 => Some(Self::Paused),
            3 => Some(Self::Idle),
            4 => Some(Self::Service),
            5 => Some(Self::PrepareForPrinting),
            6 => Some(Self::PrepareForPause),
            7 => Some(Self::PrepareForStop),
            8 => Some(Self::PrePrint),
            _ => None,
        }
    }

    /// Returns the wire code of this state.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Printing => 1,
            Self::Paused => 2,
            Self::Idle => 3,
            Self::Service => 4,
            Self::PrepareForPrinting => 5,
            Self::PrepareForPause => 6,
            Self::PrepareForStop => 7,
            Self::PrePrint => 8,
        }
    }

    /// Returns the lowercase name used by presentation layers.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Printing => "printing",
            Self::Paused => "paused",
            Self::Idle => "idle",
            Self::Service => "service",
            Self::PrepareForPrinting => "prepare_for_printing",
            Self::PrepareForPause => "prepare_for_pause",
            Self::PrepareForStop => "prepare_for_stop",
            Self::PrePrint => "pre_print",
        }
    }

    /// Returns `true` while a job occupies the printer.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        !matches!(self, Self::Idle | Self::Service)
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall printer status as shown on the device display.
///
/// Codes `0` and `0x8000_0004` (initial state) are decoded as "not
/// reported" and have no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineStatus {
    /// The current print has a problem.
    PrintProblem,
    /// The printer stopped on a critical error.
    CriticalError,
    /// Waiting for the user to act.
    WaitUser,
    /// Ready, waiting for a new task.
    WaitNewTask,
    /// Service mode.
    Service,
    /// Main print phase.
    MainPrint,
    /// The last print finished.
    PrintDone,
    /// The print is paused.
    PrintPaused,
    /// A non-blocking warning is active.
    Warning,
    /// A firmware update is being downloaded.
    UpdateDownload,
    /// The printer reports a connection error with its controller.
    ConnectionError,
}

impl MachineStatus {
    /// Wire code for "initial state", treated as unset.
    pub const INITIAL_STATE_CODE: u32 = 0x8000_0004;

    /// Maps a wire code to a status.
    ///
    /// Returns `None` for unset codes and for codes this library does not
    /// know.
    #[must_use]
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::PrintProblem),
            2 => Some(Self::CriticalError),
            3 => Some(Self::WaitUser),
            4 => Some(Self::WaitNewTask),
            5 => Some(Self::Service),
            6 => Some(Self::MainPrint),
            7 => Some(Self::PrintDone),
            8 => Some(Self::PrintPaused),
            9 => Some(Self::Warning),
            10 => Some(Self::UpdateDownload),
            0x8000_0000 => Some(Self::ConnectionError),
            _ => None,
        }
    }

    /// Returns the wire code of this status.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::PrintProblem => 1,
            Self::CriticalError => 2,
            Self::WaitUser => 3,
            Self::WaitNewTask => 4,
            Self::Service => 5,
            Self::MainPrint => 6,
            Self::PrintDone => 7,
            Self::PrintPaused => 8,
            Self::Warning => 9,
            Self::UpdateDownload => 10,
            Self::ConnectionError => 0x8000_0000,
        }
    }

    /// Returns the lowercase name used by presentation layers.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PrintProblem => "print_problem",
            Self::CriticalError => "critical_error",
            Self::WaitUser => "wait_user",
            Self::WaitNewTask => "wait_new_task",
            Self::Service => "service",
            Self::MainPrint => "main_print",
            Self::PrintDone => "print_done",
            Self::PrintPaused => "print_paused",
            Self::Warning => "warning",
            Self::UpdateDownload => "update_download",
            Self::ConnectionError => "connection_error",
        }
    }

    /// Returns `true` for statuses that indicate a fault.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(
            self,
            Self::PrintProblem | Self::CriticalError | Self::ConnectionError
        )
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
