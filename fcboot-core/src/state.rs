// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Bootloader device state and its status-indicator mapping.

use serde::{Deserialize, Serialize};

use crate::led::Waveform;

/// The exclusive bootloader state for one power cycle.
///
/// Write ownership is partitioned by value:
/// - entry decision writes the two idle states,
/// - the command interpreter owns the upload/download/success family,
/// - the application launcher alone writes `FailedJump`,
/// - `Unknown` is the explicit catch-all so the indicator mapping stays
///   total even if a collaborator leaves the state in a bad place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceState {
    /// Update mode entered because USB was present, without an explicit
    /// request from the application.
    BootloaderIdle,
    /// Update mode entered on an explicit persisted request.
    UpdateIdle,
    UploadStarting,
    Uploading,
    Downloading,
    LastOperationSuccess,
    /// The installed image failed validation. Terminal for this power cycle.
    FailedJump,
    /// Defensive catch-all, displayed as the generic error pattern.
    Unknown,
}

/// Indicator configuration for one state: up to two waveforms plus the
/// baseline level used when no primary waveform is configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndicatorPlan {
    pub primary: Option<Waveform>,
    pub secondary: Option<Waveform>,
    /// Level when `primary` is absent (solid on for `BootloaderIdle`).
    pub solid: bool,
}

const SLOW_BREATHE: Waveform = Waveform::new(5000, 100);
const FAST_BREATHE: Waveform = Waveform::new(2500, 50);

impl IndicatorPlan {
    /// Combined indicator level at `elapsed_us`: the two waveform outputs are
    /// OR-ed together, so either one can force the LED on.
    pub fn level_at(&self, elapsed_us: u32) -> bool {
        let primary = match self.primary {
            Some(w) => w.sample(elapsed_us),
            None => self.solid,
        };
        let secondary = self.secondary.is_some_and(|w| w.sample(elapsed_us));
        primary || secondary
    }
}

impl DeviceState {
    /// Status-indicator mapping, recomputed every loop iteration.
    ///
    /// `FailedJump` deliberately shares the `Unknown` double-waveform pattern:
    /// the operator only learns that *something* is wrong, not whether it was
    /// an internal error or a refused jump to a corrupt image.
    pub fn indicator_plan(self) -> IndicatorPlan {
        match self {
            DeviceState::LastOperationSuccess
            | DeviceState::UploadStarting
            | DeviceState::UpdateIdle => IndicatorPlan {
                primary: Some(SLOW_BREATHE),
                secondary: None,
                solid: false,
            },
            DeviceState::Uploading => IndicatorPlan {
                primary: Some(SLOW_BREATHE),
                secondary: Some(FAST_BREATHE),
                solid: false,
            },
            DeviceState::Downloading => IndicatorPlan {
                primary: Some(FAST_BREATHE),
                secondary: None,
                solid: false,
            },
            DeviceState::BootloaderIdle => IndicatorPlan {
                primary: None,
                secondary: None,
                solid: true,
            },
            DeviceState::FailedJump | DeviceState::Unknown => IndicatorPlan {
                primary: Some(SLOW_BREATHE),
                secondary: Some(SLOW_BREATHE),
                solid: false,
            },
        }
    }
}
