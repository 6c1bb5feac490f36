// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Idle stopwatch and the timeout fallback that guarantees liveness.
//!
//! A board with no host attention must not stay parked in the bootloader
//! forever; after a fixed idle bound the main loop forces the application
//! launch. An actively USB-connected `UpdateIdle` session is exempt, since a
//! human or tool may be about to issue commands.

use crate::state::DeviceState;

/// Ceiling after which the stopwatch resets to zero to bound integer growth.
pub const STOPWATCH_WRAP_US: u32 = 50_000_000;

/// Idle bound before the fallback launch, strict comparison.
pub const IDLE_TIMEOUT_US: u32 = 6_000_000;

/// Elapsed-microsecond accumulator for the main loop.
///
/// Only ever used for relative comparisons within one unwrapped interval;
/// the wrap is applied after the tick's comparisons have been evaluated.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stopwatch {
    elapsed_us: u32,
}

impl Stopwatch {
    pub const fn new() -> Self {
        Self { elapsed_us: 0 }
    }

    pub fn advance(&mut self, dt_us: u32) {
        self.elapsed_us = self.elapsed_us.wrapping_add(dt_us);
    }

    pub fn elapsed_us(&self) -> u32 {
        self.elapsed_us
    }

    /// Reset once past the ceiling. Called after the tick's waveform and
    /// timeout evaluations so it only affects future relative timing.
    pub fn wrap(&mut self) {
        if self.elapsed_us > STOPWATCH_WRAP_US {
            self.elapsed_us = 0;
        }
    }
}

/// Fallback rule, evaluated every tick.
pub fn idle_timeout_expired(state: DeviceState, usb_connected: bool, elapsed_us: u32) -> bool {
    if elapsed_us <= IDLE_TIMEOUT_US {
        return false;
    }
    match state {
        DeviceState::BootloaderIdle => true,
        DeviceState::UpdateIdle => !usb_connected,
        _ => false,
    }
}
