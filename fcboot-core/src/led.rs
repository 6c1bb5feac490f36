// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Status indicator waveform scheduler.
//!
//! The indicator pattern is a pure function of elapsed time and two waveform
//! parameters, so protocol traffic can never stall it. Each waveform is a
//! coarse triangle wave: within one sweep of `sweep_steps` periods the duty
//! cycle ramps up step by step, and every odd sweep runs mirrored so the
//! overall effect is a breathing pulse rather than a sawtooth.

/// One `{period, sweep steps}` waveform parameter pair.
///
/// A period of zero is not representable here on purpose; "solid or off" is
/// expressed as the absence of a waveform (`Option<Waveform>` in the
/// indicator plan), never as a zero period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Waveform {
    /// Base period in microseconds. Always non-zero.
    pub period_us: u32,
    /// Number of duty steps in one sweep.
    pub sweep_steps: u32,
}

impl Waveform {
    pub const fn new(period_us: u32, sweep_steps: u32) -> Self {
        Self {
            period_us,
            sweep_steps,
        }
    }

    /// Sample this waveform at `elapsed_us` microseconds.
    pub fn sample(&self, elapsed_us: u32) -> bool {
        waveform(self.period_us, self.sweep_steps, elapsed_us)
    }

    /// Full breathing cycle length: one rising sweep plus one mirrored
    /// falling sweep.
    pub const fn cycle_us(&self) -> u32 {
        self.period_us * self.sweep_steps * 2
    }
}

/// Sample the indicator waveform at `elapsed_us`.
///
/// `period_us` and `sweep_steps` must be non-zero. Returns the on/off level
/// for this instant.
pub fn waveform(period_us: u32, sweep_steps: u32, elapsed_us: u32) -> bool {
    let curr_step = (elapsed_us / period_us) % sweep_steps;
    let mut duty = period_us * curr_step / sweep_steps; // fraction of one period

    let curr_sweep = elapsed_us / (period_us * sweep_steps); // ticks once per full sweep
    if curr_sweep & 1 == 1 {
        duty = period_us - duty; // reverse direction in odd sweeps
    }

    (elapsed_us % period_us) > duty
}
