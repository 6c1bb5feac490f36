// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for the status-indicator waveform scheduler.

use fcboot_core::led::{waveform, Waveform};
use fcboot_core::state::DeviceState;

#[test]
fn test_waveform_off_at_zero() {
    // Duty threshold is 0 at the start of a cycle and `0 > 0` is false.
    assert!(!waveform(5000, 100, 0));
}

#[test]
fn test_waveform_periodic_over_full_cycle() {
    // One rising sweep plus one mirrored sweep: period * steps * 2.
    let w = Waveform::new(5000, 100);
    let cycle = w.cycle_us();
    assert_eq!(cycle, 1_000_000);
    for t in (0..cycle).step_by(1237) {
        assert_eq!(w.sample(t), w.sample(t + cycle), "t={}", t);
        assert_eq!(w.sample(t), w.sample(t + 3 * cycle), "t={}", t);
    }
}

#[test]
fn test_waveform_duty_ramps_within_sweep() {
    // Late in the rising sweep the threshold is high, so the tail of each
    // period must be off; early in the sweep it is low, so the tail is on.
    // Step 1 (elapsed 5000..10000): duty = 5000*1/100 = 50.
    assert!(waveform(5000, 100, 5000 + 51));
    assert!(!waveform(5000, 100, 5000 + 50));
    // Step 99: duty = 4950, only the last 50us of the period are on.
    assert!(!waveform(5000, 100, 99 * 5000 + 4950));
    assert!(waveform(5000, 100, 99 * 5000 + 4951));
}

#[test]
fn test_waveform_odd_sweep_mirrors() {
    // First period of the odd sweep: curr_step = 0, duty mirrored to the
    // full period, so the output is off for the whole period.
    let sweep_len = 5000 * 100;
    for t in (0..5000).step_by(97) {
        assert!(!waveform(5000, 100, sweep_len + t));
    }
    // Same instants in the even sweep are on for nearly the whole period.
    assert!(waveform(5000, 100, 1));
}

#[test]
fn test_fast_waveform_distinct_from_slow() {
    // The downloading pattern (2500/50) completes a full breathe in 250ms.
    let w = Waveform::new(2500, 50);
    assert_eq!(w.cycle_us(), 250_000);
}

#[test]
fn test_bootloader_idle_is_solid_on() {
    let plan = DeviceState::BootloaderIdle.indicator_plan();
    assert!(plan.primary.is_none());
    assert!(plan.secondary.is_none());
    for t in [0, 1, 4999, 123_456, 49_999_999] {
        assert!(plan.level_at(t));
    }
}

#[test]
fn test_error_states_share_double_waveform() {
    // FailedJump is deliberately indistinguishable from the generic error.
    assert_eq!(
        DeviceState::FailedJump.indicator_plan(),
        DeviceState::Unknown.indicator_plan()
    );
    let plan = DeviceState::FailedJump.indicator_plan();
    assert!(plan.primary.is_some());
    assert!(plan.secondary.is_some());
}

#[test]
fn test_uploading_combines_waveforms_with_or() {
    let plan = DeviceState::Uploading.indicator_plan();
    let primary = plan.primary.unwrap();
    let secondary = plan.secondary.unwrap();
    for t in (0..1_000_000).step_by(7919) {
        assert_eq!(
            plan.level_at(t),
            primary.sample(t) || secondary.sample(t),
            "t={}",
            t
        );
    }
}

#[test]
fn test_update_idle_baseline_off_when_waveform_low() {
    let plan = DeviceState::UpdateIdle.indicator_plan();
    assert!(plan.secondary.is_none());
    assert!(!plan.solid);
    // Waveform low at t=0, so the indicator must be off.
    assert!(!plan.level_at(0));
}
