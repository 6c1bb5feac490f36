// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Boot entry decision: update mode or immediate application launch.
//!
//! Runs exactly once, before the main loop. USB presence and the persisted
//! update request are each sampled a single time; the request is cleared so
//! one request cannot re-trigger on a later reset.

use embedded_hal::delay::DelayNs;

use crate::state::DeviceState;

/// Settle time after an explicit update request before the bootloader starts
/// talking, so host-side USB enumeration has finished.
pub const ENUMERATION_SETTLE_MS: u32 = 1000;

/// Persisted "stay in the bootloader" request, set by the application before
/// it resets (IAP mechanism).
pub trait UpdateRequest {
    fn check(&mut self) -> bool;
    fn clear(&mut self);
}

/// What the bootloader does after reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryAction {
    /// Stay resident in the given idle state and run the update loop.
    EnterUpdateMode(DeviceState),
    /// No USB, no request: attempt the application launch on the very first
    /// loop iteration, with no update-mode window at all.
    LaunchApplication,
}

/// Sample and consume the persisted update request.
///
/// A set request is answered with a fixed settle delay and then cleared.
pub fn sample_update_request<R: UpdateRequest, D: DelayNs>(req: &mut R, delay: &mut D) -> bool {
    if !req.check() {
        return false;
    }
    delay.delay_ms(ENUMERATION_SETTLE_MS);
    req.clear();
    true
}

/// Decide the boot path from the two one-shot samples.
///
/// An explicit request wins over mere USB presence: it lands in `UpdateIdle`
/// (unlimited session time while connected), while USB-present-without-a-
/// request lands in `BootloaderIdle` and stays subject to the idle timeout.
pub fn decide(usb_connected: bool, update_requested: bool) -> EntryAction {
    if update_requested {
        EntryAction::EnterUpdateMode(DeviceState::UpdateIdle)
    } else if usb_connected {
        EntryAction::EnterUpdateMode(DeviceState::BootloaderIdle)
    } else {
        EntryAction::LaunchApplication
    }
}
