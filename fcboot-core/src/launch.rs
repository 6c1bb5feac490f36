// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Application launch: image validation and control transfer.
//!
//! By ARM convention the first word of a firmware image is the initial stack
//! pointer its startup code expects, and the second word is the reset vector.
//! A blank, erased, or corrupted image will not hold a plausible stack
//! pointer, so masking that word and checking it against the target's two
//! physical SRAM regions is a cheap integrity gate before handing the CPU
//! over.

use crate::state::DeviceState;

/// Main SRAM base on the target.
pub const SRAM_BASE: u32 = 0x2000_0000;
/// Core-coupled SRAM base on the target.
pub const CCM_SRAM_BASE: u32 = 0x1000_0000;
/// Mask applied to the stack word before comparing region bases.
pub const STACK_REGION_MASK: u32 = 0xFFFE_0000;

/// Installed firmware image plus the operation that transfers control to it.
///
/// Exactly one real implementation exists (volatile reads of the image's two
/// leading words, then the hardware reset-vector call, which never returns).
/// Test doubles record the transfer and return instead, so the validation
/// logic runs on the host without ever executing arbitrary memory.
pub trait ImageHandoff {
    /// Word at the image base: the initial stack pointer by convention.
    fn stack_word(&self) -> u32;
    /// Word at base + 4: the reset/entry vector.
    fn entry_word(&self) -> u32;
    /// Quiesce shared peripherals and jump. Returns only in test doubles.
    fn transfer(&mut self, stack_ptr: u32, entry: u32);
}

/// Whether a stack word points into one of the two valid SRAM regions.
pub fn stack_word_plausible(word: u32) -> bool {
    let region = word & STACK_REGION_MASK;
    region == SRAM_BASE || region == CCM_SRAM_BASE
}

/// Validate the installed image and transfer control if it passes.
///
/// On rejection sets `FailedJump` and returns; the caller keeps its launch
/// flag latched, so every subsequent tick repeats the identical rejection and
/// the device stays parked showing the error pattern until reset.
pub fn try_launch<H: ImageHandoff>(image: &mut H, state: &mut DeviceState) {
    let stack_ptr = image.stack_word();
    if !stack_word_plausible(stack_ptr) {
        *state = DeviceState::FailedJump;
        return;
    }
    let entry = image.entry_word();
    image.transfer(stack_ptr, entry);
}
