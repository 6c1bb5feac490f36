// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for image validation and the launch attempt.

use fcboot_core::launch::{
    stack_word_plausible, try_launch, ImageHandoff, CCM_SRAM_BASE, SRAM_BASE,
};
use fcboot_core::state::DeviceState;

/// Test double: a fake image whose two leading words are fixed, recording
/// transfers instead of jumping.
struct FakeImage {
    stack_word: u32,
    entry_word: u32,
    transfers: Vec<(u32, u32)>,
}

impl FakeImage {
    fn new(stack_word: u32, entry_word: u32) -> Self {
        Self {
            stack_word,
            entry_word,
            transfers: Vec::new(),
        }
    }
}

impl ImageHandoff for FakeImage {
    fn stack_word(&self) -> u32 {
        self.stack_word
    }
    fn entry_word(&self) -> u32 {
        self.entry_word
    }
    fn transfer(&mut self, stack_ptr: u32, entry: u32) {
        self.transfers.push((stack_ptr, entry));
    }
}

#[test]
fn test_stack_words_in_either_sram_region_pass() {
    assert!(stack_word_plausible(SRAM_BASE));
    assert!(stack_word_plausible(CCM_SRAM_BASE));
    // Anywhere inside the masked region is fine, e.g. top-of-stack values.
    assert!(stack_word_plausible(0x2001_0000));
    assert!(stack_word_plausible(0x2000_FFFC));
    assert!(stack_word_plausible(0x1000_E000));
}

#[test]
fn test_blank_or_corrupt_stack_words_fail() {
    assert!(!stack_word_plausible(0xFFFF_FFFF)); // erased flash
    assert!(!stack_word_plausible(0x0000_0000));
    assert!(!stack_word_plausible(0x0800_0000)); // flash address
    assert!(!stack_word_plausible(0x2008_0000)); // beyond the masked region
}

#[test]
fn test_valid_image_transfers_once_with_entry_vector() {
    let mut image = FakeImage::new(0x2001_0000, 0x0802_0199);
    let mut state = DeviceState::UpdateIdle;
    try_launch(&mut image, &mut state);
    // The entry address is the word at base + 4, passed through untouched.
    assert_eq!(image.transfers, vec![(0x2001_0000, 0x0802_0199)]);
    // No failure state was written on the success path.
    assert_eq!(state, DeviceState::UpdateIdle);
}

#[test]
fn test_rejection_sets_failed_jump_and_is_idempotent() {
    let mut image = FakeImage::new(0xFFFF_FFFF, 0xFFFF_FFFF);
    let mut state = DeviceState::BootloaderIdle;

    try_launch(&mut image, &mut state);
    assert_eq!(state, DeviceState::FailedJump);
    assert!(image.transfers.is_empty());

    // The launch flag stays latched in the loop, so this repeats forever
    // with the identical result.
    try_launch(&mut image, &mut state);
    assert_eq!(state, DeviceState::FailedJump);
    assert!(image.transfers.is_empty());
}
