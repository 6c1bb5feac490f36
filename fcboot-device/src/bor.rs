// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Option-byte access for the brown-out threshold.
//!
//! Register-level, not through the HAL: option-byte programming is a one-shot
//! pre-loop operation on the flash controller's OPTCR path and the HAL does
//! not model it.

use fcboot_core::bor::OptionBytes;

const FLASH_OPTKEYR: *mut u32 = 0x4002_3C08 as *mut u32;
const FLASH_SR: *const u32 = 0x4002_3C0C as *const u32;
const FLASH_OPTCR: *mut u32 = 0x4002_3C14 as *mut u32;

const OPTKEY1: u32 = 0x0819_2A3B;
const OPTKEY2: u32 = 0x4C5D_6E7F;

const SR_BSY: u32 = 1 << 16;
const OPTCR_OPTLOCK: u32 = 1 << 0;
const OPTCR_OPTSTRT: u32 = 1 << 1;
const OPTCR_BOR_LEV_SHIFT: u32 = 2;
const OPTCR_BOR_LEV_MASK: u32 = 0b11 << OPTCR_BOR_LEV_SHIFT;

/// BOR level 3, the ~2.7V threshold. Encoded value 0b00 in OPTCR.BOR_LEV.
pub const BOR_LEVEL_2V7: u8 = 0b00;

/// The STM32F4 option-byte block, BOR_LEV field only.
pub struct FlashOptionBytes;

impl OptionBytes for FlashOptionBytes {
    fn brownout_level(&self) -> u8 {
        let optcr = unsafe { FLASH_OPTCR.read_volatile() };
        ((optcr & OPTCR_BOR_LEV_MASK) >> OPTCR_BOR_LEV_SHIFT) as u8
    }

    fn unlock(&mut self) {
        unsafe {
            FLASH_OPTKEYR.write_volatile(OPTKEY1);
            FLASH_OPTKEYR.write_volatile(OPTKEY2);
        }
    }

    fn set_brownout_level(&mut self, level: u8) {
        unsafe {
            let optcr = FLASH_OPTCR.read_volatile();
            FLASH_OPTCR.write_volatile(
                (optcr & !OPTCR_BOR_LEV_MASK)
                    | ((u32::from(level) << OPTCR_BOR_LEV_SHIFT) & OPTCR_BOR_LEV_MASK),
            );
        }
    }

    fn commit(&mut self) {
        unsafe {
            let optcr = FLASH_OPTCR.read_volatile();
            FLASH_OPTCR.write_volatile(optcr | OPTCR_OPTSTRT);
        }
    }

    fn lock(&mut self) {
        unsafe {
            let optcr = FLASH_OPTCR.read_volatile();
            FLASH_OPTCR.write_volatile(optcr | OPTCR_OPTLOCK);
        }
    }

    fn is_busy(&self) -> bool {
        unsafe { FLASH_SR.read_volatile() & SR_BSY != 0 }
    }
}
