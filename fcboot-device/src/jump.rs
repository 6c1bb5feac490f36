// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! The real control transfer into the installed firmware image.

use fcboot_core::launch::ImageHandoff;

use crate::flash;

const RCC_APB1RSTR: *mut u32 = 0x4002_3820 as *mut u32;
const RCC_APB2RSTR: *mut u32 = 0x4002_3824 as *mut u32;

// OTG-FS device control register, soft-disconnect bit.
const OTG_FS_DCTL: *mut u32 = 0x5000_0804 as *mut u32;
const DCTL_SDIS: u32 = 1 << 1;

/// The installed firmware image: two leading words read straight out of
/// flash, and a handoff that never returns.
pub struct FlightImage {
    pub base: u32,
}

impl ImageHandoff for FlightImage {
    fn stack_word(&self) -> u32 {
        unsafe { (self.base as *const u32).read_volatile() }
    }

    fn entry_word(&self) -> u32 {
        unsafe { ((self.base + 4) as *const u32).read_volatile() }
    }

    fn transfer(&mut self, stack_ptr: u32, entry: u32) {
        defmt::println!(
            "Jumping to firmware at 0x{:08x} (sp=0x{:08x}, pc=0x{:08x})",
            self.base,
            stack_ptr,
            entry
        );

        flash::lock();

        unsafe {
            // Pulse a global peripheral reset so the application starts from
            // a clean peripheral state, then detach from the host before the
            // application brings up its own USB stack.
            RCC_APB2RSTR.write_volatile(0xFFFF_FFFF);
            RCC_APB1RSTR.write_volatile(0xFFFF_FFFF);
            RCC_APB2RSTR.write_volatile(0);
            RCC_APB1RSTR.write_volatile(0);

            let dctl = OTG_FS_DCTL.read_volatile();
            OTG_FS_DCTL.write_volatile(dctl | DCTL_SDIS);

            // Loads the stack pointer from the image's vector table (the
            // word just validated) and calls through its reset vector.
            cortex_m::asm::bootload(self.base as *const u32);
        }
    }
}
