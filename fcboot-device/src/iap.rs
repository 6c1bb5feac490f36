// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Persisted "enter bootloader" request over an RTC backup register.
//!
//! The running application writes the magic before a soft reset to ask the
//! bootloader to stay resident. Backup registers survive any reset short of
//! a power loss, which is exactly the lifetime the request needs.

use fcboot_core::entry::UpdateRequest;

const RCC_APB1ENR: *mut u32 = 0x4002_3840 as *mut u32;
const RCC_APB1ENR_PWREN: u32 = 1 << 28;

const PWR_CR: *mut u32 = 0x4000_7000 as *mut u32;
const PWR_CR_DBP: u32 = 1 << 8;

const RTC_BKP0R: *mut u32 = 0x4000_2850 as *mut u32;

/// Magic the application leaves in BKP0R to request update mode.
pub const UPDATE_REQUEST_MAGIC: u32 = 0x5AFE_B007;

pub struct BackupRegisterRequest;

impl UpdateRequest for BackupRegisterRequest {
    fn check(&mut self) -> bool {
        unsafe { RTC_BKP0R.read_volatile() == UPDATE_REQUEST_MAGIC }
    }

    fn clear(&mut self) {
        unsafe {
            // Backup-domain writes are gated by PWR_CR.DBP, and PWR itself
            // needs its APB1 clock.
            let enr = RCC_APB1ENR.read_volatile();
            RCC_APB1ENR.write_volatile(enr | RCC_APB1ENR_PWREN);
            let cr = PWR_CR.read_volatile();
            PWR_CR.write_volatile(cr | PWR_CR_DBP);
            RTC_BKP0R.write_volatile(0);
            PWR_CR.write_volatile(cr & !PWR_CR_DBP);
        }
    }
}
