// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Main-flash programming for the firmware image region.
//!
//! STM32F405, 1MB part. The bootloader occupies sectors 0-4; the application
//! image starts at sector 5 (0x08020000). Programming is word-wise with
//! PSIZE=x32, which requires a 2.7-3.6V supply - guaranteed by the brownout
//! guard that runs before anything else.

const FLASH_KEYR: *mut u32 = 0x4002_3C04 as *mut u32;
const FLASH_SR: *mut u32 = 0x4002_3C0C as *mut u32;
const FLASH_CR: *mut u32 = 0x4002_3C10 as *mut u32;

const KEY1: u32 = 0x4567_0123;
const KEY2: u32 = 0xCDEF_89AB;

const SR_BSY: u32 = 1 << 16;
// Program/erase error flags: WRPERR, PGAERR, PGPERR, PGSERR.
const SR_ERR_MASK: u32 = 0xF2;

const CR_PG: u32 = 1 << 0;
const CR_SER: u32 = 1 << 1;
const CR_SNB_SHIFT: u32 = 3;
const CR_PSIZE_X32: u32 = 0b10 << 8;
const CR_STRT: u32 = 1 << 16;
const CR_LOCK: u32 = 1 << 31;

/// Base address of the installed firmware image (sector 5).
pub const FW_BASE: u32 = 0x0802_0000;
/// Largest image the remaining sectors can hold.
pub const FW_MAX_SIZE: u32 = 0x000E_0000;

/// Flash sectors of the 1MB part as `(index, base, length)`.
const SECTORS: [(u8, u32, u32); 12] = [
    (0, 0x0800_0000, 16 * 1024),
    (1, 0x0800_4000, 16 * 1024),
    (2, 0x0800_8000, 16 * 1024),
    (3, 0x0800_C000, 16 * 1024),
    (4, 0x0801_0000, 64 * 1024),
    (5, 0x0802_0000, 128 * 1024),
    (6, 0x0804_0000, 128 * 1024),
    (7, 0x0806_0000, 128 * 1024),
    (8, 0x0808_0000, 128 * 1024),
    (9, 0x080A_0000, 128 * 1024),
    (10, 0x080C_0000, 128 * 1024),
    (11, 0x080E_0000, 128 * 1024),
];

fn wait_not_busy() {
    while unsafe { FLASH_SR.read_volatile() } & SR_BSY != 0 {
        core::hint::spin_loop();
    }
}

fn clear_errors() {
    unsafe {
        let sr = FLASH_SR.read_volatile();
        FLASH_SR.write_volatile(sr | SR_ERR_MASK);
    }
}

fn had_error() -> bool {
    unsafe { FLASH_SR.read_volatile() & SR_ERR_MASK != 0 }
}

pub fn unlock() {
    unsafe {
        if FLASH_CR.read_volatile() & CR_LOCK != 0 {
            FLASH_KEYR.write_volatile(KEY1);
            FLASH_KEYR.write_volatile(KEY2);
        }
    }
}

pub fn lock() {
    unsafe {
        let cr = FLASH_CR.read_volatile();
        FLASH_CR.write_volatile(cr | CR_LOCK);
    }
}

/// Erase every sector overlapping `[base, base + len)`.
///
/// Returns false on a programming error or if the range leaves the firmware
/// region.
///
/// # Safety
/// No code may execute from the sectors being erased.
pub unsafe fn erase_region(base: u32, len: u32) -> bool {
    if base < FW_BASE || len == 0 || len > FW_MAX_SIZE {
        return false;
    }
    let end = base + len;
    clear_errors();
    for (index, sector_base, sector_len) in SECTORS {
        if sector_base < end && sector_base + sector_len > base {
            wait_not_busy();
            FLASH_CR.write_volatile(
                CR_SER | (u32::from(index) << CR_SNB_SHIFT) | CR_PSIZE_X32 | CR_STRT,
            );
            wait_not_busy();
        }
    }
    FLASH_CR.write_volatile(0);
    !had_error()
}

/// Program `data` at `addr`, word-wise. `addr` must be 4-byte aligned; a
/// trailing partial word is padded with 0xFF.
///
/// # Safety
/// The target range must have been erased and must not be executing.
pub unsafe fn program(addr: u32, data: &[u8]) -> bool {
    clear_errors();
    wait_not_busy();
    FLASH_CR.write_volatile(CR_PG | CR_PSIZE_X32);

    let mut dest = addr as *mut u32;
    for chunk in data.chunks(4) {
        let mut word = [0xFFu8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        dest.write_volatile(u32::from_le_bytes(word));
        wait_not_busy();
        dest = dest.add(1);
    }

    FLASH_CR.write_volatile(0);
    !had_error()
}

/// Read bytes from the image region via volatile reads.
pub fn read(addr: u32, buf: &mut [u8]) {
    for (i, byte) in buf.iter_mut().enumerate() {
        *byte = unsafe { ((addr + i as u32) as *const u8).read_volatile() };
    }
}
