// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! fcboot: first-stage bootloader for the STM32F405 flight controller.
//!
//! Power-up path: peripheral bring-up, brownout guard, one-shot entry
//! decision (USB presence / persisted update request), then the cooperative
//! main loop in `fcboot-core` until control transfers to the application.

#![no_std]
#![no_main]

mod bor;
mod dfu;
mod flash;
mod iap;
mod jump;
mod peripherals;
mod usb_transport;

use defmt_rtt as _;
use panic_probe as _;

defmt::timestamp!("{=u64:us}", { 0 });

use cortex_m_rt::entry;
use embedded_hal::digital::InputPin;
use fcboot_core::bor::ensure_brownout_level;
use fcboot_core::entry::sample_update_request;
use fcboot_core::runner::Bootloader;

#[entry]
fn main() -> ! {
    defmt::println!("Bootloader init");

    let mut board = peripherals::init();

    // Before anything else: a sagging supply must reset us, not leave the
    // board in an undefined state.
    ensure_brownout_level(&mut bor::FlashOptionBytes, bor::BOR_LEVEL_2V7);

    let usb_connected = board.vbus.is_high().unwrap_or(false);
    let update_requested =
        sample_update_request(&mut iap::BackupRegisterRequest, &mut board.delay);

    defmt::println!(
        "Entry: usb_connected={}, update_requested={}",
        usb_connected,
        update_requested
    );

    let usb = board.usb.take().unwrap();
    peripherals::store_usb_bus(usb);
    let transport = usb_transport::UsbTransport::new(peripherals::usb_bus_ref());

    let mut bl = Bootloader::new(
        board.ticker,
        board.led,
        transport,
        dfu::DfuInterpreter::new(),
        jump::FlightImage {
            base: flash::FW_BASE,
        },
        usb_connected,
        update_requested,
    );
    bl.run()
}
