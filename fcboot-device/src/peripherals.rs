// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Peripheral initialization for the bootloader.

use fcboot_core::runner::MicrosClock;
use stm32f4xx_hal as hal;

use hal::gpio::{Input, Output, Pin, PushPull};
use hal::otg_fs::{UsbBus, USB};
use hal::pac;
use hal::prelude::*;
use hal::timer::{CounterUs, SysDelay};
use usb_device::class_prelude::UsbBusAllocator;

pub type LedPin = Pin<'B', 5, Output<PushPull>>;
pub type VbusPin = Pin<'A', 9, Input>;

/// Endpoint memory for the OTG-FS core.
static mut EP_MEMORY: [u32; 1024] = [0; 1024];

/// Static storage for UsbBusAllocator (required by usb-device for 'static lifetime).
static mut USB_BUS: Option<UsbBusAllocator<UsbBus<USB>>> = None;

pub fn usb_bus_ref() -> &'static UsbBusAllocator<UsbBus<USB>> {
    unsafe { (*core::ptr::addr_of!(USB_BUS)).as_ref().unwrap() }
}

pub fn store_usb_bus(usb: USB) {
    let bus = UsbBus::new(usb, unsafe { &mut *core::ptr::addr_of_mut!(EP_MEMORY) });
    unsafe {
        USB_BUS = Some(bus);
    }
}

pub struct Board {
    pub led: LedPin,
    pub vbus: VbusPin,
    pub ticker: Ticker,
    pub delay: SysDelay,
    pub usb: Option<USB>,
}

/// Free-running 32-bit TIM2 counter at 1 MHz: one tick per microsecond,
/// wrapping at `u32::MAX` like the trait requires.
pub struct Ticker {
    counter: CounterUs<pac::TIM2>,
}

impl MicrosClock for Ticker {
    fn now_us(&mut self) -> u32 {
        self.counter.now().ticks()
    }
}

pub fn init() -> Board {
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    let rcc = dp.RCC.constrain();
    let clocks = rcc
        .cfgr
        .use_hse(8.MHz())
        .sysclk(168.MHz())
        .require_pll48clk()
        .freeze();

    let gpioa = dp.GPIOA.split();
    let gpiob = dp.GPIOB.split();

    let mut counter = dp.TIM2.counter_us(&clocks);
    counter.start(u32::MAX.micros()).unwrap();

    let usb = USB::new(
        (dp.OTG_FS_GLOBAL, dp.OTG_FS_DEVICE, dp.OTG_FS_PWRCLK),
        (gpioa.pa11, gpioa.pa12),
        &clocks,
    );

    Board {
        led: gpiob.pb5.into_push_pull_output(),
        vbus: gpioa.pa9.into_pull_down_input(),
        ticker: Ticker { counter },
        delay: cp.SYST.delay(&clocks),
        usb: Some(usb),
    }
}
