// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! USB CDC framed transport.
//!
//! Inbound bytes accumulate until the 0x00 COBS delimiter; one complete
//! frame is handed to the loop per poll, matching the at-most-one-frame-per-
//! iteration contract. Frame payloads are opaque here - decoding belongs to
//! the command interpreter.

use fcboot_core::protocol::MSG_BUF_SIZE;
use fcboot_core::runner::FrameTransport;
use stm32f4xx_hal::otg_fs::{UsbBus, USB};
use usb_device::class_prelude::UsbBusAllocator;
use usb_device::prelude::*;
use usbd_serial::SerialPort;

pub struct UsbTransport {
    serial: SerialPort<'static, UsbBus<USB>>,
    usb_dev: UsbDevice<'static, UsbBus<USB>>,
    rx_buf: [u8; MSG_BUF_SIZE],
    rx_pos: usize,
    overflow: bool,
}

impl UsbTransport {
    pub fn new(usb_bus: &'static UsbBusAllocator<UsbBus<USB>>) -> Self {
        let serial = SerialPort::new(usb_bus);
        let usb_dev = UsbDeviceBuilder::new(usb_bus, UsbVidPid(0x20A0, 0x415B))
            .strings(&[StringDescriptors::default()
                .manufacturer("fcboot")
                .product("Flight Controller Bootloader")
                .serial_number("0001")])
            .unwrap()
            .device_class(usbd_serial::USB_CLASS_CDC)
            .build();

        Self {
            serial,
            usb_dev,
            rx_buf: [0u8; MSG_BUF_SIZE],
            rx_pos: 0,
            overflow: false,
        }
    }

    fn poll(&mut self) -> bool {
        self.usb_dev.poll(&mut [&mut self.serial])
    }
}

impl FrameTransport for UsbTransport {
    fn receive(&mut self, buf: &mut [u8]) -> usize {
        self.poll();

        let mut tmp = [0u8; 64];
        let count = match self.serial.read(&mut tmp) {
            Ok(count) => count,
            Err(_) => 0,
        };

        for &byte in &tmp[..count] {
            if byte == 0x00 {
                // Frame delimiter - hand over what accumulated, unless the
                // frame overflowed and was discarded.
                let len = self.rx_pos;
                self.rx_pos = 0;
                let done = !self.overflow && len > 0;
                self.overflow = false;
                if done {
                    buf[..len].copy_from_slice(&self.rx_buf[..len]);
                    // Bytes after the delimiter in this read are dropped; the
                    // host waits for the reply before sending the next frame.
                    return len;
                }
            } else if self.rx_pos < MSG_BUF_SIZE {
                self.rx_buf[self.rx_pos] = byte;
                self.rx_pos += 1;
            } else {
                // Oversized frame - discard up to the next delimiter.
                self.overflow = true;
            }
        }
        0
    }

    fn send(&mut self, frame: &[u8]) {
        let mut offset = 0;
        while offset < frame.len() {
            match self.serial.write(&frame[offset..]) {
                Ok(n) => offset += n,
                Err(UsbError::WouldBlock) => {
                    self.poll();
                }
                Err(_) => break,
            }
        }
    }
}
