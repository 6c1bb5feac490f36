// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Cooperative main loop of the bootloader.
//!
//! Single-threaded and non-preemptive: one `Bootloader` value owns every
//! piece of mutable state. Each tick advances the stopwatch, attempts the
//! launch when requested, drives the status indicator, applies the idle
//! timeout, and polls the transport for at most one inbound frame.

use embedded_hal::digital::OutputPin;

use crate::entry::{decide, EntryAction};
use crate::launch::{try_launch, ImageHandoff};
use crate::protocol::MSG_BUF_SIZE;
use crate::state::DeviceState;
use crate::timeout::{idle_timeout_expired, Stopwatch};

/// Monotonic microsecond tick source. Wraps at `u32::MAX`; consumers only
/// ever take wrapping differences between consecutive reads.
pub trait MicrosClock {
    fn now_us(&mut self) -> u32;
}

/// Framed message transport, polled once per loop iteration.
pub trait FrameTransport {
    /// Non-blocking poll for one complete inbound frame. Copies it into
    /// `buf` and returns the byte count, or 0 when nothing is pending.
    fn receive(&mut self, buf: &mut [u8]) -> usize;
    /// Queue one outbound frame. Best effort; the loop never blocks on it.
    fn send(&mut self, frame: &[u8]);
}

/// External command interpreter: the sole authority for transitions among
/// the upload/download/success states and for driving the flash programmer.
pub trait CommandInterpreter<T: FrameTransport> {
    /// Handle one inbound frame. The frame bytes are valid only for the
    /// duration of this call.
    fn dispatch(&mut self, frame: &mut [u8], ctl: &mut BootControl, transport: &mut T);

    /// Per-tick work that is not a reply to an inbound frame, e.g. streaming
    /// a download one chunk per iteration.
    fn pump(&mut self, _ctl: &mut BootControl, _transport: &mut T) {}
}

/// The mutable flags shared across loop components.
///
/// `launch_requested` starts false, becomes true at most once per power
/// cycle (entry decision, idle timeout, or a jump command) and is never
/// reset; the only exits are a successful control transfer or a permanent
/// `FailedJump`.
#[derive(Clone, Copy, Debug)]
pub struct BootControl {
    pub state: DeviceState,
    pub launch_requested: bool,
}

/// The bootloader main-loop context.
pub struct Bootloader<C, L, T, I, H> {
    clock: C,
    led: L,
    transport: T,
    interpreter: I,
    image: H,
    pub ctl: BootControl,
    usb_connected: bool,
    stopwatch: Stopwatch,
    prev_ticks: u32,
    rx_buf: [u8; MSG_BUF_SIZE],
}

impl<C, L, T, I, H> Bootloader<C, L, T, I, H>
where
    C: MicrosClock,
    L: OutputPin,
    T: FrameTransport,
    I: CommandInterpreter<T>,
    H: ImageHandoff,
{
    /// Build the loop context and apply the one-shot entry decision.
    pub fn new(
        mut clock: C,
        led: L,
        transport: T,
        interpreter: I,
        image: H,
        usb_connected: bool,
        update_requested: bool,
    ) -> Self {
        let ctl = match decide(usb_connected, update_requested) {
            EntryAction::EnterUpdateMode(state) => BootControl {
                state,
                launch_requested: false,
            },
            EntryAction::LaunchApplication => BootControl {
                // The launch is attempted before any state-dependent work on
                // the first tick; this value only matters if it fails.
                state: DeviceState::BootloaderIdle,
                launch_requested: true,
            },
        };
        let prev_ticks = clock.now_us();
        Self {
            clock,
            led,
            transport,
            interpreter,
            image,
            ctl,
            usb_connected,
            stopwatch: Stopwatch::new(),
            prev_ticks,
            rx_buf: [0u8; MSG_BUF_SIZE],
        }
    }

    /// One cooperative iteration of the main loop.
    pub fn tick(&mut self) {
        let now = self.clock.now_us();
        let dt = now.wrapping_sub(self.prev_ticks);
        self.prev_ticks = now;
        self.stopwatch.advance(dt);

        // Checked before state-dependent work; on hardware a successful
        // transfer never comes back from this call.
        if self.ctl.launch_requested {
            try_launch(&mut self.image, &mut self.ctl.state);
        }

        let plan = self.ctl.state.indicator_plan();
        let on = plan.level_at(self.stopwatch.elapsed_us());
        self.led.set_state(on.into()).ok();

        // Wrap after the waveform evaluation so it only affects future ticks.
        self.stopwatch.wrap();

        if idle_timeout_expired(
            self.ctl.state,
            self.usb_connected,
            self.stopwatch.elapsed_us(),
        ) {
            self.ctl.launch_requested = true;
        }

        // At most one frame per iteration, no batching.
        let n = self.transport.receive(&mut self.rx_buf);
        if n > 0 {
            self.interpreter
                .dispatch(&mut self.rx_buf[..n], &mut self.ctl, &mut self.transport);
        }
        self.interpreter.pump(&mut self.ctl, &mut self.transport);
    }

    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
        }
    }
}
