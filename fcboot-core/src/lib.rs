// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Core logic for the fcboot flight-controller bootloader.
//!
//! Everything that can run without hardware lives here: the device state
//! machine, the status-indicator waveform scheduler, the boot entry decision,
//! the idle-timeout monitor, the application-launch validation, the brownout
//! guard sequence, and the cooperative main loop that ties them together.
//! Hardware collaborators (clock, LED, transport, flash option bytes, the
//! actual control transfer) are traits implemented by the device crate.
//!
//! This crate supports both `no_std` (embedded) and `std` (host) environments:
//! - Default: `no_std` mode for embedded targets
//! - `std` feature: Enables `std` support for host tools and tests

#![cfg_attr(not(feature = "std"), no_std)]

pub mod bor;
pub mod entry;
pub mod launch;
pub mod led;
pub mod protocol;
pub mod runner;
pub mod state;
pub mod timeout;

// Re-export commonly used types
pub use entry::{EntryAction, UpdateRequest};
pub use launch::ImageHandoff;
pub use protocol::{AckStatus, Command, Response, MAX_CHUNK_SIZE, MSG_BUF_SIZE};
pub use runner::{BootControl, Bootloader, CommandInterpreter, FrameTransport, MicrosClock};
pub use state::DeviceState;
pub use timeout::{Stopwatch, IDLE_TIMEOUT_US, STOPWATCH_WRAP_US};
