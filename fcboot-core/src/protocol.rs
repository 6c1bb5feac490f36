// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Update protocol types for bootloader <-> host communication.
//!
//! Frames are postcard-serialized and COBS-framed on the wire, sized so that
//! every command fits the bootloader's fixed 63-byte receive buffer.

use serde::{Deserialize, Serialize};

use crate::state::DeviceState;

/// Capacity of the bootloader's receive buffer, and therefore the maximum
/// encoded frame size.
pub const MSG_BUF_SIZE: usize = 63;

/// Maximum firmware payload per chunk. Leaves room for the postcard envelope
/// and COBS overhead inside one frame.
pub const MAX_CHUNK_SIZE: usize = 48;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Command {
    GetStatus,
    /// Move from `BootloaderIdle` into an explicit update session.
    EnterUpdate,
    StartUpload {
        size: u32,
    },
    UploadChunk {
        offset: u32,
        data: heapless::Vec<u8, MAX_CHUNK_SIZE>,
    },
    FinishUpload,
    StartDownload {
        size: u32,
    },
    /// Request the application launch from update mode.
    JumpFirmware,
    Reset,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Response {
    Ack(AckStatus),
    Status {
        state: DeviceState,
    },
    Chunk {
        offset: u32,
        data: heapless::Vec<u8, MAX_CHUNK_SIZE>,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckStatus {
    Ok,
    BadCommand,
    BadState,
    TooLarge,
    FlashError,
}

impl Command {
    /// Decode one COBS-framed command. The buffer is decoded in place and
    /// must not be reused afterwards.
    pub fn decode(frame: &mut [u8]) -> Option<Self> {
        postcard::from_bytes_cobs(frame).ok()
    }

    /// Encode into `buf`, returning the framed bytes.
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Option<&'a mut [u8]> {
        postcard::to_slice_cobs(self, buf).ok()
    }
}

impl Response {
    pub fn decode(frame: &mut [u8]) -> Option<Self> {
        postcard::from_bytes_cobs(frame).ok()
    }

    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Option<&'a mut [u8]> {
        postcard::to_slice_cobs(self, buf).ok()
    }
}
