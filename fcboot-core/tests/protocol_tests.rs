// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Frame-size guarantees for the update protocol.

use fcboot_core::protocol::{Command, Response, MAX_CHUNK_SIZE, MSG_BUF_SIZE};
use fcboot_core::state::DeviceState;

#[test]
fn test_largest_command_fits_the_receive_buffer() {
    let mut data = heapless::Vec::<u8, MAX_CHUNK_SIZE>::new();
    // All zeros is the COBS worst case for overhead.
    data.resize(MAX_CHUNK_SIZE, 0x00).unwrap();
    let cmd = Command::UploadChunk {
        offset: u32::MAX,
        data,
    };
    let mut buf = [0u8; 2 * MSG_BUF_SIZE];
    let encoded = cmd.encode(&mut buf).unwrap();
    assert!(
        encoded.len() <= MSG_BUF_SIZE,
        "worst-case chunk frame is {} bytes",
        encoded.len()
    );
}

#[test]
fn test_largest_response_fits_the_receive_buffer() {
    let mut data = heapless::Vec::<u8, MAX_CHUNK_SIZE>::new();
    data.resize(MAX_CHUNK_SIZE, 0x00).unwrap();
    let resp = Response::Chunk {
        offset: u32::MAX,
        data,
    };
    let mut buf = [0u8; 2 * MSG_BUF_SIZE];
    let encoded = resp.encode(&mut buf).unwrap();
    assert!(encoded.len() <= MSG_BUF_SIZE);
}

#[test]
fn test_status_reply_carries_device_state() {
    let resp = Response::Status {
        state: DeviceState::Downloading,
    };
    let mut buf = [0u8; MSG_BUF_SIZE];
    let encoded = resp.encode(&mut buf).unwrap();
    let mut frame = [0u8; MSG_BUF_SIZE];
    frame[..encoded.len()].copy_from_slice(encoded);
    let decoded = Response::decode(&mut frame[..encoded.len()]).unwrap();
    assert_eq!(
        decoded,
        Response::Status {
            state: DeviceState::Downloading
        }
    );
}

#[test]
fn test_garbage_frame_decodes_to_none() {
    let mut junk = [0xFFu8; 16];
    assert!(Command::decode(&mut junk).is_none());
}
