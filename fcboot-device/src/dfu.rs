// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Update command interpreter.
//!
//! Sole authority for the upload/download/success state family and the only
//! caller of the flash programmer. The main loop hands it at most one frame
//! per iteration; download streaming rides the per-tick `pump` hook, one
//! chunk per iteration.

use fcboot_core::protocol::{AckStatus, Command, Response, MAX_CHUNK_SIZE, MSG_BUF_SIZE};
use fcboot_core::runner::{BootControl, CommandInterpreter, FrameTransport};
use fcboot_core::state::DeviceState;

use crate::flash;

struct Upload {
    size: u32,
    received: u32,
}

struct Download {
    size: u32,
    sent: u32,
}

pub struct DfuInterpreter {
    upload: Option<Upload>,
    download: Option<Download>,
}

impl DfuInterpreter {
    pub fn new() -> Self {
        Self {
            upload: None,
            download: None,
        }
    }
}

fn reply<T: FrameTransport>(transport: &mut T, resp: &Response) {
    let mut buf = [0u8; MSG_BUF_SIZE];
    if let Some(encoded) = resp.encode(&mut buf) {
        transport.send(encoded);
    }
}

fn ack<T: FrameTransport>(transport: &mut T, status: AckStatus) {
    reply(transport, &Response::Ack(status));
}

/// States from which a new transfer may start.
fn session_idle(state: DeviceState) -> bool {
    matches!(
        state,
        DeviceState::UpdateIdle | DeviceState::LastOperationSuccess
    )
}

impl<T: FrameTransport> CommandInterpreter<T> for DfuInterpreter {
    fn dispatch(&mut self, frame: &mut [u8], ctl: &mut BootControl, transport: &mut T) {
        // Undecodable frames are line noise; drop them without a reply.
        let Some(cmd) = Command::decode(frame) else {
            return;
        };

        match cmd {
            Command::GetStatus => {
                reply(transport, &Response::Status { state: ctl.state });
            }

            Command::EnterUpdate => {
                if matches!(ctl.state, DeviceState::BootloaderIdle) || session_idle(ctl.state) {
                    ctl.state = DeviceState::UpdateIdle;
                    ack(transport, AckStatus::Ok);
                } else {
                    ack(transport, AckStatus::BadState);
                }
            }

            Command::StartUpload { size } => {
                if !session_idle(ctl.state) {
                    ack(transport, AckStatus::BadState);
                    return;
                }
                if size == 0 || size > flash::FW_MAX_SIZE {
                    ack(transport, AckStatus::TooLarge);
                    return;
                }
                defmt::println!("Upload start, {} bytes", size);
                flash::unlock();
                if !unsafe { flash::erase_region(flash::FW_BASE, size) } {
                    flash::lock();
                    ack(transport, AckStatus::FlashError);
                    return;
                }
                self.upload = Some(Upload { size, received: 0 });
                ctl.state = DeviceState::UploadStarting;
                ack(transport, AckStatus::Ok);
            }

            Command::UploadChunk { offset, data } => {
                let Some(upload) = self.upload.as_mut() else {
                    ack(transport, AckStatus::BadState);
                    return;
                };
                if !matches!(
                    ctl.state,
                    DeviceState::UploadStarting | DeviceState::Uploading
                ) {
                    ack(transport, AckStatus::BadState);
                    return;
                }
                // Chunks are strictly sequential and bounded by the announced size.
                let len = data.len() as u32;
                if offset != upload.received || upload.received + len > upload.size {
                    ack(transport, AckStatus::BadCommand);
                    return;
                }
                if !unsafe { flash::program(flash::FW_BASE + offset, &data) } {
                    ack(transport, AckStatus::FlashError);
                    return;
                }
                upload.received += len;
                ctl.state = DeviceState::Uploading;
                ack(transport, AckStatus::Ok);
            }

            Command::FinishUpload => {
                let complete = self
                    .upload
                    .as_ref()
                    .is_some_and(|u| u.received == u.size && ctl.state == DeviceState::Uploading);
                if !complete {
                    ack(transport, AckStatus::BadState);
                    return;
                }
                flash::lock();
                self.upload = None;
                ctl.state = DeviceState::LastOperationSuccess;
                defmt::println!("Upload complete");
                ack(transport, AckStatus::Ok);
            }

            Command::StartDownload { size } => {
                if !session_idle(ctl.state) {
                    ack(transport, AckStatus::BadState);
                    return;
                }
                if size == 0 || size > flash::FW_MAX_SIZE {
                    ack(transport, AckStatus::TooLarge);
                    return;
                }
                self.download = Some(Download { size, sent: 0 });
                ctl.state = DeviceState::Downloading;
                ack(transport, AckStatus::Ok);
            }

            Command::JumpFirmware => {
                ack(transport, AckStatus::Ok);
                ctl.launch_requested = true;
            }

            Command::Reset => {
                ack(transport, AckStatus::Ok);
                // Let the ACK drain before the reset tears USB down.
                cortex_m::asm::delay(8_000_000);
                cortex_m::peripheral::SCB::sys_reset();
            }
        }
    }

    fn pump(&mut self, ctl: &mut BootControl, transport: &mut T) {
        if ctl.state != DeviceState::Downloading {
            return;
        }
        let Some(download) = self.download.as_mut() else {
            return;
        };

        let remaining = download.size - download.sent;
        let len = remaining.min(MAX_CHUNK_SIZE as u32);
        let mut data = heapless::Vec::<u8, MAX_CHUNK_SIZE>::new();
        data.resize(len as usize, 0).ok();
        flash::read(flash::FW_BASE + download.sent, &mut data);

        reply(
            transport,
            &Response::Chunk {
                offset: download.sent,
                data,
            },
        );

        download.sent += len;
        if download.sent == download.size {
            defmt::println!("Download complete");
            self.download = None;
            ctl.state = DeviceState::LastOperationSuccess;
        }
    }
}
