// src/hdr/packet.rs
//! Byte layout of the advanced-color device-info packets.
//!
//! Both packets start with the display-configuration device-info header:
//!
//! | offset | size | field              |
//! |--------|------|--------------------|
//! | 0      | 4    | request type       |
//! | 4      | 4    | packet size        |
//! | 8      | 4    | adapter id (low)   |
//! | 12     | 4    | adapter id (high)  |
//! | 16     | 4    | target id          |
//!
//! Byte 20 carries the advanced-color state in a get response and the
//! enable switch in a set request. The remaining template bytes are what the
//! driver expects and must be sent unchanged.

use super::DisplayTarget;

pub const GET_ADVANCED_COLOR_INFO: u32 = 9;
pub const SET_ADVANCED_COLOR_STATE: u32 = 10;

pub const INFO_PACKET_LEN: usize = 32;
pub const STATE_PACKET_LEN: usize = 24;

/// Offset of the state byte in both packets.
pub const STATE_OFFSET: usize = 20;

const INFO_TEMPLATE: [u8; INFO_PACKET_LEN] = [
    0x09, 0x00, 0x00, 0x00, 0x20, 0x00, 0x00, 0x00, 0x7C, 0x6F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x04, 0x01, 0x00, 0x00, 0xDB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00,
];

const STATE_TEMPLATE: [u8; STATE_PACKET_LEN] = [
    0x0A, 0x00, 0x00, 0x00, 0x18, 0x00, 0x00, 0x00, 0x14, 0x81, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x04, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
];

fn write_target(buf: &mut [u8], target: DisplayTarget) {
    buf[8..12].copy_from_slice(&target.adapter.low_part.to_le_bytes());
    buf[12..16].copy_from_slice(&target.adapter.high_part.to_le_bytes());
    buf[16..20].copy_from_slice(&target.id.to_le_bytes());
}

/// Query for the advanced-color capability and state of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvancedColorInfoRequest {
    pub target: DisplayTarget,
}

impl AdvancedColorInfoRequest {
    pub fn new(target: DisplayTarget) -> Self {
        AdvancedColorInfoRequest { target }
    }

    pub fn encode(&self) -> [u8; INFO_PACKET_LEN] {
        let mut buf = INFO_TEMPLATE;
        write_target(&mut buf, self.target);
        buf
    }
}

/// Reads the state byte out of a completed info packet.
pub fn decode_state(response: &[u8; INFO_PACKET_LEN]) -> u8 {
    response[STATE_OFFSET]
}

/// Request switching advanced color on or off for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvancedColorStateRequest {
    pub target: DisplayTarget,
    pub enable: bool,
}

impl AdvancedColorStateRequest {
    pub fn new(target: DisplayTarget, enable: bool) -> Self {
        AdvancedColorStateRequest { target, enable }
    }

    pub fn encode(&self) -> [u8; STATE_PACKET_LEN] {
        let mut buf = STATE_TEMPLATE;
        write_target(&mut buf, self.target);
        buf[STATE_OFFSET] = u8::from(self.enable);
        buf
    }
}
