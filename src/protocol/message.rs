//! Message composer.
//!
//! Every message shares one frame:
//! `F0 41 <device> 00 00 00 0E <command> <address:4> <body> <checksum> F7`.
//! The body is parameter data for DT1 and a 4-byte size for RQ1.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::address::{size_field, Address};
use super::checksum::checksum;
use super::codec::pack_nibbles;
use crate::error::ProtocolError;
use crate::params::BlockDescriptor;
use crate::patch::BlockValues;

/// Exclusive status.
pub const EST: u8 = 0xF0;
/// End of exclusive.
pub const EOX: u8 = 0xF7;
/// Roland manufacturer ID.
pub const ROLAND_ID: u8 = 0x41;
/// JD-Xi model ID.
pub const MODEL_ID: [u8; 4] = [0x00, 0x00, 0x00, 0x0E];

/// Command byte.
pub type CommandId = u8;
/// "Data set 1", a write.
pub const CM_DT1: CommandId = 0x12;
/// "Request data 1", a read.
pub const CM_RQ1: CommandId = 0x11;

/// Bytes before the address: status, manufacturer, device, model, command.
pub const HEADER_LEN: usize = 8;
/// Total framing around a payload: header, address, checksum, terminator.
pub const FRAMING_LEN: usize = HEADER_LEN + 4 + 2;

/// Device ID 1..=16, matching the instrument's receive channel setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DeviceId(u8);

impl DeviceId {
    /// Returns the device ID if it is in 1..=16.
    pub fn new(id: u8) -> Option<Self> {
        (1..=16).contains(&id).then_some(Self(id))
    }

    /// The byte sent on the wire.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self(0x10)
    }
}

impl TryFrom<u8> for DeviceId {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        DeviceId::new(id).ok_or_else(|| format!("device id {} not in 1..=16", id))
    }
}

impl From<DeviceId> for u8 {
    fn from(id: DeviceId) -> u8 {
        id.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}h", self.0)
    }
}

/// Builds outbound messages for one device.
#[derive(Debug, Clone, Copy, Default)]
pub struct Composer {
    device_id: DeviceId,
}

impl Composer {
    /// Creates a composer addressing `device_id`.
    pub fn new(device_id: DeviceId) -> Self {
        Self { device_id }
    }

    /// The device this composer addresses.
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    /// Builds a real-time single-parameter change. `value` is the raw register
    /// value; wider values are nibble-packed over `byte_width` bytes.
    pub fn compose_parameter_change(
        &self,
        address: Address,
        value: u32,
        byte_width: usize,
    ) -> Result<Vec<u8>, ProtocolError> {
        let limit = if byte_width <= 1 { 0x80 } else { 1u64 << (4 * byte_width) };
        if byte_width == 0 || byte_width > 4 || value as u64 >= limit {
            return Err(ProtocolError::OutOfRange {
                parameter: "Raw Value",
                value: i32::try_from(value).unwrap_or(i32::MAX),
                min: 0,
                max: (limit - 1).min(i32::MAX as u64) as i32,
            });
        }

        let data: Vec<u8> = if byte_width == 1 {
            vec![value as u8]
        } else {
            // pack_nibbles yields four; keep the low `byte_width` of them.
            pack_nibbles(value as u16)[4 - byte_width..].to_vec()
        };
        Ok(self.frame(CM_DT1, address, &data))
    }

    /// Builds a whole-block dump from the block's current values.
    pub fn compose_block_dump(
        &self,
        block: &BlockDescriptor,
        values: &BlockValues,
    ) -> Result<Vec<u8>, ProtocolError> {
        let payload = values.to_payload(block.layout)?;
        Ok(self.frame(CM_DT1, block.address, &payload))
    }

    /// Builds a request for the whole block.
    pub fn compose_block_request(&self, block: &BlockDescriptor) -> Vec<u8> {
        self.frame(CM_RQ1, block.address, &size_field(block.length()))
    }

    fn frame(&self, command: CommandId, address: Address, body: &[u8]) -> Vec<u8> {
        let address = address.bytes();
        let mut msg = Vec::with_capacity(FRAMING_LEN + body.len());
        msg.extend_from_slice(&[EST, ROLAND_ID, self.device_id.value()]);
        msg.extend_from_slice(&MODEL_ID);
        msg.push(command);
        msg.extend_from_slice(&address);
        msg.extend_from_slice(body);
        msg.push(checksum(address.iter().chain(body)));
        msg.push(EOX);
        msg
    }
}
