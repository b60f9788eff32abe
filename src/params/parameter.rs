//! Parameter definitions.
//!
//! A parameter is a named quantity at a fixed offset inside a block payload.
//! Definitions are static tables; nothing here changes at runtime.

use std::ops::RangeInclusive;

use crate::error::ProtocolError;
use crate::protocol::codec::{self, Encoded, Encoding};

/// Definition of one addressable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    /// Human-readable name, unique within its block.
    pub name: &'static str,
    /// Byte offset within the block payload.
    pub offset: usize,
    /// How the value is stored.
    pub encoding: Encoding,
    /// Lowest legal value.
    pub min: i32,
    /// Highest legal value.
    pub max: i32,
    /// Value of the init tone.
    pub default: i32,
}

impl Parameter {
    /// Creates a parameter definition.
    pub const fn new(
        name: &'static str,
        offset: usize,
        encoding: Encoding,
        min: i32,
        max: i32,
        default: i32,
    ) -> Self {
        Self {
            name,
            offset,
            encoding,
            min,
            max,
            default,
        }
    }

    /// Unsigned knob stored as-is.
    pub const fn direct(name: &'static str, offset: usize, min: i32, max: i32, default: i32) -> Self {
        Self::new(name, offset, Encoding::Direct, min, max, default)
    }

    /// On/off switch.
    pub const fn switch(name: &'static str, offset: usize, default: bool) -> Self {
        Self::new(name, offset, Encoding::Direct, 0, 1, default as i32)
    }

    /// Bipolar control centred on byte 64.
    pub const fn signed(name: &'static str, offset: usize, min: i32, max: i32, default: i32) -> Self {
        Self::new(name, offset, Encoding::Signed64, min, max, default)
    }

    /// Bipolar control in steps of 10, centred on byte 64.
    pub const fn signed_by_10(
        name: &'static str,
        offset: usize,
        min: i32,
        max: i32,
        default: i32,
    ) -> Self {
        Self::new(name, offset, Encoding::Signed64By10, min, max, default)
    }

    /// Four-byte nibble-packed value.
    pub const fn wide(name: &'static str, offset: usize, min: i32, max: i32, default: i32) -> Self {
        Self::new(name, offset, Encoding::Nibble4, min, max, default)
    }

    /// Payload bytes occupied.
    pub fn width(&self) -> usize {
        self.encoding.width()
    }

    /// Payload offsets occupied.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.width()
    }

    /// Returns true if `value` may be encoded.
    pub fn is_legal(&self, value: i32) -> bool {
        let stepped = match self.encoding {
            Encoding::Signed64By10 => value % 10 == 0,
            _ => true,
        };
        stepped && (self.min..=self.max).contains(&value)
    }

    /// Encodes `value`, refusing anything outside the legal range.
    pub fn encode(&self, value: i32, effect_bias: bool) -> Result<Encoded, ProtocolError> {
        let out_of_range = || ProtocolError::OutOfRange {
            parameter: self.name,
            value,
            min: self.min,
            max: self.max,
        };
        if !self.is_legal(value) {
            return Err(out_of_range());
        }
        codec::encode(self.encoding, value, effect_bias).ok_or_else(out_of_range)
    }

    /// Decodes this parameter from a whole block payload.
    pub fn decode(&self, payload: &[u8], effect_bias: bool) -> i32 {
        codec::decode(self.encoding, &payload[self.span()], effect_bias)
    }

    /// Bytes a single-byte parameter may legally hold, derived from its
    /// value range. Wide parameters are constrained per nibble instead.
    pub fn byte_range(&self) -> Option<RangeInclusive<u8>> {
        if self.width() != 1 {
            return None;
        }
        let lo = codec::encode(self.encoding, self.min, false)?;
        let hi = codec::encode(self.encoding, self.max, false)?;
        Some(lo.raw() as u8..=hi.raw() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_checks_range() {
        let p = Parameter::signed("OSC Pitch", 0x03, -24, 24, 0);
        assert_eq!(p.encode(-24, false).unwrap(), Encoded::Byte(40));
        assert_eq!(p.encode(24, false).unwrap(), Encoded::Byte(88));
        match p.encode(25, false) {
            Err(ProtocolError::OutOfRange {
                parameter,
                value,
                min,
                max,
            }) => {
                assert_eq!(parameter, "OSC Pitch");
                assert_eq!((value, min, max), (25, -24, 24));
            }
            other => panic!("Expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_signed_by_10_requires_step() {
        let p = Parameter::signed_by_10("Cutoff Keyfollow", 0x0D, -100, 100, 0);
        assert!(p.is_legal(-100));
        assert!(p.is_legal(30));
        assert!(!p.is_legal(35));
        assert!(!p.is_legal(110));
        assert!(p.encode(35, false).is_err());
    }

    #[test]
    fn test_byte_range() {
        let p = Parameter::signed("Pan", 0x1B, -64, 63, 0);
        assert_eq!(p.byte_range(), Some(0..=127));

        let p = Parameter::signed_by_10("Keyfollow", 0x0D, -100, 100, 0);
        assert_eq!(p.byte_range(), Some(54..=74));

        let p = Parameter::wide("Wave Number", 0x35, 0, 16384, 0);
        assert_eq!(p.byte_range(), None);
        assert_eq!(p.span(), 0x35..0x39);
    }

    #[test]
    fn test_decode_from_payload() {
        let p = Parameter::wide("Wave Number", 2, 0, 16384, 0);
        let payload = [0, 0, 0x01, 0x02, 0x03, 0x04, 0];
        assert_eq!(p.decode(&payload, false), 0x1234);
    }
}
