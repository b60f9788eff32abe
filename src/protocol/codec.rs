//! Value codec.
//!
//! Converts semantic parameter values to the byte encodings the device
//! expects at a given offset, and back. Encoding is partial (values that
//! cannot be represented are refused); decoding is total over every byte the
//! device can send.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Bias applied to nibble-packed values of effect-parameter blocks.
pub const EFFECT_BIAS: i32 = 32768;

/// Length of a tone/kit name field.
pub const NAME_LEN: usize = 12;

/// How a parameter's value is stored in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    /// `byte = value`.
    Direct,
    /// `byte = value + 64`, for bipolar controls.
    Signed64,
    /// `byte = value / 10 + 64`, for bipolar controls in steps of 10.
    Signed64By10,
    /// `byte = value + 1`.
    OffsetPlus1,
    /// `byte = value + 10`.
    OffsetPlus10,
    /// Four bytes, one nibble each, most significant first.
    Nibble4,
}

impl Encoding {
    /// Number of payload bytes the encoding occupies.
    pub fn width(&self) -> usize {
        match self {
            Self::Nibble4 => 4,
            _ => 1,
        }
    }
}

/// An encoded value, ready to be placed in a payload or message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoded {
    /// One 7-bit byte.
    Byte(u8),
    /// Four nibble bytes.
    Nibbles([u8; 4]),
}

impl Encoded {
    /// The encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Byte(b) => std::slice::from_ref(b),
            Self::Nibbles(n) => n,
        }
    }

    /// The encoded value as one unsigned register value (nibbles joined).
    pub fn raw(&self) -> u32 {
        match *self {
            Self::Byte(b) => b as u32,
            Self::Nibbles(n) => unpack_nibbles(n) as u32,
        }
    }
}

/// Encodes `value`, or returns `None` if the encoding cannot represent it.
///
/// `effect_bias` only affects [Encoding::Nibble4].
pub fn encode(encoding: Encoding, value: i32, effect_bias: bool) -> Option<Encoded> {
    let byte = |v: i32| (0..=0x7F).contains(&v).then_some(Encoded::Byte(v as u8));
    match encoding {
        Encoding::Direct => byte(value),
        Encoding::Signed64 => byte(value.checked_add(64)?),
        Encoding::Signed64By10 => {
            if value % 10 != 0 {
                return None;
            }
            byte((value / 10).checked_add(64)?)
        }
        Encoding::OffsetPlus1 => byte(value.checked_add(1)?),
        Encoding::OffsetPlus10 => byte(value.checked_add(10)?),
        Encoding::Nibble4 => {
            let raw = if effect_bias {
                value.checked_add(EFFECT_BIAS)?
            } else {
                value
            };
            u16::try_from(raw)
                .ok()
                .map(|raw| Encoded::Nibbles(pack_nibbles(raw)))
        }
    }
}

/// Decodes the bytes at a parameter's offset. `bytes` must hold at least
/// [Encoding::width] bytes. Out-of-range bits are masked off, never rejected.
pub fn decode(encoding: Encoding, bytes: &[u8], effect_bias: bool) -> i32 {
    let b = (bytes[0] & 0x7F) as i32;
    match encoding {
        Encoding::Direct => b,
        Encoding::Signed64 => b - 64,
        Encoding::Signed64By10 => (b - 64) * 10,
        Encoding::OffsetPlus1 => b - 1,
        Encoding::OffsetPlus10 => b - 10,
        Encoding::Nibble4 => {
            let raw = unpack_nibbles([bytes[0], bytes[1], bytes[2], bytes[3]]) as i32;
            if effect_bias {
                raw - EFFECT_BIAS
            } else {
                raw
            }
        }
    }
}

/// Splits a 16-bit value into four nibble bytes, most significant first.
pub fn pack_nibbles(value: u16) -> [u8; 4] {
    [
        ((value >> 12) & 0x0F) as u8,
        ((value >> 8) & 0x0F) as u8,
        ((value >> 4) & 0x0F) as u8,
        (value & 0x0F) as u8,
    ]
}

/// Joins four nibble bytes: `4096·b0 + 256·b1 + 16·b2 + b3`.
pub fn unpack_nibbles(bytes: [u8; 4]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |acc, &b| (acc << 4) | (b & 0x0F) as u16)
}

/// Decodes a name field. Bytes below 0x20 (the device uses 0x00 for
/// "not editable") read as spaces; trailing spaces are kept.
pub fn decode_name(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take(NAME_LEN)
        .map(|&b| if b < 0x20 { ' ' } else { (b & 0x7F) as char })
        .collect()
}

/// Encodes a name into a space-padded 12-byte field.
pub fn encode_name(name: &str) -> Result<[u8; NAME_LEN], ProtocolError> {
    let len = name.chars().count();
    if len > NAME_LEN {
        return Err(ProtocolError::OutOfRange {
            parameter: "Name Length",
            value: len as i32,
            min: 0,
            max: NAME_LEN as i32,
        });
    }

    let mut field = [b' '; NAME_LEN];
    for (slot, c) in field.iter_mut().zip(name.chars()) {
        if !(' '..='~').contains(&c) {
            return Err(ProtocolError::OutOfRange {
                parameter: "Name Character",
                value: c as i32,
                min: 0x20,
                max: 0x7E,
            });
        }
        *slot = c as u8;
    }
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_byte_encodings() {
        assert_eq!(encode(Encoding::Direct, 100, false), Some(Encoded::Byte(100)));
        assert_eq!(encode(Encoding::Signed64, -10, false), Some(Encoded::Byte(54)));
        assert_eq!(encode(Encoding::Signed64By10, -100, false), Some(Encoded::Byte(54)));
        assert_eq!(encode(Encoding::OffsetPlus1, -1, false), Some(Encoded::Byte(0)));
        assert_eq!(encode(Encoding::OffsetPlus10, 10, false), Some(Encoded::Byte(20)));
    }

    #[test]
    fn test_encode_refuses_unrepresentable() {
        assert_eq!(encode(Encoding::Direct, 128, false), None);
        assert_eq!(encode(Encoding::Direct, -1, false), None);
        assert_eq!(encode(Encoding::Signed64, 64, false), None);
        assert_eq!(encode(Encoding::Signed64By10, 15, false), None);
        assert_eq!(encode(Encoding::Nibble4, -1, false), None);
        assert_eq!(encode(Encoding::Nibble4, 65536, false), None);
        assert_eq!(encode(Encoding::Nibble4, -32769, true), None);
    }

    #[test]
    fn test_encode_extreme_values_is_none() {
        for encoding in [
            Encoding::Direct,
            Encoding::Signed64,
            Encoding::Signed64By10,
            Encoding::OffsetPlus1,
            Encoding::OffsetPlus10,
            Encoding::Nibble4,
        ] {
            assert_eq!(encode(encoding, i32::MAX, false), None, "{:?}", encoding);
            assert_eq!(encode(encoding, i32::MIN, false), None, "{:?}", encoding);
        }
        assert_eq!(encode(Encoding::Nibble4, i32::MAX, true), None);
        assert_eq!(encode(Encoding::Nibble4, i32::MIN, true), None);
    }

    #[test]
    fn test_single_byte_round_trip() {
        for encoding in [
            Encoding::Direct,
            Encoding::Signed64,
            Encoding::OffsetPlus1,
            Encoding::OffsetPlus10,
        ] {
            for byte in 0u8..=0x7F {
                let value = decode(encoding, &[byte], false);
                let encoded = encode(encoding, value, false).unwrap();
                assert_eq!(encoded, Encoded::Byte(byte), "{:?}", encoding);
            }
        }
        for value in (-630..=630).step_by(10) {
            let encoded = encode(Encoding::Signed64By10, value, false).unwrap();
            assert_eq!(decode(Encoding::Signed64By10, encoded.as_bytes(), false), value);
        }
    }

    #[test]
    fn test_nibble_layout() {
        assert_eq!(pack_nibbles(0x1234), [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(unpack_nibbles([0x0F, 0x0E, 0x0D, 0x0C]), 0xFEDC);
        assert_eq!(
            encode(Encoding::Nibble4, 16384, false),
            Some(Encoded::Nibbles([0x04, 0x00, 0x00, 0x00]))
        );
    }

    #[test]
    fn test_nibble_round_trip_with_and_without_bias() {
        for value in [0, 1, 255, 16384, 32767, 65535] {
            let encoded = encode(Encoding::Nibble4, value, false).unwrap();
            assert_eq!(decode(Encoding::Nibble4, encoded.as_bytes(), false), value);
        }
        for value in [-20000, -1, 0, 1, 20000, -32768, 32767] {
            let encoded = encode(Encoding::Nibble4, value, true).unwrap();
            assert_eq!(decode(Encoding::Nibble4, encoded.as_bytes(), true), value);
        }
        // Zero sits at the bias point.
        assert_eq!(
            encode(Encoding::Nibble4, 0, true),
            Some(Encoded::Nibbles([0x08, 0x00, 0x00, 0x00]))
        );
    }

    #[test]
    fn test_decode_masks_high_bits() {
        assert_eq!(decode(Encoding::Direct, &[0xFF], false), 0x7F);
        assert_eq!(decode(Encoding::Nibble4, &[0x1F, 0x10, 0x10, 0x11], false), 0xF001);
    }

    #[test]
    fn test_name_codec() {
        let field = encode_name("Init Tone").unwrap();
        assert_eq!(&field, b"Init Tone   ");
        assert_eq!(decode_name(&field), "Init Tone   ");

        let sentinel = [0x00u8; NAME_LEN];
        assert_eq!(decode_name(&sentinel), " ".repeat(NAME_LEN));
    }

    #[test]
    fn test_name_rejects_bad_input() {
        assert!(matches!(
            encode_name("This name is too long"),
            Err(ProtocolError::OutOfRange { parameter: "Name Length", .. })
        ));
        assert!(matches!(
            encode_name("Caf\u{e9}"),
            Err(ProtocolError::OutOfRange { parameter: "Name Character", .. })
        ));
    }

    #[test]
    fn test_encoding_width() {
        assert_eq!(Encoding::Nibble4.width(), 4);
        assert_eq!(Encoding::Signed64.width(), 1);
    }
}
