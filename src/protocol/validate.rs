//! Message validator and parser.
//!
//! Inbound bytes are checked in a fixed order: length, then structure, then
//! checksum. Only a message that passes all three is decoded.

use std::ops::Range;

use super::address::Address;
use super::checksum::{checksum, is_valid};
use super::codec::{self, Encoded, Encoding};
use super::message::{CommandId, CM_DT1, EOX, EST, FRAMING_LEN, HEADER_LEN, MODEL_ID, ROLAND_ID};
use crate::error::ProtocolError;
use crate::params::{labels, BlockDescriptor, Parameter};
use crate::patch::BlockValues;

/// Offset of the address within a message.
const ADDRESS_AT: usize = HEADER_LEN;
/// Offset of the payload within a message.
const PAYLOAD_AT: usize = HEADER_LEN + 4;

/// Bytes in `range` must lie in `min..=max`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteConstraint {
    /// Message offsets the constraint applies to.
    pub range: Range<usize>,
    /// Lowest allowed byte.
    pub min: u8,
    /// Highest allowed byte.
    pub max: u8,
}

impl ByteConstraint {
    fn exact(at: usize, byte: u8) -> Self {
        Self {
            range: at..at + 1,
            min: byte,
            max: byte,
        }
    }

    fn span(range: Range<usize>, min: u8, max: u8) -> Self {
        Self { range, min, max }
    }
}

/// The structural pattern of one block's dump: an ordered list of byte-range
/// constraints over the whole message. A byte must satisfy every constraint
/// covering it.
///
/// Nibble-packed parameters are additionally checked as whole values, since
/// four individually legal nibbles can still join to an illegal value.
#[derive(Debug, Clone)]
pub struct StructuralPattern {
    constraints: Vec<ByteConstraint>,
    wide: Vec<(usize, &'static Parameter)>,
    effect_bias: bool,
}

impl StructuralPattern {
    /// Builds the pattern for a dump of `block`.
    pub fn for_block(block: &BlockDescriptor) -> Self {
        let layout = block.layout;
        let payload_end = PAYLOAD_AT + layout.length;
        let mut constraints = vec![
            ByteConstraint::exact(0, EST),
            ByteConstraint::exact(1, ROLAND_ID),
            ByteConstraint::span(2..3, 0x01, 0x10),
        ];
        for (i, &b) in MODEL_ID.iter().enumerate() {
            constraints.push(ByteConstraint::exact(3 + i, b));
        }
        constraints.push(ByteConstraint::exact(7, CM_DT1));
        for (i, &b) in block.address.bytes().iter().enumerate() {
            constraints.push(ByteConstraint::exact(ADDRESS_AT + i, b));
        }

        constraints.push(ByteConstraint::span(PAYLOAD_AT..payload_end, 0x00, 0x7F));
        if let Some(name) = layout.name_range() {
            let range = PAYLOAD_AT + name.start..PAYLOAD_AT + name.end;
            constraints.push(ByteConstraint::span(range, 0x00, 0x7E));
        }
        let mut wide = Vec::new();
        for param in layout.parameters() {
            let range = PAYLOAD_AT + param.offset..PAYLOAD_AT + param.offset + param.width();
            match param.byte_range() {
                Some(bytes) => {
                    constraints.push(ByteConstraint::span(range, *bytes.start(), *bytes.end()))
                }
                None => {
                    wide.push((range.start, param));
                    constraints.push(ByteConstraint::span(range, 0x00, 0x0F));
                }
            }
        }

        constraints.push(ByteConstraint::span(payload_end..payload_end + 1, 0x00, 0x7F));
        constraints.push(ByteConstraint::exact(payload_end + 1, EOX));
        Self {
            constraints,
            wide,
            effect_bias: layout.effect_bias,
        }
    }

    /// The constraints, in evaluation order.
    pub fn constraints(&self) -> &[ByteConstraint] {
        &self.constraints
    }

    /// Checks `raw` against every constraint. `raw` must already have the
    /// right length.
    pub fn check(&self, raw: &[u8]) -> Result<(), ProtocolError> {
        for constraint in &self.constraints {
            for offset in constraint.range.clone() {
                let observed = raw.get(offset).copied().unwrap_or(0xFF);
                if !(constraint.min..=constraint.max).contains(&observed) {
                    return Err(ProtocolError::StructuralMismatch {
                        offset,
                        observed,
                        min: constraint.min,
                        max: constraint.max,
                    });
                }
            }
        }
        for &(at, param) in &self.wide {
            if let Some(bytes) = raw.get(at..at + param.width()) {
                check_wide(bytes, at, param, self.effect_bias)?;
            }
        }
        Ok(())
    }
}

/// Checks the joined value of a nibble-packed parameter at message offset
/// `at`. The mismatch is reported at the first nibble that leaves the legal
/// range, with that nibble's bounds given the nibbles before it.
fn check_wide(
    bytes: &[u8],
    at: usize,
    param: &Parameter,
    effect_bias: bool,
) -> Result<(), ProtocolError> {
    let value = codec::decode(param.encoding, bytes, effect_bias);
    if (param.min..=param.max).contains(&value) {
        return Ok(());
    }

    let above = value > param.max;
    let bound = if above { param.max } else { param.min };
    let limit = match codec::encode(Encoding::Nibble4, bound, effect_bias) {
        Some(Encoded::Nibbles(nibbles)) => nibbles,
        _ => [0x0F; 4],
    };
    let i = (0..4).find(|&i| bytes[i] != limit[i]).unwrap_or(0);
    let (min, max) = if above {
        (0x00, limit[i])
    } else {
        (limit[i], 0x0F)
    };
    Err(ProtocolError::StructuralMismatch {
        offset: at + i,
        observed: bytes[i],
        min,
        max,
    })
}

/// Validates a complete dump of `block` and returns its payload.
pub fn validate<'a>(raw: &'a [u8], block: &BlockDescriptor) -> Result<&'a [u8], ProtocolError> {
    let expected = block.expected_length();
    if raw.len() != expected {
        return Err(ProtocolError::LengthMismatch {
            expected,
            observed: raw.len(),
        });
    }

    StructuralPattern::for_block(block).check(raw)?;

    let checksum_at = PAYLOAD_AT + block.length();
    check_checksum(raw, checksum_at)?;

    Ok(&raw[PAYLOAD_AT..checksum_at])
}

fn check_checksum(raw: &[u8], checksum_at: usize) -> Result<(), ProtocolError> {
    if is_valid(&raw[ADDRESS_AT..=checksum_at]) {
        return Ok(());
    }
    Err(ProtocolError::ChecksumMismatch {
        expected: checksum(&raw[ADDRESS_AT..checksum_at]),
        observed: raw[checksum_at],
    })
}

/// A block's decoded values with advisory display labels.
#[derive(Debug, Clone)]
pub struct DecodedBlock {
    /// Semantic values, indexed like the layout's parameters.
    pub values: BlockValues,
    /// Display label per parameter, where the parameter is enumerated.
    pub labels: Vec<Option<&'static str>>,
}

/// Decodes a validated payload of `block`.
pub fn decode(payload: &[u8], block: &BlockDescriptor) -> DecodedBlock {
    let layout = block.layout;
    let values = BlockValues::from_payload(layout, payload);
    let labels = layout
        .parameters()
        .zip(values.values())
        .map(|(param, &value)| labels::label(layout, param, value))
        .collect();
    DecodedBlock { values, labels }
}

/// Address of a framed JD-Xi message, without validating the rest of it.
pub fn peek_address(raw: &[u8]) -> Option<Address> {
    if raw.len() < FRAMING_LEN || raw[0] != EST || raw[1] != ROLAND_ID || raw[3..7] != MODEL_ID {
        return None;
    }
    Some(Address::new(raw[8], raw[9], raw[10], raw[11]))
}

/// An inbound message that is not the answer to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage<'a> {
    /// Device ID the message carries.
    pub device_id: u8,
    /// Command byte.
    pub command: CommandId,
    /// Target address.
    pub address: Address,
    /// Data bytes between address and checksum.
    pub data: &'a [u8],
}

/// Parses any JD-Xi DT1 message: framing, data range and checksum are
/// checked; the address is not interpreted.
pub fn parse_message(raw: &[u8]) -> Result<ParsedMessage<'_>, ProtocolError> {
    let address = peek_address(raw)
        .ok_or_else(|| ProtocolError::UnrecognizedMessage("not a JD-Xi SysEx message".into()))?;
    if raw.len() <= FRAMING_LEN {
        return Err(ProtocolError::UnrecognizedMessage("message carries no data".into()));
    }
    if raw[raw.len() - 1] != EOX {
        return Err(ProtocolError::UnrecognizedMessage("message is not terminated".into()));
    }
    let command = raw[7];
    if command != CM_DT1 {
        return Err(ProtocolError::UnrecognizedMessage(format!(
            "unexpected command {:02X}h",
            command
        )));
    }

    let checksum_at = raw.len() - 2;
    if let Some(offset) = (PAYLOAD_AT..=checksum_at).find(|&i| raw[i] > 0x7F) {
        return Err(ProtocolError::StructuralMismatch {
            offset,
            observed: raw[offset],
            min: 0x00,
            max: 0x7F,
        });
    }
    check_checksum(raw, checksum_at)?;

    Ok(ParsedMessage {
        device_id: raw[2],
        command,
        address,
        data: &raw[PAYLOAD_AT..checksum_at],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PartKind;
    use crate::protocol::message::{Composer, DeviceId};

    fn analog_dump() -> (BlockDescriptor, Vec<u8>) {
        let block = PartKind::Analog.blocks().remove(0);
        let values = BlockValues::init(block.layout);
        let raw = Composer::default().compose_block_dump(&block, &values).unwrap();
        (block, raw)
    }

    #[test]
    fn test_composed_dump_validates() {
        for part in PartKind::ALL {
            for block in part.blocks() {
                let values = BlockValues::init(block.layout);
                let raw = Composer::default().compose_block_dump(&block, &values).unwrap();
                let payload = validate(&raw, &block).unwrap();
                assert_eq!(payload.len(), block.length(), "{}", block.label);
            }
        }
    }

    #[test]
    fn test_one_byte_short_is_length_mismatch() {
        let (block, raw) = analog_dump();
        let short = &raw[..raw.len() - 1];
        match validate(short, &block) {
            Err(ProtocolError::LengthMismatch { expected, observed }) => {
                assert_eq!(expected, block.expected_length());
                assert_eq!(observed, block.expected_length() - 1);
            }
            other => panic!("Expected LengthMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_mutated_payload_byte_is_checksum_mismatch() {
        let (block, raw) = analog_dump();
        // Reserved bytes stay structurally legal for any 7-bit value.
        for offset in [PAYLOAD_AT + 12, PAYLOAD_AT + 0x3E] {
            let mut corrupt = raw.clone();
            corrupt[offset] = (corrupt[offset] + 1) & 0x7F;
            assert!(matches!(
                validate(&corrupt, &block),
                Err(ProtocolError::ChecksumMismatch { .. })
            ));
        }
    }

    #[test]
    fn test_structural_mismatch_reports_position() {
        let (block, mut raw) = analog_dump();
        raw[PAYLOAD_AT + 5] = 0x80;
        match validate(&raw, &block) {
            Err(ProtocolError::StructuralMismatch {
                offset, observed, ..
            }) => {
                assert_eq!(offset, PAYLOAD_AT + 5);
                assert_eq!(observed, 0x80);
            }
            other => panic!("Expected StructuralMismatch, got {:?}", other),
        }

        let (block, mut raw) = analog_dump();
        let last = raw.len() - 1;
        raw[last] = 0x7E;
        assert!(matches!(
            validate(&raw, &block),
            Err(ProtocolError::StructuralMismatch { .. })
        ));
    }

    #[test]
    fn test_wrong_address_is_structural() {
        let (_, raw) = analog_dump();
        let digital = &PartKind::Digital1.blocks()[0];
        // Same length as the analog tone block.
        assert_eq!(digital.expected_length(), raw.len());
        assert!(matches!(
            validate(&raw, digital),
            Err(ProtocolError::StructuralMismatch { offset: 9, .. })
        ));
    }

    #[test]
    fn test_parameter_range_is_structural() {
        let block = PartKind::Digital1.blocks().remove(2);
        let values = BlockValues::init(block.layout);
        let mut raw = Composer::default().compose_block_dump(&block, &values).unwrap();
        // Filter Cutoff Keyfollow only allows bytes 54..=74.
        let at = PAYLOAD_AT + 0x0D;
        raw[at] = 0x10;
        let checksum_at = raw.len() - 2;
        raw[checksum_at] = checksum(&raw[ADDRESS_AT..checksum_at]);
        match validate(&raw, &block) {
            Err(ProtocolError::StructuralMismatch {
                offset, min, max, ..
            }) => assert_eq!((offset, min, max), (at, 54, 74)),
            other => panic!("Expected StructuralMismatch, got {:?}", other),
        }
    }

    fn reseal(raw: &mut [u8]) {
        let checksum_at = raw.len() - 2;
        raw[checksum_at] = checksum(&raw[ADDRESS_AT..checksum_at]);
    }

    fn structural(result: Result<&[u8], ProtocolError>) -> (usize, u8, u8, u8) {
        match result {
            Err(ProtocolError::StructuralMismatch {
                offset,
                observed,
                min,
                max,
            }) => (offset, observed, min, max),
            other => panic!("Expected StructuralMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_wide_value_range_is_structural() {
        let block = PartKind::Digital1.blocks().remove(2);
        let values = BlockValues::init(block.layout);
        let mut raw = Composer::default().compose_block_dump(&block, &values).unwrap();
        let (_, wave) = block.layout.parameter_named("Wave Number").unwrap();
        let at = PAYLOAD_AT + wave.offset;

        // 65535, every nibble legal on its own.
        raw[at..at + 4].copy_from_slice(&[0x0F; 4]);
        reseal(&mut raw);
        assert_eq!(structural(validate(&raw, &block)), (at, 0x0F, 0x00, 0x04));

        // 16385, one past the maximum of 16384.
        raw[at..at + 4].copy_from_slice(&[0x04, 0x00, 0x00, 0x01]);
        reseal(&mut raw);
        assert_eq!(structural(validate(&raw, &block)), (at + 3, 0x01, 0x00, 0x00));

        raw[at..at + 4].copy_from_slice(&[0x04, 0x00, 0x00, 0x00]);
        reseal(&mut raw);
        assert!(validate(&raw, &block).is_ok());
    }

    #[test]
    fn test_biased_value_range_is_structural() {
        let block = PartKind::Effects.blocks().remove(0);
        let values = BlockValues::init(block.layout);
        let mut raw = Composer::default().compose_block_dump(&block, &values).unwrap();
        let (_, param) = block.layout.parameter_named("Effect Parameter 1").unwrap();
        let at = PAYLOAD_AT + param.offset;

        // 32767 after the bias; the maximum 20000 is CE20h on the wire.
        raw[at..at + 4].copy_from_slice(&[0x0F; 4]);
        reseal(&mut raw);
        assert_eq!(structural(validate(&raw, &block)), (at, 0x0F, 0x00, 0x0C));

        // -32768; the minimum -20000 is 31E0h on the wire.
        raw[at..at + 4].copy_from_slice(&[0x00; 4]);
        reseal(&mut raw);
        assert_eq!(structural(validate(&raw, &block)), (at, 0x00, 0x03, 0x0F));
    }

    #[test]
    fn test_name_bytes_are_structural() {
        let (block, mut raw) = analog_dump();
        raw[PAYLOAD_AT + 3] = 0x7F;
        reseal(&mut raw);
        assert_eq!(
            structural(validate(&raw, &block)),
            (PAYLOAD_AT + 3, 0x7F, 0x00, 0x7E)
        );
    }

    #[test]
    fn test_decode_resolves_labels() {
        let block = PartKind::Digital1.blocks().remove(2);
        let values = BlockValues::init(block.layout);
        let raw = Composer::default().compose_block_dump(&block, &values).unwrap();
        let decoded = decode(validate(&raw, &block).unwrap(), &block);
        assert_eq!(decoded.values, values);

        let (index, _) = block.layout.parameter_named("OSC Wave").unwrap();
        assert_eq!(decoded.labels[index], Some("SAW"));
        let (index, _) = block.layout.parameter_named("Filter Cutoff").unwrap();
        assert_eq!(decoded.labels[index], None);
    }

    #[test]
    fn test_parse_parameter_change() {
        let composer = Composer::new(DeviceId::new(0x10).unwrap());
        let address = Address::new(0x19, 0x42, 0x00, 0x17);
        let raw = composer.compose_parameter_change(address, 54, 1).unwrap();
        let msg = parse_message(&raw).unwrap();
        assert_eq!(msg.device_id, 0x10);
        assert_eq!(msg.address, address);
        assert_eq!(msg.data, &[54]);

        let mut bad = raw.clone();
        bad[12] = 55;
        assert!(matches!(
            parse_message(&bad),
            Err(ProtocolError::ChecksumMismatch { .. })
        ));
        assert!(matches!(
            parse_message(&[0xF0, 0x7E, 0x7F, 0x06, 0x01, 0xF7]),
            Err(ProtocolError::UnrecognizedMessage(_))
        ));
    }
}
