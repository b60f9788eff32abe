//! Patch model
//!
//! A [Patch] is the in-memory image of one part: its blocks in fixed order,
//! a modified flag and where it came from. Edits go through the parameter
//! map, so an illegal value never reaches the stored state or the wire.

mod values;

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use values::{BlockValues, INIT_NAME_FIELD};

use crate::engine::TransferSequencer;
use crate::error::ProtocolError;
use crate::params::{labels, BlockDescriptor, Parameter, PartKind};
use crate::protocol::message::{Composer, EOX};
use crate::protocol::validate::{peek_address, validate, ParsedMessage};

/// Where a patch came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchIdentity {
    /// File the patch was loaded from or last saved to.
    pub file: Option<PathBuf>,
    /// Preset slot on the device, if known.
    pub slot: Option<String>,
}

/// Reference to one parameter of a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamRef {
    /// Block index in the part's fixed block order.
    pub block: usize,
    /// Payload offset of the parameter within the block.
    pub offset: usize,
}

impl ParamRef {
    /// Creates a reference.
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// One part's tone data.
#[derive(Debug, Clone)]
pub struct Patch {
    part: PartKind,
    blocks: Vec<BlockDescriptor>,
    values: Vec<BlockValues>,
    modified: bool,
    identity: PatchIdentity,
    /// Live link for real-time parameter changes.
    link: Option<Arc<TransferSequencer>>,
}

impl Patch {
    /// The init tone of `part`: every parameter at its default.
    pub fn init(part: PartKind) -> Self {
        let blocks = part.blocks();
        let values = blocks.iter().map(|b| BlockValues::init(b.layout)).collect();
        Self {
            part,
            blocks,
            values,
            modified: false,
            identity: PatchIdentity::default(),
            link: None,
        }
    }

    /// Assembles a patch from already decoded blocks, one per block of
    /// `part` and in its order.
    pub fn from_blocks(part: PartKind, values: Vec<BlockValues>) -> Result<Self, ProtocolError> {
        let blocks = part.blocks();
        if values.len() != blocks.len() {
            return Err(ProtocolError::UnrecognizedMessage(format!(
                "{} has {} blocks, got {}",
                part.display_name(),
                blocks.len(),
                values.len()
            )));
        }
        Ok(Self {
            part,
            blocks,
            values,
            modified: false,
            identity: PatchIdentity::default(),
            link: None,
        })
    }

    /// Decodes a stream of concatenated block dumps, such as a `.syx` file.
    ///
    /// The part is identified by the address of the first dump; every block
    /// of that part must follow, in order, and validate.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let messages: Vec<&[u8]> = bytes
            .split_inclusive(|&b| b == EOX)
            .filter(|m| !m.is_empty())
            .collect();
        let first = messages
            .first()
            .ok_or_else(|| ProtocolError::UnrecognizedMessage("no SysEx data".into()))?;
        let address = peek_address(first)
            .ok_or_else(|| ProtocolError::UnrecognizedMessage("not a JD-Xi dump".into()))?;
        let part = PartKind::starting_at(address).ok_or_else(|| {
            ProtocolError::UnrecognizedMessage(format!("no part starts at {}", address))
        })?;

        let blocks = part.blocks();
        if messages.len() != blocks.len() {
            return Err(ProtocolError::UnrecognizedMessage(format!(
                "{} has {} blocks, found {} messages",
                part.display_name(),
                blocks.len(),
                messages.len()
            )));
        }

        let mut values = Vec::with_capacity(blocks.len());
        for (raw, block) in messages.iter().zip(&blocks) {
            let payload = validate(raw, block).map_err(|e| {
                warn!(block = %block.label, error = %e, "rejecting dump");
                e
            })?;
            values.push(BlockValues::from_payload(block.layout, payload));
        }
        Self::from_blocks(part, values)
    }

    /// Encodes every block as a DT1 dump, concatenated in block order.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        let composer = self.composer();
        let mut bytes = Vec::new();
        for (block, values) in self.blocks.iter().zip(&self.values) {
            bytes.extend(composer.compose_block_dump(block, values)?);
        }
        Ok(bytes)
    }

    /// Composer for this patch's device, or the default device.
    pub fn composer(&self) -> Composer {
        self.link
            .as_ref()
            .and_then(|link| link.device_id())
            .map(Composer::new)
            .unwrap_or_default()
    }

    /// The part this patch belongs to.
    pub fn part(&self) -> PartKind {
        self.part
    }

    /// Block descriptors in transfer order.
    pub fn blocks(&self) -> &[BlockDescriptor] {
        &self.blocks
    }

    /// Values of the block at `index`.
    pub fn block_values(&self, index: usize) -> Option<&BlockValues> {
        self.values.get(index)
    }

    /// Blocks paired with their values.
    pub fn iter(&self) -> impl Iterator<Item = (&BlockDescriptor, &BlockValues)> {
        self.blocks.iter().zip(&self.values)
    }

    /// Tone name: the name of the first named block.
    pub fn name(&self) -> Option<&str> {
        self.values.iter().find_map(|v| v.name())
    }

    /// True if edited since the last full send or receive.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clears the modified flag after a complete transfer.
    pub fn mark_synced(&mut self) {
        self.modified = false;
    }

    /// Where the patch came from.
    pub fn identity(&self) -> &PatchIdentity {
        &self.identity
    }

    /// Records where the patch came from.
    pub fn set_identity(&mut self, identity: PatchIdentity) {
        self.identity = identity;
    }

    /// Routes future edits to `link` as real-time parameter changes.
    pub fn attach_link(&mut self, link: Arc<TransferSequencer>) {
        self.link = Some(link);
    }

    /// Stops sending edits.
    pub fn detach_link(&mut self) {
        self.link = None;
    }

    /// Finds a parameter by block label and parameter name.
    pub fn find(&self, block_label: &str, name: &str) -> Option<ParamRef> {
        let block = self
            .blocks
            .iter()
            .position(|b| b.label.eq_ignore_ascii_case(block_label))?;
        let (_, param) = self.blocks[block].layout.parameter_named(name)?;
        Some(ParamRef::new(block, param.offset))
    }

    /// Resolves a reference to its block, parameter index and definition.
    pub fn parameter(
        &self,
        param: ParamRef,
    ) -> Result<(&BlockDescriptor, usize, &'static Parameter), ProtocolError> {
        let unknown = || ProtocolError::UnknownParameter {
            block: param.block,
            offset: param.offset,
        };
        let block = self.blocks.get(param.block).ok_or_else(unknown)?;
        let (index, definition) = block.layout.parameter_at(param.offset).ok_or_else(unknown)?;
        Ok((block, index, definition))
    }

    /// Current value of a parameter.
    pub fn get(&self, param: ParamRef) -> Result<i32, ProtocolError> {
        let (_, index, _) = self.parameter(param)?;
        Ok(self.values[param.block].values()[index])
    }

    /// Display label of a parameter's current value, if enumerated.
    pub fn label(&self, param: ParamRef) -> Option<&'static str> {
        let (block, index, definition) = self.parameter(param).ok()?;
        let value = self.values[param.block].get(index)?;
        labels::label(block.layout, definition, value)
    }

    /// Sets a parameter and marks the patch modified.
    ///
    /// With a live link attached the change is also sent as a real-time
    /// parameter message. Values outside the legal range are refused before
    /// anything is stored or sent.
    pub fn set(&mut self, param: ParamRef, value: i32) -> Result<(), ProtocolError> {
        let (block, index, definition) = self.parameter(param)?;
        let layout = block.layout;
        let address = block.address_of(definition.offset);

        let encoded = self.values[param.block].set(layout, index, value)?;
        self.modified = true;

        let Some(link) = &self.link else {
            return Ok(());
        };
        match link.send_parameter(address, encoded.raw(), definition.width()) {
            Err(ProtocolError::LinkUnavailable) => {
                debug!(parameter = definition.name, "no live link, edit kept locally");
                Ok(())
            }
            result => result,
        }
    }

    /// Renames the block at `block`.
    pub fn set_name(&mut self, block: usize, name: &str) -> Result<(), ProtocolError> {
        let descriptor = self.blocks.get(block).ok_or(ProtocolError::UnknownParameter {
            block,
            offset: 0,
        })?;
        let layout = descriptor.layout;
        self.values[block]
            .set_name(layout, name)
            .map_err(|e| match e {
                ProtocolError::UnknownParameter { .. } => {
                    ProtocolError::UnknownParameter { block, offset: 0 }
                }
                other => other,
            })?;
        self.modified = true;
        Ok(())
    }

    /// Applies an unsolicited DT1 message from the device.
    ///
    /// Returns `Ok(false)` if the message addresses none of this patch's
    /// blocks.
    pub fn apply_message(&mut self, message: &ParsedMessage<'_>) -> Result<bool, ProtocolError> {
        let Some((index, offset)) = self
            .blocks
            .iter()
            .enumerate()
            .find_map(|(i, b)| b.offset_of(message.address).map(|offset| (i, offset)))
        else {
            return Ok(false);
        };

        let layout = self.blocks[index].layout;
        let touched = self.values[index].apply_bytes(layout, offset, message.data)?;
        debug!(
            block = %self.blocks[index].label,
            offset,
            touched,
            "applied inbound message"
        );
        self.modified = true;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::address::Address;
    use crate::protocol::checksum::checksum;
    use crate::protocol::validate::parse_message;

    #[test]
    fn test_init_patch_is_clean() {
        let patch = Patch::init(PartKind::Digital1);
        assert_eq!(patch.blocks().len(), 5);
        assert!(!patch.is_modified());
        assert_eq!(patch.name(), Some("Init Tone"));
    }

    #[test]
    fn test_set_marks_modified() {
        let mut patch = Patch::init(PartKind::Analog);
        let cutoff = patch.find("Analog Tone", "Filter Cutoff").unwrap();
        patch.set(cutoff, 64).unwrap();
        assert_eq!(patch.get(cutoff).unwrap(), 64);
        assert!(patch.is_modified());
        patch.mark_synced();
        assert!(!patch.is_modified());
    }

    #[test]
    fn test_set_out_of_range_leaves_patch_clean() {
        let mut patch = Patch::init(PartKind::Analog);
        let pitch = patch.find("Analog Tone", "OSC Pitch Coarse").unwrap();
        assert!(matches!(
            patch.set(pitch, 30),
            Err(ProtocolError::OutOfRange { value: 30, .. })
        ));
        assert_eq!(patch.get(pitch).unwrap(), 0);
        assert!(!patch.is_modified());
    }

    #[test]
    fn test_unknown_parameter() {
        let mut patch = Patch::init(PartKind::Analog);
        let reserved = ParamRef::new(0, 0x3E);
        assert!(matches!(
            patch.get(reserved),
            Err(ProtocolError::UnknownParameter { block: 0, offset: 0x3E })
        ));
        assert!(patch.set(ParamRef::new(9, 0x10), 1).is_err());
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut patch = Patch::init(PartKind::Drums);
        let level = patch.find("Pad 38", "Relative Level").unwrap();
        patch.set(level, -20).unwrap();
        patch.set_name(0, "My Kit").unwrap();

        let bytes = patch.to_bytes().unwrap();
        let loaded = Patch::from_bytes(&bytes).unwrap();
        assert_eq!(loaded.part(), PartKind::Drums);
        assert_eq!(loaded.get(level).unwrap(), -20);
        assert_eq!(loaded.name(), Some("My Kit"));
        assert!(!loaded.is_modified());
    }

    #[test]
    fn test_from_bytes_rejects_corrupt_block() {
        let patch = Patch::init(PartKind::Effects);
        let mut bytes = patch.to_bytes().unwrap();
        // Flip a reserved byte of the first block.
        bytes[12 + 0x06] ^= 0x01;
        assert!(matches!(
            Patch::from_bytes(&bytes),
            Err(ProtocolError::ChecksumMismatch { .. })
        ));

        let bytes = patch.to_bytes().unwrap();
        let missing_last = &bytes[..bytes.len() - 113];
        assert!(matches!(
            Patch::from_bytes(missing_last),
            Err(ProtocolError::UnrecognizedMessage(_))
        ));
        assert!(Patch::from_bytes(&[]).is_err());
    }

    #[test]
    fn test_from_bytes_rejects_unencodable_wide_value() {
        let patch = Patch::init(PartKind::Digital1);
        let mut bytes = patch.to_bytes().unwrap();
        let start: usize = patch.blocks()[..2].iter().map(|b| b.expected_length()).sum();
        let end = start + patch.blocks()[2].expected_length();
        let at = start + 12 + 0x35;
        bytes[at..at + 4].copy_from_slice(&[0x0F; 4]);
        bytes[end - 2] = checksum(&bytes[start + 8..end - 2]);

        assert!(matches!(
            Patch::from_bytes(&bytes),
            Err(ProtocolError::StructuralMismatch { .. })
        ));
    }

    #[test]
    fn test_apply_unsolicited_message() {
        let mut patch = Patch::init(PartKind::Drums);
        // Pad 1, offset 150 lives in the HI register.
        let raw = Composer::default()
            .compose_parameter_change(Address::new(0x19, 0x70, 0x2F, 150 - 128), 64 + 5, 1)
            .unwrap();
        let message = parse_message(&raw).unwrap();
        assert!(patch.apply_message(&message).unwrap());
        let sens = patch.find("Pad 1", "Pitch Env Velocity Sens").unwrap();
        assert_eq!(patch.get(sens).unwrap(), 5);
        assert!(patch.is_modified());

        let other = Composer::default()
            .compose_parameter_change(Address::new(0x19, 0x42, 0x00, 0x21), 10, 1)
            .unwrap();
        assert!(!patch.apply_message(&parse_message(&other).unwrap()).unwrap());
    }
}
