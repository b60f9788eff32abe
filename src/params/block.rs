//! Block layouts and descriptors.
//!
//! A block is one contiguous region of device memory moved as a single SysEx
//! message. [BlockLayout] describes what is inside a block; [BlockDescriptor]
//! places a layout at a concrete device address.

use std::borrow::Cow;
use std::ops::Range;

use super::parameter::Parameter;
use crate::protocol::address::{Address, DrumPad};
use crate::protocol::codec::NAME_LEN;
use crate::protocol::message::FRAMING_LEN;

/// Static description of a block payload.
#[derive(Debug)]
pub struct BlockLayout {
    /// Layout name, e.g. "Digital Partial".
    pub name: &'static str,
    /// Payload length in bytes.
    pub length: usize,
    /// Parameter tables, concatenated in order.
    pub sections: &'static [&'static [Parameter]],
    /// Whether the first 12 payload bytes hold a name.
    pub named: bool,
    /// Whether nibble-packed values carry the effect bias.
    pub effect_bias: bool,
}

impl BlockLayout {
    /// All parameters in table order.
    pub fn parameters(&self) -> impl Iterator<Item = &'static Parameter> + Clone {
        let sections: &'static [&'static [Parameter]] = self.sections;
        sections.iter().flat_map(|section| section.iter())
    }

    /// Number of parameters.
    pub fn parameter_count(&self) -> usize {
        self.sections.iter().map(|s| s.len()).sum()
    }

    /// Index and definition of the parameter starting at `offset`.
    pub fn parameter_at(&self, offset: usize) -> Option<(usize, &'static Parameter)> {
        self.parameters()
            .enumerate()
            .find(|(_, p)| p.offset == offset)
    }

    /// Index and definition of the parameter called `name`.
    pub fn parameter_named(&self, name: &str) -> Option<(usize, &'static Parameter)> {
        self.parameters()
            .enumerate()
            .find(|(_, p)| p.name.eq_ignore_ascii_case(name))
    }

    /// Exact number of bytes a dump of this block occupies on the wire.
    pub fn wire_length(&self) -> usize {
        self.length + FRAMING_LEN
    }

    /// Payload range of the name field, if any.
    pub fn name_range(&self) -> Option<Range<usize>> {
        self.named.then_some(0..NAME_LEN)
    }
}

/// A layout placed at a device address.
#[derive(Debug, Clone)]
pub struct BlockDescriptor {
    /// Human-readable label, e.g. "Partial 2" or "Pad 17".
    pub label: Cow<'static, str>,
    /// Base address of the payload.
    pub address: Address,
    /// What the payload contains.
    pub layout: &'static BlockLayout,
    /// Set for drum-kit pad blocks.
    pub pad: Option<DrumPad>,
}

impl BlockDescriptor {
    /// Creates a descriptor for a fixed block.
    pub fn new(label: &'static str, address: Address, layout: &'static BlockLayout) -> Self {
        Self {
            label: Cow::Borrowed(label),
            address,
            layout,
            pad: None,
        }
    }

    /// Creates the descriptor for one pad of a drum kit whose kit area
    /// starts at `kit`.
    pub fn drum_pad(kit: Address, pad: DrumPad, layout: &'static BlockLayout) -> Self {
        let [a, b, _, _] = kit.bytes();
        let (lo, _) = pad.registers();
        Self {
            label: Cow::Owned(format!("Pad {}", pad.index())),
            address: Address::new(a, b, lo, 0x00),
            layout,
            pad: Some(pad),
        }
    }

    /// Payload length in bytes.
    pub fn length(&self) -> usize {
        self.layout.length
    }

    /// Exact number of bytes a dump of this block occupies on the wire.
    pub fn expected_length(&self) -> usize {
        self.layout.wire_length()
    }

    /// Device address of the payload byte at `offset`.
    pub fn address_of(&self, offset: usize) -> Address {
        match self.pad {
            Some(pad) => {
                let [a, b, _, _] = self.address.bytes();
                let (register, low) = pad.locate(offset);
                Address::new(a, b, register, low)
            }
            None => self.address.offset(offset),
        }
    }

    /// Payload offset of `address` within this block, if it falls inside.
    pub fn offset_of(&self, address: Address) -> Option<usize> {
        let offset = match self.pad {
            Some(pad) => {
                let [a, b, register, low] = address.bytes();
                let [base_a, base_b, _, _] = self.address.bytes();
                if (a, b) != (base_a, base_b) {
                    return None;
                }
                let (found, offset) = DrumPad::resolve(register, low)?;
                if found != pad {
                    return None;
                }
                offset
            }
            None => address.distance_from(self.address)?,
        };
        (offset < self.length()).then_some(offset)
    }
}
