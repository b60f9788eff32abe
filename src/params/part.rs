//! Synthesizer parts and their fixed block lists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::block::{BlockDescriptor, BlockLayout};
use super::maps::{analog, digital, drums, program};
use crate::protocol::address::{Address, DrumPad};

/// Temporary tone area of digital synth part 1.
pub const DIGITAL_1_BASE: Address = Address::new(0x19, 0x01, 0x00, 0x00);
/// Temporary tone area of digital synth part 2.
pub const DIGITAL_2_BASE: Address = Address::new(0x19, 0x21, 0x00, 0x00);
/// Temporary tone area of the analog synth part.
pub const ANALOG_BASE: Address = Address::new(0x19, 0x42, 0x00, 0x00);
/// Temporary tone area of the drum kit.
pub const DRUMS_BASE: Address = Address::new(0x19, 0x70, 0x00, 0x00);
/// Temporary program area.
pub const PROGRAM_BASE: Address = Address::new(0x18, 0x00, 0x00, 0x00);

/// One independently editable part of the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartKind {
    /// Digital synth part 1.
    Digital1,
    /// Digital synth part 2.
    Digital2,
    /// Analog synth part.
    Analog,
    /// Drum kit.
    Drums,
    /// Program arpeggio.
    Arpeggio,
    /// Program vocal effects.
    VocalEffects,
    /// Program effect slots: Effect 1, Effect 2, Delay, Reverb.
    Effects,
}

impl PartKind {
    /// Every part, in a stable order.
    pub const ALL: [PartKind; 7] = [
        PartKind::Digital1,
        PartKind::Digital2,
        PartKind::Analog,
        PartKind::Drums,
        PartKind::Arpeggio,
        PartKind::VocalEffects,
        PartKind::Effects,
    ];

    /// The part's blocks in transfer order. The order never changes.
    pub fn blocks(&self) -> Vec<BlockDescriptor> {
        match self {
            PartKind::Digital1 => digital_blocks(DIGITAL_1_BASE),
            PartKind::Digital2 => digital_blocks(DIGITAL_2_BASE),
            PartKind::Analog => vec![BlockDescriptor::new("Analog Tone", ANALOG_BASE, &analog::ANALOG)],
            PartKind::Drums => {
                let mut blocks = vec![BlockDescriptor::new(
                    "Kit Common",
                    DRUMS_BASE,
                    &drums::DRUM_COMMON_LAYOUT,
                )];
                blocks.extend(
                    DrumPad::all()
                        .map(|pad| BlockDescriptor::drum_pad(DRUMS_BASE, pad, &drums::DRUM_PAD_LAYOUT)),
                );
                blocks
            }
            PartKind::Arpeggio => vec![program_block("Arpeggio", 0x40, &program::ARPEGGIO_LAYOUT)],
            PartKind::VocalEffects => vec![program_block(
                "Vocal Effects",
                0x01,
                &program::VOCAL_EFFECTS_LAYOUT,
            )],
            PartKind::Effects => vec![
                program_block("Effect 1", 0x02, &program::EFFECT_1_LAYOUT),
                program_block("Effect 2", 0x04, &program::EFFECT_2_LAYOUT),
                program_block("Delay", 0x06, &program::DELAY_LAYOUT),
                program_block("Reverb", 0x08, &program::REVERB_LAYOUT),
            ],
        }
    }

    /// Display name used for init tones and logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            PartKind::Digital1 => "Digital Synth 1",
            PartKind::Digital2 => "Digital Synth 2",
            PartKind::Analog => "Analog Synth",
            PartKind::Drums => "Drum Kit",
            PartKind::Arpeggio => "Arpeggio",
            PartKind::VocalEffects => "Vocal Effects",
            PartKind::Effects => "Effects",
        }
    }

    /// Finds the part and block index whose payload contains `address`.
    pub fn locate(address: Address) -> Option<(PartKind, usize, usize)> {
        PartKind::ALL.iter().find_map(|&part| {
            part.blocks()
                .iter()
                .enumerate()
                .find_map(|(index, block)| block.offset_of(address).map(|offset| (part, index, offset)))
        })
    }

    /// Finds the part whose block list starts at `address`.
    pub fn starting_at(address: Address) -> Option<PartKind> {
        PartKind::ALL
            .iter()
            .copied()
            .find(|part| part.blocks().first().map(|b| b.address) == Some(address))
    }
}

fn digital_blocks(base: Address) -> Vec<BlockDescriptor> {
    let [a, b, _, _] = base.bytes();
    let at = |c| Address::new(a, b, c, 0x00);
    vec![
        BlockDescriptor::new("Common", at(0x00), &digital::DIGITAL_COMMON_LAYOUT),
        BlockDescriptor::new("Modify", at(0x50), &digital::DIGITAL_MODIFY_LAYOUT),
        BlockDescriptor::new("Partial 1", at(0x20), &digital::DIGITAL_PARTIAL_LAYOUT),
        BlockDescriptor::new("Partial 2", at(0x21), &digital::DIGITAL_PARTIAL_LAYOUT),
        BlockDescriptor::new("Partial 3", at(0x22), &digital::DIGITAL_PARTIAL_LAYOUT),
    ]
}

fn program_block(label: &'static str, register: u8, layout: &'static BlockLayout) -> BlockDescriptor {
    let [a, b, _, _] = PROGRAM_BASE.bytes();
    BlockDescriptor::new(label, Address::new(a, b, register, 0x00), layout)
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            PartKind::Digital1 => "digital1",
            PartKind::Digital2 => "digital2",
            PartKind::Analog => "analog",
            PartKind::Drums => "drums",
            PartKind::Arpeggio => "arpeggio",
            PartKind::VocalEffects => "vocal-effects",
            PartKind::Effects => "effects",
        };
        f.write_str(id)
    }
}

impl FromStr for PartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartKind::ALL
            .iter()
            .copied()
            .find(|part| part.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<String> = PartKind::ALL.iter().map(|p| p.to_string()).collect();
                format!("unknown part '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_counts() {
        assert_eq!(PartKind::Digital1.blocks().len(), 5);
        assert_eq!(PartKind::Analog.blocks().len(), 1);
        assert_eq!(PartKind::Drums.blocks().len(), 39);
        assert_eq!(PartKind::Effects.blocks().len(), 4);
    }

    #[test]
    fn test_expected_lengths() {
        let analog = &PartKind::Analog.blocks()[0];
        assert_eq!(analog.expected_length(), 0x40 + 14);

        let drums = PartKind::Drums.blocks();
        assert_eq!(drums[1].expected_length(), 195 + 14);
        assert_eq!(drums[1].address, Address::new(0x19, 0x70, 0x2E, 0x00));
        assert_eq!(drums[38].address, Address::new(0x19, 0x70, 0x78, 0x00));
    }

    #[test]
    fn test_block_addresses_are_distinct() {
        let mut seen = Vec::new();
        for part in PartKind::ALL {
            for block in part.blocks() {
                assert!(!seen.contains(&block.address), "{} {}", part, block.label);
                seen.push(block.address);
            }
        }
    }

    #[test]
    fn test_locate() {
        assert_eq!(
            PartKind::locate(Address::new(0x19, 0x21, 0x21, 0x0C)),
            Some((PartKind::Digital2, 3, 0x0C))
        );
        assert_eq!(
            PartKind::locate(Address::new(0x19, 0x70, 0x2F, 0x10)),
            Some((PartKind::Drums, 1, 128 + 0x10))
        );
        assert_eq!(
            PartKind::locate(Address::new(0x18, 0x00, 0x03, 0x00)),
            Some((PartKind::Effects, 0, 128))
        );
        assert_eq!(PartKind::locate(Address::new(0x01, 0x00, 0x00, 0x00)), None);
    }

    #[test]
    fn test_starting_at() {
        assert_eq!(PartKind::starting_at(ANALOG_BASE), Some(PartKind::Analog));
        assert_eq!(
            PartKind::starting_at(Address::new(0x18, 0x00, 0x02, 0x00)),
            Some(PartKind::Effects)
        );
        assert_eq!(PartKind::starting_at(Address::new(0x19, 0x01, 0x20, 0x00)), None);
    }

    #[test]
    fn test_parse_part() {
        assert_eq!("analog".parse::<PartKind>(), Ok(PartKind::Analog));
        assert_eq!("Vocal-Effects".parse::<PartKind>(), Ok(PartKind::VocalEffects));
        assert!("piano".parse::<PartKind>().is_err());
    }
}
