//! Device addresses.
//!
//! JD-Xi parameter memory is addressed with four 7-bit digits, most
//! significant first. A block's payload is laid out linearly from its base
//! address, so payload offset 128 lands on the next register.

use std::fmt;

/// A 4-byte device address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 4]);

impl Address {
    /// Creates an address from its four digits.
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self([a, b, c, d])
    }

    /// The four address bytes as sent on the wire.
    pub fn bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Adds a linear payload offset, carrying between 7-bit digits.
    pub fn offset(self, offset: usize) -> Self {
        let value = self.to_linear() + offset as u32;
        Self::from_linear(value)
    }

    /// Interprets the address as one 28-bit number.
    pub fn to_linear(self) -> u32 {
        self.0
            .iter()
            .fold(0u32, |acc, &digit| (acc << 7) | (digit & 0x7F) as u32)
    }

    /// Inverse of [Address::to_linear]. Bits above 28 are dropped.
    pub fn from_linear(value: u32) -> Self {
        Self([
            ((value >> 21) & 0x7F) as u8,
            ((value >> 14) & 0x7F) as u8,
            ((value >> 7) & 0x7F) as u8,
            (value & 0x7F) as u8,
        ])
    }

    /// Linear distance from `base` to this address, if this address is not
    /// below it.
    pub fn distance_from(self, base: Address) -> Option<usize> {
        self.to_linear()
            .checked_sub(base.to_linear())
            .map(|d| d as usize)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{:02X} {:02X} {:02X} {:02X}", a, b, c, d)
    }
}

/// Encodes a byte count as the 4-digit 7-bit size field of a request.
pub fn size_field(len: usize) -> [u8; 4] {
    Address::from_linear(len as u32).bytes()
}

/// Number of pads in a drum kit.
pub const DRUM_PAD_COUNT: u8 = 38;

/// Register below the first pad; pad `n` starts at `base + 2n`.
pub const DRUM_PAD_BASE_REGISTER: u8 = 0x2C;

/// One pad of the drum kit, numbered 1..=38.
///
/// A pad's payload is wider than one register, so each pad owns a pair of
/// consecutive registers. Both the encode and decode paths derive the
/// register from the pad index and payload offset; nothing is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrumPad(u8);

impl DrumPad {
    /// Returns the pad with the given 1-based index, if it exists.
    pub fn new(index: u8) -> Option<Self> {
        (1..=DRUM_PAD_COUNT).contains(&index).then_some(Self(index))
    }

    /// All pads in kit order.
    pub fn all() -> impl Iterator<Item = DrumPad> {
        (1..=DRUM_PAD_COUNT).map(DrumPad)
    }

    /// 1-based pad index.
    pub fn index(&self) -> u8 {
        self.0
    }

    /// The (LO, HI) register pair.
    pub fn registers(&self) -> (u8, u8) {
        let lo = DRUM_PAD_BASE_REGISTER + 2 * self.0;
        (lo, lo + 1)
    }

    /// Maps a payload offset to the register holding it and the offset
    /// within that register.
    pub fn locate(&self, offset: usize) -> (u8, u8) {
        let (lo, hi) = self.registers();
        if offset >= 128 {
            (hi, (offset - 128) as u8)
        } else {
            (lo, offset as u8)
        }
    }

    /// Inverse of [DrumPad::locate].
    pub fn resolve(register: u8, offset: u8) -> Option<(DrumPad, usize)> {
        if register < DRUM_PAD_BASE_REGISTER + 2 || offset > 0x7F {
            return None;
        }
        let rel = register - DRUM_PAD_BASE_REGISTER;
        let pad = DrumPad::new(rel / 2)?;
        let linear = if rel % 2 == 1 {
            128 + offset as usize
        } else {
            offset as usize
        };
        Some((pad, linear))
    }
}
