//! SysEx protocol
//!
//! Byte-level pieces of the JD-Xi protocol: addresses, the value codec, the
//! Roland checksum, outbound message composition and inbound validation.

pub mod address;
pub mod checksum;
pub mod codec;
pub mod message;
pub mod validate;

pub use address::{Address, DrumPad};
pub use codec::{Encoded, Encoding};
pub use message::{Composer, DeviceId};
pub use validate::{decode, parse_message, validate, DecodedBlock, ParsedMessage, StructuralPattern};
