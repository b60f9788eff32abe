//! JD-Xi SysEx Library
//!
//! Patch protocol engine for the Roland JD-Xi: parameter maps, the value
//! codec, message composition and validation, and timed transfers over a
//! MIDI link.

pub mod config;
pub mod engine;
pub mod error;
pub mod params;
pub mod patch;
pub mod persistence;
pub mod protocol;

pub use error::{ProtocolError, TransferError, TransportError};
