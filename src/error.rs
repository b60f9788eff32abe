//! Error types
//!
//! Every failure the protocol engine can detect is reported as a typed value.
//! Nothing is silently corrected or downgraded to a default.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while composing, validating or transferring SysEx data.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The byte count does not match the block's expected wire length.
    #[error("length mismatch: expected {expected} bytes, got {observed}")]
    LengthMismatch {
        /// Expected wire length (payload + framing).
        expected: usize,
        /// Length actually observed.
        observed: usize,
    },

    /// A byte lies outside the range its position allows.
    #[error("structural mismatch at byte {offset}: {observed:02X}h not in {min:02X}h..={max:02X}h")]
    StructuralMismatch {
        /// Offset of the offending byte within the whole message.
        offset: usize,
        /// The byte found there.
        observed: u8,
        /// Lowest allowed value.
        min: u8,
        /// Highest allowed value.
        max: u8,
    },

    /// The trailing checksum does not match the recomputed one.
    #[error("checksum mismatch: expected {expected:02X}h, got {observed:02X}h")]
    ChecksumMismatch {
        /// Checksum computed over address and payload.
        expected: u8,
        /// Checksum byte carried by the message.
        observed: u8,
    },

    /// The device did not answer a request in time.
    #[error("no response within {timeout:?}")]
    NoResponse {
        /// How long the sequencer waited.
        timeout: Duration,
    },

    /// No transport is connected.
    #[error("MIDI link unavailable")]
    LinkUnavailable,

    /// A value lies outside the parameter's legal range.
    #[error("{parameter}: value {value} out of range {min}..={max}")]
    OutOfRange {
        /// Parameter name.
        parameter: &'static str,
        /// Rejected value.
        value: i32,
        /// Lowest legal value.
        min: i32,
        /// Highest legal value.
        max: i32,
    },

    /// No parameter lives at the given block/offset.
    #[error("no parameter at block {block}, offset {offset}")]
    UnknownParameter {
        /// Block index within the patch.
        block: usize,
        /// Payload offset within the block.
        offset: usize,
    },

    /// A byte stream does not belong to any known part.
    #[error("unrecognized message: {0}")]
    UnrecognizedMessage(String),

    /// The transport failed to deliver bytes.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A protocol error attributed to one block of a multi-block transfer.
#[derive(Debug, Error)]
#[error("{block}: {source}")]
pub struct TransferError {
    /// Label of the failing block.
    pub block: String,
    /// What went wrong.
    #[source]
    pub source: ProtocolError,
}

impl TransferError {
    /// Attribute `source` to `block`.
    pub fn new(block: impl Into<String>, source: ProtocolError) -> Self {
        Self {
            block: block.into(),
            source,
        }
    }
}

/// Errors from the MIDI transport collaborator.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to initialize the MIDI subsystem.
    #[error("MIDI init error: {0}")]
    Init(String),
    /// Failed to connect to a port.
    #[error("MIDI connection error: {0}")]
    Connection(String),
    /// No port matched the requested name.
    #[error("MIDI port not found: {0}")]
    PortNotFound(String),
    /// Sending bytes failed.
    #[error("MIDI send error: {0}")]
    Send(String),
    /// The link has been closed.
    #[error("MIDI link closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_error_names_block() {
        let err = TransferError::new(
            "Partial 2",
            ProtocolError::ChecksumMismatch {
                expected: 0x12,
                observed: 0x13,
            },
        );
        let msg = err.to_string();
        assert!(msg.starts_with("Partial 2: checksum mismatch"));
        assert!(msg.contains("12h"));
    }

    #[test]
    fn test_transport_error_converts() {
        let err: ProtocolError = TransportError::Closed.into();
        assert!(matches!(err, ProtocolError::Transport(TransportError::Closed)));
    }
}
