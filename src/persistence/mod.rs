//! Persistence module
//!
//! Patch save/load. Two formats are supported: `.syx` files holding the raw
//! block dumps exactly as the device sends them, and JSON patch documents.

pub mod patch;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::error::ProtocolError;
use crate::patch::{Patch, PatchIdentity};

pub use patch::{
    load_from_file, save_to_file, BlockData, ParameterValue, PatchDocument, PATCH_VERSION,
};

/// Error type for patch file operations.
#[derive(Debug, Error)]
pub enum PatchError {
    /// File I/O error.
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Incompatible patch version.
    #[error("incompatible patch version: found {found}, expected <= {expected}")]
    IncompatibleVersion {
        /// Version in the file.
        found: u32,
        /// Newest version understood.
        expected: u32,
    },
    /// The document names a block the part does not have.
    #[error("unknown block: {0}")]
    UnknownBlock(String),
    /// The document names a parameter the block does not have.
    #[error("unknown parameter {parameter} in block {block}")]
    UnknownParameter {
        /// Block label.
        block: String,
        /// Parameter name.
        parameter: String,
    },
    /// The patch data itself is invalid.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// On-disk patch format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchFormat {
    /// Concatenated DT1 block dumps.
    SysEx,
    /// [PatchDocument] as JSON.
    Json,
}

impl PatchFormat {
    /// Picks the format from the file extension; anything but `.syx` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("syx") => Self::SysEx,
            _ => Self::Json,
        }
    }
}

/// Writes `patch` in the format implied by `path` and records the file as
/// the patch's identity.
pub fn save_patch(patch: &mut Patch, path: &Path) -> Result<(), PatchError> {
    match PatchFormat::from_path(path) {
        PatchFormat::SysEx => std::fs::write(path, patch.to_bytes()?)?,
        PatchFormat::Json => save_to_file(&PatchDocument::from_patch(patch), path)?,
    }
    debug!(path = %path.display(), part = %patch.part(), "patch saved");
    set_file(patch, path);
    Ok(())
}

/// Reads a patch in the format implied by `path`.
pub fn load_patch(path: &Path) -> Result<Patch, PatchError> {
    let mut patch = match PatchFormat::from_path(path) {
        PatchFormat::SysEx => Patch::from_bytes(&std::fs::read(path)?)?,
        PatchFormat::Json => load_from_file(path)?.to_patch()?,
    };
    debug!(path = %path.display(), part = %patch.part(), "patch loaded");
    set_file(&mut patch, path);
    Ok(patch)
}

fn set_file(patch: &mut Patch, path: &Path) {
    let identity = PatchIdentity {
        file: Some(PathBuf::from(path)),
        ..patch.identity().clone()
    };
    patch.set_identity(identity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PartKind;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("jdxi-sysex-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(PatchFormat::from_path(Path::new("a.syx")), PatchFormat::SysEx);
        assert_eq!(PatchFormat::from_path(Path::new("a.SYX")), PatchFormat::SysEx);
        assert_eq!(PatchFormat::from_path(Path::new("a.json")), PatchFormat::Json);
        assert_eq!(PatchFormat::from_path(Path::new("a")), PatchFormat::Json);
    }

    #[test]
    fn test_syx_file_round_trip() {
        let path = temp_path("round-trip.syx");
        let mut patch = Patch::init(PartKind::Analog);
        let cutoff = patch.find("Analog Tone", "Filter Cutoff").unwrap();
        patch.set(cutoff, 12).unwrap();
        save_patch(&mut patch, &path).unwrap();
        assert_eq!(patch.identity().file.as_deref(), Some(path.as_path()));

        let loaded = load_patch(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.get(cutoff).unwrap(), 12);
        assert_eq!(loaded.identity().file.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_json_file_round_trip() {
        let path = temp_path("round-trip.json");
        let mut patch = Patch::init(PartKind::Arpeggio);
        let key = patch.find("Arpeggio", "Arpeggio Key").unwrap();
        patch.set(key, -1).unwrap();
        save_patch(&mut patch, &path).unwrap();

        let loaded = load_patch(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.part(), PartKind::Arpeggio);
        assert_eq!(loaded.get(key).unwrap(), -1);
    }

    #[test]
    fn test_truncated_syx_is_rejected() {
        let path = temp_path("truncated.syx");
        let bytes = Patch::init(PartKind::Analog).to_bytes().unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 1]).unwrap();
        let result = load_patch(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            result,
            Err(PatchError::Protocol(ProtocolError::LengthMismatch { .. }))
        ));
    }
}
