//! JSON patch documents.
//!
//! A document stores a patch by name rather than by address: each block is
//! listed by label with its parameters as name/value pairs. Loading goes
//! through the patch model, so every value is range checked.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::PatchError;
use crate::params::PartKind;
use crate::patch::Patch;

/// Current patch format version.
/// Increment this when making breaking changes to the format.
pub const PATCH_VERSION: u32 = 1;

/// A complete patch as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchDocument {
    /// Human-readable name for the patch.
    pub name: String,
    /// Patch format version for future compatibility.
    pub version: u32,
    /// Part the patch belongs to.
    pub part: PartKind,
    /// Blocks in transfer order.
    pub blocks: Vec<BlockData>,
}

impl PatchDocument {
    /// Captures every parameter of `patch`.
    pub fn from_patch(patch: &Patch) -> Self {
        let blocks = patch
            .iter()
            .map(|(block, values)| BlockData {
                label: block.label.to_string(),
                name: values.name().map(str::to_string),
                parameters: block
                    .layout
                    .parameters()
                    .zip(values.values())
                    .map(|(param, &value)| ParameterValue {
                        name: param.name.to_string(),
                        value,
                    })
                    .collect(),
            })
            .collect();

        Self {
            name: patch.name().unwrap_or("Untitled").to_string(),
            version: PATCH_VERSION,
            part: patch.part(),
            blocks,
        }
    }

    /// Check if this patch version is compatible with the current format.
    pub fn is_compatible(&self) -> bool {
        self.version <= PATCH_VERSION
    }

    /// Rebuilds the patch. Parameters missing from the document keep their
    /// init values; unknown names and illegal values are errors.
    pub fn to_patch(&self) -> Result<Patch, PatchError> {
        let mut patch = Patch::init(self.part);
        for data in &self.blocks {
            let index = patch
                .blocks()
                .iter()
                .position(|b| b.label == data.label.as_str())
                .ok_or_else(|| PatchError::UnknownBlock(data.label.clone()))?;

            if let Some(name) = &data.name {
                patch.set_name(index, name)?;
            }
            for param in &data.parameters {
                let reference = patch.find(&data.label, &param.name).ok_or_else(|| {
                    PatchError::UnknownParameter {
                        block: data.label.clone(),
                        parameter: param.name.clone(),
                    }
                })?;
                patch.set(reference, param.value)?;
            }
        }
        patch.mark_synced();
        Ok(patch)
    }
}

/// Stored values of one block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockData {
    /// Block label, e.g. "Partial 2".
    pub label: String,
    /// Block name, for named blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Parameter values in layout order.
    pub parameters: Vec<ParameterValue>,
}

/// One named parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterValue {
    /// Parameter name as in the parameter map.
    pub name: String,
    /// Semantic value.
    pub value: i32,
}

/// Save a patch document to a JSON file.
pub fn save_to_file(document: &PatchDocument, path: &Path) -> Result<(), PatchError> {
    let json = serde_json::to_string_pretty(document)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a patch document from a JSON file.
pub fn load_from_file(path: &Path) -> Result<PatchDocument, PatchError> {
    let json = std::fs::read_to_string(path)?;
    let document: PatchDocument = serde_json::from_str(&json)?;

    // Version check
    if !document.is_compatible() {
        return Err(PatchError::IncompatibleVersion {
            found: document.version,
            expected: PATCH_VERSION,
        });
    }

    Ok(document)
}
