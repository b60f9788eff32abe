//! Decoded values of one block.

use crate::error::ProtocolError;
use crate::params::BlockLayout;
use crate::protocol::codec::{self, Encoded, NAME_LEN};

/// Name field of a freshly initialised tone.
pub const INIT_NAME_FIELD: [u8; NAME_LEN] = *b"Init Tone   ";

/// Semantic values of one block, indexed like its layout's parameters.
///
/// Alongside the values the block keeps its payload image, so bytes that no
/// parameter covers survive a receive/send round trip unchanged. The image
/// is kept in step with every successful edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockValues {
    values: Vec<i32>,
    name: Option<String>,
    image: Vec<u8>,
}

impl BlockValues {
    /// Every parameter at its default; named blocks read "Init Tone".
    pub fn init(layout: &BlockLayout) -> Self {
        let mut image = vec![0u8; layout.length];
        if let Some(range) = layout.name_range() {
            image[range].copy_from_slice(&INIT_NAME_FIELD);
        }
        for param in layout.parameters() {
            if let Some(encoded) = codec::encode(param.encoding, param.default, layout.effect_bias) {
                image[param.span()].copy_from_slice(encoded.as_bytes());
            }
        }
        Self::from_payload(layout, &image)
    }

    /// Decodes a payload. Decoding is total: short payloads are zero
    /// extended and every byte value decodes to something.
    pub fn from_payload(layout: &BlockLayout, payload: &[u8]) -> Self {
        let mut image = payload.to_vec();
        image.resize(layout.length, 0);

        let values = layout
            .parameters()
            .map(|param| param.decode(&image, layout.effect_bias))
            .collect();
        let name = layout
            .name_range()
            .map(|range| codec::decode_name(&image[range]).trim_end().to_string());

        Self {
            values,
            name,
            image,
        }
    }

    /// All values in parameter order.
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// Value of the parameter at `index`.
    pub fn get(&self, index: usize) -> Option<i32> {
        self.values.get(index).copied()
    }

    /// Name, for blocks that carry one. Trailing spaces are trimmed.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Encodes and stores `value` for the parameter at `index`. Returns the
    /// encoding so callers can forward it to the device.
    pub fn set(
        &mut self,
        layout: &BlockLayout,
        index: usize,
        value: i32,
    ) -> Result<Encoded, ProtocolError> {
        let param = layout
            .parameters()
            .nth(index)
            .ok_or(ProtocolError::UnknownParameter {
                block: 0,
                offset: index,
            })?;
        let encoded = param.encode(value, layout.effect_bias)?;
        self.image[param.span()].copy_from_slice(encoded.as_bytes());
        self.values[index] = value;
        Ok(encoded)
    }

    /// Replaces the name. Fails on layouts without a name field.
    pub fn set_name(&mut self, layout: &BlockLayout, name: &str) -> Result<(), ProtocolError> {
        let range = layout.name_range().ok_or(ProtocolError::UnknownParameter {
            block: 0,
            offset: 0,
        })?;
        let field = codec::encode_name(name)?;
        self.image[range].copy_from_slice(&field);
        self.name = Some(name.trim_end().to_string());
        Ok(())
    }

    /// Writes raw device bytes at `offset`, as an inbound DT1 message would.
    ///
    /// The block is left untouched unless every parameter the bytes touch
    /// decodes to a legal value. Returns the number of parameters touched.
    pub fn apply_bytes(
        &mut self,
        layout: &BlockLayout,
        offset: usize,
        data: &[u8],
    ) -> Result<usize, ProtocolError> {
        let end = offset + data.len();
        if end > layout.length {
            return Err(ProtocolError::LengthMismatch {
                expected: layout.length.saturating_sub(offset),
                observed: data.len(),
            });
        }

        let mut image = self.image.clone();
        image[offset..end].copy_from_slice(data);
        let updated = Self::from_payload(layout, &image);

        let mut touched = 0;
        for (param, &value) in layout.parameters().zip(updated.values()) {
            let span = param.span();
            if span.start < end && offset < span.end {
                if !param.is_legal(value) {
                    return Err(ProtocolError::OutOfRange {
                        parameter: param.name,
                        value,
                        min: param.min,
                        max: param.max,
                    });
                }
                touched += 1;
            }
        }

        *self = updated;
        Ok(touched)
    }

    /// Builds the wire payload from the current values.
    pub fn to_payload(&self, layout: &BlockLayout) -> Result<Vec<u8>, ProtocolError> {
        let mut payload = self.image.clone();
        payload.resize(layout.length, 0);

        if let (Some(range), Some(name)) = (layout.name_range(), self.name.as_deref()) {
            payload[range].copy_from_slice(&codec::encode_name(name)?);
        }
        for (param, &value) in layout.parameters().zip(&self.values) {
            let encoded = param.encode(value, layout.effect_bias)?;
            payload[param.span()].copy_from_slice(encoded.as_bytes());
        }
        Ok(payload)
    }
}
