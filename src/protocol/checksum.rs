//! Roland checksum.
//!
//! Computed over the address and payload bytes only. The device has no other
//! integrity check, so composer and validator share this one function.

/// `(128 - (sum mod 128)) mod 128` over `bytes`.
pub fn checksum<'a>(bytes: impl IntoIterator<Item = &'a u8>) -> u8 {
    let sum = bytes
        .into_iter()
        .fold(0u32, |acc, &b| acc + (b & 0x7F) as u32);
    ((128 - sum % 128) % 128) as u8
}

/// Returns true if address, payload and trailing checksum sum to zero
/// modulo 128.
pub fn is_valid(data_including_checksum: &[u8]) -> bool {
    data_including_checksum
        .iter()
        .fold(0u32, |acc, &b| acc + (b & 0x7F) as u32)
        % 128
        == 0
}
