//! CRC32 detection-only integrity tag.

use crate::config::CRC_LEN;
use crate::error::{Error, Result};

/// Append the big-endian CRC32 of `block` to `block`.
pub fn protect(block: &[u8]) -> Vec<u8> {
    let crc = crc32fast::hash(block);
    let mut protected = Vec::with_capacity(block.len() + CRC_LEN);
    protected.extend_from_slice(block);
    protected.extend_from_slice(&crc.to_be_bytes());
    protected
}

/// Split the tag off `candidate` and check it.
///
/// Returns the payload and `true` when the tag does NOT match. A mismatch
/// cannot be repaired here: the payload is handed back unchanged and the
/// caller decides whether to attempt decompression anyway.
pub fn verify(candidate: &[u8]) -> Result<(&[u8], bool)> {
    if candidate.len() < CRC_LEN {
        return Err(Error::TruncatedBlock {
            len: candidate.len(),
            min: CRC_LEN,
        });
    }

    let (payload, tag) = candidate.split_at(candidate.len() - CRC_LEN);
    let mut stored = [0u8; CRC_LEN];
    stored.copy_from_slice(tag);

    let mismatch = crc32fast::hash(payload) != u32::from_be_bytes(stored);
    Ok((payload, mismatch))
}
