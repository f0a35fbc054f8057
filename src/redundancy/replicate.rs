//! Redundancy encoder.

use crate::error::{Error, Result};

/// Concatenate `replicas` verbatim copies of `block`.
///
/// # Example
///
/// ```
/// use arf_codec::redundancy::replicate;
///
/// let artifact = replicate(b"abc", 3).unwrap();
/// assert_eq!(artifact, b"abcabcabc");
/// ```
pub fn replicate(block: &[u8], replicas: usize) -> Result<Vec<u8>> {
    if replicas == 0 {
        return Err(Error::InvalidReplicationFactor {
            replicas,
            length: block.len(),
        });
    }
    Ok(block.repeat(replicas))
}
