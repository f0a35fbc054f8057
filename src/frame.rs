//! Self-describing frame header for artifacts.
//!
//! A framed artifact is `[header x 5][raw artifact]`. The header copies are
//! recovered with the same majority vote as the body, then checked against
//! their own CRC32.

use crate::config::{CodecConfig, Strategy, FRAME_HEADER_COPIES, FRAME_MAGIC, FRAME_VERSION};
use crate::error::{Error, Result};
use crate::redundancy::{reconstruct, replicate};
use serde::{Deserialize, Serialize};

/// Serialized size of one header copy.
pub const HEADER_LEN: usize = 26;

/// Bytes covered by the header checksum (everything before it).
const CHECKSUMMED_LEN: usize = HEADER_LEN - 4;

/// Frame header describing how the body was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHeader {
    /// Magic number for identification.
    pub magic: [u8; 4],
    /// Frame version.
    pub version: u32,
    /// Strategy tag, see [`Strategy::tag`].
    pub strategy: u8,
    /// Reed-Solomon parity symbols per codeword, zero for CRC32.
    pub parity_symbols: u8,
    /// Replication factor of the body.
    pub replicas: u32,
    /// Length of one protected block.
    pub block_len: u64,
    /// CRC32 of the fields above.
    pub checksum: u32,
}

impl FrameHeader {
    /// Create a header for a body of `replicas` copies of a `block_len`-byte block.
    pub fn new(config: &CodecConfig, block_len: usize) -> Result<Self> {
        let replicas = u32::try_from(config.replicas)
            .map_err(|_| Error::InvalidConfig("Replication factor does not fit in 32 bits".to_string()))?;
        Ok(Self {
            magic: FRAME_MAGIC,
            version: FRAME_VERSION,
            strategy: config.strategy.tag(),
            parity_symbols: config.strategy.parity_symbols(),
            replicas,
            block_len: block_len as u64,
            checksum: 0,
        })
    }

    /// Integrity strategy recorded in the header.
    pub fn strategy(&self) -> Result<Strategy> {
        Strategy::from_tag(self.strategy, self.parity_symbols)
    }

    /// Decoding configuration recorded in the header.
    pub fn codec_config(&self) -> Result<CodecConfig> {
        let config = CodecConfig {
            strategy: self.strategy()?,
            replicas: self.replicas as usize,
            framed: true,
        };
        config.validate()?;
        Ok(config)
    }

    /// Length of the body this header describes.
    pub fn body_len(&self) -> Option<usize> {
        usize::try_from(self.block_len)
            .ok()?
            .checked_mul(self.replicas as usize)
    }

    /// Validate magic and version.
    pub fn validate(&self) -> Result<()> {
        if self.magic != FRAME_MAGIC {
            return Err(Error::InvalidMagic);
        }
        if self.version != FRAME_VERSION {
            return Err(Error::VersionMismatch {
                expected: FRAME_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }

    /// Serialize to bytes, filling in the checksum.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut sealed = self.clone();
        sealed.checksum = 0;
        let mut bytes = bincode::serialize(&sealed)?;
        let crc = crc32fast::hash(&bytes[..CHECKSUMMED_LEN]);
        sealed.checksum = crc;
        bytes = bincode::serialize(&sealed)?;
        debug_assert_eq!(bytes.len(), HEADER_LEN);
        Ok(bytes)
    }

    /// Deserialize from bytes and validate.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != HEADER_LEN {
            return Err(Error::TruncatedBlock {
                len: data.len(),
                min: HEADER_LEN,
            });
        }
        let header: FrameHeader = bincode::deserialize(data)?;
        header.validate()?;

        let crc = crc32fast::hash(&data[..CHECKSUMMED_LEN]);
        if crc != header.checksum {
            return Err(Error::HeaderCorrupted(format!(
                "checksum {:08x} does not match stored {:08x}",
                crc, header.checksum
            )));
        }
        Ok(header)
    }
}

/// Prefix `body` with replicated copies of `header`.
pub fn write_frame(header: &FrameHeader, body: &[u8]) -> Result<Vec<u8>> {
    let copies = replicate(&header.to_bytes()?, FRAME_HEADER_COPIES)?;
    let mut framed = Vec::with_capacity(copies.len() + body.len());
    framed.extend_from_slice(&copies);
    framed.extend_from_slice(body);
    Ok(framed)
}

/// Split a framed artifact into its recovered header and raw body.
pub fn read_frame(artifact: &[u8]) -> Result<(FrameHeader, &[u8])> {
    let prefix_len = HEADER_LEN * FRAME_HEADER_COPIES;
    if artifact.len() < prefix_len {
        return Err(Error::TruncatedBlock {
            len: artifact.len(),
            min: prefix_len,
        });
    }

    let (copies, body) = artifact.split_at(prefix_len);
    let header = FrameHeader::from_bytes(&reconstruct(copies, FRAME_HEADER_COPIES)?)?;

    match header.body_len() {
        Some(expected) if expected == body.len() => Ok((header, body)),
        _ => Err(Error::HeaderCorrupted(format!(
            "header describes {} x {} bytes, body has {}",
            header.replicas,
            header.block_len,
            body.len()
        ))),
    }
}
