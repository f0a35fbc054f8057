//! Configuration constants and types for the ARF codec.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of Reed-Solomon parity symbols per codeword.
pub const DEFAULT_PARITY_SYMBOLS: u8 = 16;

/// Smallest usable parity count (corrects one symbol).
pub const MIN_PARITY_SYMBOLS: u8 = 2;

/// Largest parity count we accept; leaves at least 127 data bytes per codeword.
pub const MAX_PARITY_SYMBOLS: u8 = 128;

/// Maximum codeword length over GF(2^8).
pub const RS_CODEWORD_LEN: usize = 255;

/// Default replication factor.
pub const DEFAULT_REPLICAS: usize = 5;

/// Length of the big-endian CRC32 tag.
pub const CRC_LEN: usize = 4;

/// Frame magic number: "ARF1" in bytes.
pub const FRAME_MAGIC: [u8; 4] = [0x41, 0x52, 0x46, 0x31];

/// Current frame version.
pub const FRAME_VERSION: u32 = 1;

/// Number of header copies written in front of a framed artifact.
pub const FRAME_HEADER_COPIES: usize = 5;

/// Integrity mechanism applied to the compressed block before replication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// CRC32 tag: detects corruption, cannot correct it.
    Checksum,
    /// Systematic Reed-Solomon code correcting `parity_symbols / 2` errors per codeword.
    ErrorCorrecting { parity_symbols: u8 },
}

impl Strategy {
    /// Reed-Solomon with the default parity count.
    pub fn reed_solomon() -> Self {
        Strategy::ErrorCorrecting {
            parity_symbols: DEFAULT_PARITY_SYMBOLS,
        }
    }

    /// Wire tag used in the frame header.
    pub fn tag(&self) -> u8 {
        match self {
            Strategy::Checksum => 0,
            Strategy::ErrorCorrecting { .. } => 1,
        }
    }

    /// Parity count, zero for the checksum strategy.
    pub fn parity_symbols(&self) -> u8 {
        match self {
            Strategy::Checksum => 0,
            Strategy::ErrorCorrecting { parity_symbols } => *parity_symbols,
        }
    }

    /// Rebuild a strategy from its frame header fields.
    pub fn from_tag(tag: u8, parity_symbols: u8) -> Result<Self> {
        let strategy = match tag {
            0 => Strategy::Checksum,
            1 => Strategy::ErrorCorrecting { parity_symbols },
            other => {
                return Err(Error::HeaderCorrupted(format!(
                    "unknown strategy tag {}",
                    other
                )))
            }
        };
        strategy.validate()?;
        Ok(strategy)
    }

    /// Validate the strategy parameters.
    pub fn validate(&self) -> Result<()> {
        if let Strategy::ErrorCorrecting { parity_symbols } = *self {
            if !(MIN_PARITY_SYMBOLS..=MAX_PARITY_SYMBOLS).contains(&parity_symbols) {
                return Err(Error::InvalidConfig(format!(
                    "Parity symbols must be between {} and {}",
                    MIN_PARITY_SYMBOLS, MAX_PARITY_SYMBOLS
                )));
            }
            if parity_symbols % 2 != 0 {
                return Err(Error::InvalidConfig(
                    "Parity symbols must be even".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Checksum
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Checksum => write!(f, "crc32"),
            Strategy::ErrorCorrecting { parity_symbols } => {
                write!(f, "reed-solomon({})", parity_symbols)
            }
        }
    }
}

/// Parameters shared by `encode` and `decode`.
///
/// For raw artifacts the same config must be supplied on both sides; framed
/// artifacts carry it in their header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Integrity mechanism.
    pub strategy: Strategy,

    /// Number of copies of the protected block (N).
    pub replicas: usize,

    /// Prefix the artifact with a self-describing header.
    pub framed: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            replicas: DEFAULT_REPLICAS,
            framed: false,
        }
    }
}

impl CodecConfig {
    /// Create a raw (headerless) configuration.
    pub fn new(strategy: Strategy, replicas: usize) -> Self {
        Self {
            strategy,
            replicas,
            framed: false,
        }
    }

    /// Same configuration, framed.
    pub fn framed(mut self) -> Self {
        self.framed = true;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.replicas == 0 {
            return Err(Error::InvalidConfig(
                "Replication factor must be at least 1".to_string(),
            ));
        }
        if u32::try_from(self.replicas).is_err() {
            return Err(Error::InvalidConfig(
                "Replication factor does not fit in 32 bits".to_string(),
            ));
        }
        self.strategy.validate()
    }
}
