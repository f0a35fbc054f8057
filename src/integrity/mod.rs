//! Integrity layer applied to the compressed block.
//!
//! This module provides:
//! - CRC32 tagging (detection only)
//! - Chunked Reed-Solomon coding (detection and bounded correction)

mod checksum;
mod ecc;

pub use ecc::RsCodec;

use crate::config::Strategy;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Outcome of checking a consensus block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Verification {
    /// The block matched its integrity tag.
    Clean,
    /// The code repaired this many symbols.
    Corrected { symbols: usize },
    /// The checksum did not match and nothing could be repaired.
    Mismatch,
}

/// Payload recovered from a protected block.
#[derive(Debug, Clone)]
pub struct Verified {
    /// Compressed payload with the integrity tag or parity removed.
    pub payload: Vec<u8>,
    /// What the integrity check found.
    pub verification: Verification,
}

/// Attach the integrity tag for `strategy` to `block`.
pub fn protect(block: &[u8], strategy: Strategy) -> Result<Vec<u8>> {
    match strategy {
        Strategy::Checksum => Ok(checksum::protect(block)),
        Strategy::ErrorCorrecting { parity_symbols } => {
            Ok(RsCodec::new(parity_symbols)?.protect(block))
        }
    }
}

/// Length of the protected block produced for a `len`-byte input.
pub fn protected_len(len: usize, strategy: Strategy) -> Result<usize> {
    match strategy {
        Strategy::Checksum => Ok(len + crate::config::CRC_LEN),
        Strategy::ErrorCorrecting { parity_symbols } => {
            Ok(RsCodec::new(parity_symbols)?.protected_len(len))
        }
    }
}

/// Verify `candidate` and, where the strategy allows, correct it.
///
/// The checksum strategy never fails on a mismatch: it returns the unverified
/// payload with [`Verification::Mismatch`]. The code strategy returns
/// [`crate::Error::Uncorrectable`] and no payload when capacity is exceeded.
pub fn verify_or_correct(candidate: &[u8], strategy: Strategy) -> Result<Verified> {
    match strategy {
        Strategy::Checksum => {
            let (payload, mismatch) = checksum::verify(candidate)?;
            Ok(Verified {
                payload: payload.to_vec(),
                verification: if mismatch {
                    Verification::Mismatch
                } else {
                    Verification::Clean
                },
            })
        }
        Strategy::ErrorCorrecting { parity_symbols } => {
            let (payload, symbols) = RsCodec::new(parity_symbols)?.correct(candidate)?;
            Ok(Verified {
                payload,
                verification: if symbols == 0 {
                    Verification::Clean
                } else {
                    Verification::Corrected { symbols }
                },
            })
        }
    }
}
