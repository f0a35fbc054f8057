//! End-to-end encode and decode.
//!
//! ```text
//! encode: raw → compress → protect → replicate(N) [→ frame]
//! decode: [unframe →] vote(N) → verify/correct → decompress → raw
//! ```

use crate::compression::{Compressor, Lz4Compressor};
use crate::config::{CodecConfig, Strategy};
use crate::error::{Error, Result};
use crate::frame::{self, FrameHeader};
use crate::integrity::{self, Verification};
use crate::redundancy;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Overall result of a decode, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecodeStatus {
    /// Consensus block matched its integrity tag.
    Clean,
    /// The code repaired this many symbols.
    Corrected { symbols: usize },
    /// Checksum mismatch; payload was forwarded without correction.
    DetectedUncorrectable,
}

impl fmt::Display for DecodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeStatus::Clean => write!(f, "No errors detected"),
            DecodeStatus::Corrected { symbols } => {
                write!(f, "Errors detected and corrected ({})", symbols)
            }
            DecodeStatus::DetectedUncorrectable => write!(f, "Error detected, could not correct."),
        }
    }
}

impl From<Verification> for DecodeStatus {
    fn from(v: Verification) -> Self {
        match v {
            Verification::Clean => DecodeStatus::Clean,
            Verification::Corrected { symbols } => DecodeStatus::Corrected { symbols },
            Verification::Mismatch => DecodeStatus::DetectedUncorrectable,
        }
    }
}

/// Everything a decode learned about the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeReport {
    /// Integrity outcome.
    pub status: DecodeStatus,
    /// Strategy used for verification.
    pub strategy: Strategy,
    /// Replication factor used for the vote.
    pub replicas: usize,
    /// Length of the consensus block.
    pub block_len: usize,
    /// Positions where replicas disagreed.
    pub disputed_positions: usize,
    /// Positions decided by the tie-break rule.
    pub tied_positions: usize,
}

impl DecodeReport {
    /// Pretty-printed JSON form of the report.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Turn a detected-but-uncorrected checksum mismatch into a hard error.
    pub fn into_strict(self) -> Result<Self> {
        match self.status {
            DecodeStatus::DetectedUncorrectable => Err(Error::CorruptionDetectedUnrecoverable),
            _ => Ok(self),
        }
    }
}

/// Recovered payload plus its report.
#[derive(Debug, Clone)]
pub struct Decoded {
    /// Decompressed original bytes.
    pub data: Vec<u8>,
    /// How recovery went.
    pub report: DecodeReport,
}

/// Protect `raw` with the default compressor.
///
/// # Example
///
/// ```
/// use arf_codec::{decode, encode, CodecConfig, Strategy};
///
/// let config = CodecConfig::new(Strategy::Checksum, 3);
/// let artifact = encode(b"Hello, World!", &config).unwrap();
/// let decoded = decode(&artifact, &config).unwrap();
///
/// assert_eq!(decoded.data, b"Hello, World!");
/// assert_eq!(decoded.report.status.to_string(), "No errors detected");
/// ```
pub fn encode(raw: &[u8], config: &CodecConfig) -> Result<Vec<u8>> {
    encode_with(&Lz4Compressor, raw, config)
}

/// Recover the payload from `artifact` with the default compressor.
pub fn decode(artifact: &[u8], config: &CodecConfig) -> Result<Decoded> {
    decode_with(&Lz4Compressor, artifact, config)
}

/// Recover the payload from a framed artifact, trusting only its header.
pub fn decode_framed(artifact: &[u8]) -> Result<Decoded> {
    decode_framed_with(&Lz4Compressor, artifact)
}

/// Protect `raw` using `compressor`.
pub fn encode_with<C: Compressor + ?Sized>(
    compressor: &C,
    raw: &[u8],
    config: &CodecConfig,
) -> Result<Vec<u8>> {
    config.validate()?;

    let compressed = compressor.compress(raw);
    let block = integrity::protect(&compressed, config.strategy)?;
    debug_assert_eq!(
        Some(block.len()),
        integrity::protected_len(compressed.len(), config.strategy).ok()
    );
    let body = redundancy::replicate(&block, config.replicas)?;

    info!(
        raw = raw.len(),
        compressed = compressed.len(),
        block = block.len(),
        replicas = config.replicas,
        strategy = %config.strategy,
        "encoded payload"
    );

    if config.framed {
        let header = FrameHeader::new(config, block.len())?;
        frame::write_frame(&header, &body)
    } else {
        Ok(body)
    }
}

/// Recover the payload from `artifact` using `compressor`.
///
/// For a framed config the header wins over the caller's strategy and replica count.
pub fn decode_with<C: Compressor + ?Sized>(
    compressor: &C,
    artifact: &[u8],
    config: &CodecConfig,
) -> Result<Decoded> {
    if config.framed {
        return decode_framed_with(compressor, artifact);
    }
    config.validate()?;
    recover(compressor, artifact, config.strategy, config.replicas)
}

/// Recover the payload from a framed artifact using `compressor`.
pub fn decode_framed_with<C: Compressor + ?Sized>(compressor: &C, artifact: &[u8]) -> Result<Decoded> {
    let (header, body) = frame::read_frame(artifact)?;
    let config = header.codec_config()?;
    debug!(
        replicas = config.replicas,
        block_len = header.block_len,
        strategy = %config.strategy,
        "read frame header"
    );
    recover(compressor, body, config.strategy, config.replicas)
}

fn recover<C: Compressor + ?Sized>(
    compressor: &C,
    body: &[u8],
    strategy: Strategy,
    replicas: usize,
) -> Result<Decoded> {
    let (consensus, stats) = redundancy::reconstruct_with_stats(body, replicas)?;
    if stats.disputed > 0 {
        debug!(
            disputed = stats.disputed,
            tied = stats.tied,
            "replicas disagreed"
        );
    }

    let verified = integrity::verify_or_correct(&consensus, strategy).map_err(|e| {
        warn!(error = %e, "integrity check failed");
        e
    })?;

    let status = DecodeStatus::from(verified.verification);
    match status {
        DecodeStatus::Clean => debug!("consensus block verified"),
        DecodeStatus::Corrected { symbols } => info!(symbols, "corrected symbol errors"),
        DecodeStatus::DetectedUncorrectable => {
            warn!("checksum mismatch, no correction possible, decompression may fail")
        }
    }

    let data = compressor.decompress(&verified.payload)?;

    Ok(Decoded {
        data,
        report: DecodeReport {
            status,
            strategy,
            replicas,
            block_len: consensus.len(),
            disputed_positions: stats.disputed,
            tied_positions: stats.tied,
        },
    })
}
