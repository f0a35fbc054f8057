//! Error types for the ARF codec.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while protecting or recovering a payload.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Replication factor is zero or does not evenly divide the artifact.
    #[error("Invalid replication factor {replicas} for artifact of {length} bytes")]
    InvalidReplicationFactor { replicas: usize, length: usize },

    /// Checksum tag did not match the consensus block; no correction possible.
    #[error("Checksum mismatch detected, no correction possible")]
    CorruptionDetectedUnrecoverable,

    /// Reed-Solomon decoding failed: more symbol errors than the parity can fix.
    #[error("Uncorrectable block: too many symbol errors in codeword {chunk}")]
    Uncorrectable { chunk: usize },

    /// The decompressor rejected the recovered bytes.
    #[error("Malformed compressed stream: {0}")]
    MalformedStream(String),

    /// A protected block is too short to carry its integrity tag.
    #[error("Truncated block: {len} bytes, need at least {min}")]
    TruncatedBlock { len: usize, min: usize },

    /// Codec configuration is not usable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Frame header does not start with the ARF magic.
    #[error("Invalid artifact format: expected magic 'ARF1'")]
    InvalidMagic,

    /// Frame version mismatch.
    #[error("Artifact version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    /// Frame header failed its checksum or disagrees with the body.
    #[error("Frame header corrupted: {0}")]
    HeaderCorrupted(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
