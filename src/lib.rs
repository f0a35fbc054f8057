//! ARF codec
//!
//! Protects an arbitrary payload against storage or transmission corruption by
//! compressing it, attaching an integrity tag, and replicating the result. A
//! damaged copy is recovered by position-wise majority vote over the replicas,
//! followed by verification (CRC32) or correction (Reed-Solomon).
//!
//! # Features
//!
//! - **Majority vote**: N replicas, deterministic smallest-value tie-break
//! - **CRC32**: detects a corrupted consensus block
//! - **Reed-Solomon**: corrects up to `parity / 2` symbol errors per codeword
//! - **Framed artifacts**: optional header carrying strategy and N
//!
//! # Architecture
//!
//! ```text
//! Data → Compress (LZ4) → Protect (CRC32 | RS) → Replicate (N) → Artifact
//! ```
//!
//! # Example
//!
//! ```rust
//! use arf_codec::{decode, encode, CodecConfig, Strategy};
//! use arf_codec::corruption::corrupt;
//!
//! let config = CodecConfig::new(Strategy::reed_solomon(), 5);
//! let telemetry = b"station=7 temp=21.4 humidity=0.38 status=ok";
//! let artifact = encode(telemetry, &config).unwrap();
//!
//! let damaged = corrupt(&artifact, 0.05, 7);
//! let decoded = decode(&damaged, &config).unwrap();
//! assert_eq!(decoded.data, telemetry);
//! ```

pub mod compression;
pub mod config;
pub mod corruption;
pub mod error;
pub mod frame;
pub mod integrity;
pub mod pipeline;
pub mod redundancy;

pub use config::{CodecConfig, Strategy};
pub use error::{Error, Result};
pub use pipeline::{decode, decode_framed, encode, DecodeReport, DecodeStatus, Decoded};
