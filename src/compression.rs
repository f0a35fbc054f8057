//! Lossless compression of the payload before protection.
//!
//! The codec only needs a deterministic, lossless byte transform. The default
//! is LZ4 block compression with a little-endian `u32` size prefix.

use crate::error::{Error, Result};

/// Worst-case LZ4 expansion: one literal token can stand for up to 255 bytes.
const LZ4_MAX_RATIO: usize = 255;

/// Size of the uncompressed-length prefix.
const SIZE_PREFIX_LEN: usize = 4;

/// Lossless compress/decompress contract.
pub trait Compressor {
    /// Compress `data`. Deterministic and infallible.
    fn compress(&self, data: &[u8]) -> Vec<u8>;

    /// Decompress bytes produced by `compress`.
    ///
    /// Fails with [`Error::MalformedStream`] when the input is not a valid stream.
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// LZ4 compressor backed by `lz4_flex`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Compressor;

impl Compressor for Lz4Compressor {
    fn compress(&self, data: &[u8]) -> Vec<u8> {
        lz4_flex::compress_prepend_size(data)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.len() < SIZE_PREFIX_LEN {
            return Err(Error::MalformedStream(format!(
                "stream of {} bytes has no size prefix",
                data.len()
            )));
        }

        // A corrupted prefix must not drive a multi-gigabyte allocation.
        let mut prefix = [0u8; SIZE_PREFIX_LEN];
        prefix.copy_from_slice(&data[..SIZE_PREFIX_LEN]);
        let declared = u32::from_le_bytes(prefix) as usize;
        let body_len = data.len() - SIZE_PREFIX_LEN;
        let ceiling = body_len.saturating_mul(LZ4_MAX_RATIO);
        if declared > ceiling {
            return Err(Error::MalformedStream(format!(
                "declared size {} exceeds bound {} for {} compressed bytes",
                declared, ceiling, body_len
            )));
        }

        lz4_flex::decompress_size_prepended(data)
            .map_err(|e| Error::MalformedStream(e.to_string()))
    }
}

/// Compress with the default compressor.
pub fn compress(data: &[u8]) -> Vec<u8> {
    Lz4Compressor.compress(data)
}

/// Decompress with the default compressor.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    Lz4Compressor.decompress(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let data = b"Hello, World! Hello, World! Hello, World!";
        let compressed = compress(data);
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_roundtrip_empty() {
        let compressed = compress(b"");
        assert_eq!(decompress(&compressed).unwrap(), b"");
    }

    #[test]
    fn test_compressible_data_shrinks() {
        let data = vec![7u8; 10000];
        let compressed = compress(&data);
        assert!(compressed.len() < data.len() / 10);
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_deterministic() {
        let data: Vec<u8> = (0..5000).map(|i| (i * 31 % 251) as u8).collect();
        assert_eq!(compress(&data), compress(&data));
    }

    #[test]
    fn test_short_input_rejected() {
        assert!(matches!(decompress(&[1, 2]), Err(Error::MalformedStream(_))));
    }

    #[test]
    fn test_oversized_prefix_rejected() {
        let mut compressed = compress(b"some payload");
        compressed[..4].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            decompress(&compressed),
            Err(Error::MalformedStream(_))
        ));
    }
}
