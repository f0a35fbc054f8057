//! Systematic Reed-Solomon code over GF(2^8).
//!
//! A GF(2^8) codeword holds at most 255 symbols, so the block is cut into
//! chunks of `255 - parity` data bytes and each chunk carries its own parity.
//! The last chunk is a shortened codeword.

use crate::config::{Strategy, RS_CODEWORD_LEN};
use crate::error::{Error, Result};
use reed_solomon::{Decoder, Encoder};
use tracing::debug;

/// Chunked Reed-Solomon encoder/decoder.
pub struct RsCodec {
    encoder: Encoder,
    decoder: Decoder,
    parity: usize,
}

impl RsCodec {
    /// Create a codec appending `parity` symbols to every codeword.
    ///
    /// Fails with [`Error::InvalidConfig`] unless `parity` is even and within
    /// the accepted range.
    pub fn new(parity: u8) -> Result<Self> {
        Strategy::ErrorCorrecting {
            parity_symbols: parity,
        }
        .validate()?;

        let parity = parity as usize;
        Ok(Self {
            encoder: Encoder::new(parity),
            decoder: Decoder::new(parity),
            parity,
        })
    }

    /// Data bytes per full codeword.
    pub fn data_len(&self) -> usize {
        RS_CODEWORD_LEN - self.parity
    }

    /// Symbol errors each codeword can correct.
    pub fn correctable(&self) -> usize {
        self.parity / 2
    }

    /// Length of the protected form of a `len`-byte block.
    pub fn protected_len(&self, len: usize) -> usize {
        let chunks = (len + self.data_len() - 1) / self.data_len();
        len + chunks * self.parity
    }

    /// Encode `block`, appending parity after every data chunk.
    pub fn protect(&self, block: &[u8]) -> Vec<u8> {
        let mut protected = Vec::with_capacity(self.protected_len(block.len()));
        for chunk in block.chunks(self.data_len()) {
            let codeword = self.encoder.encode(chunk);
            protected.extend_from_slice(&codeword);
        }
        protected
    }

    /// Correct every codeword in `candidate` and strip the parity.
    ///
    /// Returns the payload and the number of symbols that were repaired.
    pub fn correct(&self, candidate: &[u8]) -> Result<(Vec<u8>, usize)> {
        let mut payload = Vec::with_capacity(candidate.len());
        let mut repaired = 0usize;

        for (index, chunk) in candidate.chunks(RS_CODEWORD_LEN).enumerate() {
            if chunk.len() <= self.parity {
                return Err(Error::TruncatedBlock {
                    len: chunk.len(),
                    min: self.parity + 1,
                });
            }

            let mut codeword = chunk.to_vec();
            let (corrected, errors) = self
                .decoder
                .correct_err_count(&mut codeword, None)
                .map_err(|e| {
                    debug!(
                        chunk = index,
                        capacity = self.correctable(),
                        error = ?e,
                        "Reed-Solomon decode failed"
                    );
                    Error::Uncorrectable { chunk: index }
                })?;

            // The locator can land on a wrong codeword when errors exceed capacity.
            if self.decoder.is_corrupted(&corrected) {
                debug!(chunk = index, "corrected codeword still has nonzero syndromes");
                return Err(Error::Uncorrectable { chunk: index });
            }

            if errors > 0 {
                debug!(chunk = index, errors, "repaired codeword");
            }
            repaired += errors;
            payload.extend_from_slice(corrected.data());
        }

        Ok((payload, repaired))
    }
}
