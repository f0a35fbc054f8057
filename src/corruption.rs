//! Random byte corruption for exercising recovery.
//!
//! Not part of the protected path; used by tests and the `corrupt` command.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// What a corruption pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorruptionSummary {
    /// Bytes selected for replacement.
    pub touched: usize,
    /// Bytes whose value actually changed (a replacement can draw the old value).
    pub changed: usize,
}

/// Seedable byte corruptor.
pub struct Corruptor {
    rng: StdRng,
}

impl Corruptor {
    /// Corruptor seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible corruptor.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Replace each byte, with probability `fraction`, by a uniformly random byte.
    ///
    /// `fraction` is clamped to `[0, 1]`; NaN counts as zero.
    pub fn corrupt_in_place(&mut self, data: &mut [u8], fraction: f64) -> CorruptionSummary {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let mut summary = CorruptionSummary::default();

        for byte in data.iter_mut() {
            if self.rng.gen_bool(fraction) {
                let replacement: u8 = self.rng.gen();
                summary.touched += 1;
                if replacement != *byte {
                    summary.changed += 1;
                }
                *byte = replacement;
            }
        }

        summary
    }

    /// Corrupted copy of `data`.
    pub fn corrupt(&mut self, data: &[u8], fraction: f64) -> Vec<u8> {
        let mut copy = data.to_vec();
        self.corrupt_in_place(&mut copy, fraction);
        copy
    }

    /// Overwrite exactly `count` distinct positions of `data` with different values.
    ///
    /// Used to hit a precise error budget. `count` is capped at `data.len()`.
    pub fn corrupt_exact(&mut self, data: &mut [u8], count: usize) -> Vec<usize> {
        let count = count.min(data.len());
        let positions = rand::seq::index::sample(&mut self.rng, data.len(), count).into_vec();

        for &pos in &positions {
            let delta: u8 = self.rng.gen_range(1..=255);
            data[pos] ^= delta;
        }

        positions
    }
}

impl Default for Corruptor {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot seeded corruption.
pub fn corrupt(data: &[u8], fraction: f64, seed: u64) -> Vec<u8> {
    Corruptor::with_seed(seed).corrupt(data, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        (0..10000).map(|i| (i % 256) as u8).collect()
    }

    #[test]
    fn test_zero_fraction_is_identity() {
        let data = sample();
        assert_eq!(corrupt(&data, 0.0, 1), data);
    }

    #[test]
    fn test_full_fraction_touches_everything() {
        let mut data = sample();
        let summary = Corruptor::with_seed(1).corrupt_in_place(&mut data, 1.0);
        assert_eq!(summary.touched, data.len());
        assert!(summary.changed > 9900);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let data = sample();
        assert_eq!(corrupt(&data, 0.1, 42), corrupt(&data, 0.1, 42));
        assert_ne!(corrupt(&data, 0.1, 42), corrupt(&data, 0.1, 43));
    }

    #[test]
    fn test_fraction_roughly_respected() {
        let mut data = sample();
        let summary = Corruptor::with_seed(7).corrupt_in_place(&mut data, 0.1);
        assert!(summary.touched > 800 && summary.touched < 1200);
    }

    #[test]
    fn test_out_of_range_fraction_clamped() {
        let data = sample();
        assert_eq!(corrupt(&data, -3.0, 1), data);
        assert_eq!(corrupt(&data, f64::NAN, 1), data);
    }

    #[test]
    fn test_corrupt_exact_changes_exact_count() {
        let original = sample();
        let mut data = original.clone();
        let positions = Corruptor::with_seed(3).corrupt_exact(&mut data, 9);

        assert_eq!(positions.len(), 9);
        let differing = original.iter().zip(&data).filter(|(a, b)| a != b).count();
        assert_eq!(differing, 9);
    }
}
