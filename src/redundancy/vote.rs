//! Redundancy decoder: position-wise majority vote.
//!
//! Ties are broken in favour of the smallest byte value. This rule is part of
//! the artifact format: two decoders given the same artifact always produce
//! the same consensus block.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Counters gathered while voting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteStats {
    /// Positions where not every replica agreed.
    pub disputed: usize,
    /// Positions where two or more values shared the top count.
    pub tied: usize,
}

/// Length of one replica, after checking `replicas` against the artifact.
pub fn stride(artifact_len: usize, replicas: usize) -> Result<usize> {
    if replicas == 0 || artifact_len % replicas != 0 {
        return Err(Error::InvalidReplicationFactor {
            replicas,
            length: artifact_len,
        });
    }
    Ok(artifact_len / replicas)
}

/// Reconstruct the consensus block from `replicas` concatenated copies.
pub fn reconstruct(artifact: &[u8], replicas: usize) -> Result<Vec<u8>> {
    reconstruct_with_stats(artifact, replicas).map(|(block, _)| block)
}

/// Same as [`reconstruct`], also reporting how contested the vote was.
pub fn reconstruct_with_stats(artifact: &[u8], replicas: usize) -> Result<(Vec<u8>, VoteStats)> {
    let stride = stride(artifact.len(), replicas)?;
    let mut stats = VoteStats::default();

    if replicas == 1 {
        return Ok((artifact.to_vec(), stats));
    }

    let mut consensus = Vec::with_capacity(stride);
    let mut column = Vec::with_capacity(replicas);

    for i in 0..stride {
        column.clear();
        column.extend((0..replicas).map(|r| artifact[r * stride + i]));

        let first = column[0];
        if column.iter().all(|&b| b == first) {
            consensus.push(first);
            continue;
        }

        stats.disputed += 1;
        let (value, tied) = plurality(&mut column);
        if tied {
            stats.tied += 1;
        }
        consensus.push(value);
    }

    Ok((consensus, stats))
}

/// Most frequent value in `column`; smallest value wins a tie.
///
/// Returns the winner and whether the top count was shared.
fn plurality(column: &mut [u8]) -> (u8, bool) {
    column.sort_unstable();

    let mut best = column[0];
    let mut best_count = 0usize;
    let mut tied = false;

    let mut start = 0;
    while start < column.len() {
        let value = column[start];
        let run = column[start..].iter().take_while(|&&b| b == value).count();

        // Runs arrive in ascending order, so only a strictly longer run displaces the leader.
        if run > best_count {
            best = value;
            best_count = run;
            tied = false;
        } else if run == best_count {
            tied = true;
        }
        start += run;
    }

    (best, tied)
}
