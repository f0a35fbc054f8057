//! Replication of the protected block and majority-vote reconstruction.
//!
//! Both steps are strategy-agnostic: the vote runs on raw bytes before the
//! integrity layer sees them.

mod replicate;
mod vote;

pub use replicate::replicate;
pub use vote::{reconstruct, reconstruct_with_stats, stride, VoteStats};
