//! AdventCoin miner
//!
//! Exhaustive, strictly increasing search over candidates `1, 2, 3, …` for the
//! first one whose MD5 (with the secret prefixed) starts with the required
//! number of zero nibbles. Single threaded and synchronous; the optional
//! cancellation token is polled once per batch.

use crate::crypto::{Md5Hasher, ZeroPrefixStrategy};
use crate::types::{Candidate, HashRate, LeadingZeros, Md5Digest, Secret};
use crate::utils::compute_hash_rate;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, Span};

/// Candidates hashed between cancellation checks
const BATCH_SIZE: u64 = 100_000;

/// Minimum time between progress log lines
const PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

/// Statistics for a single search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MiningStats {
    /// Total hashes computed
    pub total_hashes: u64,
    /// Wall-clock time spent searching (seconds)
    pub elapsed_secs: f64,
    /// Average hash rate (hashes per second)
    pub hash_rate: f64,
}

impl MiningStats {
    fn from_run(total_hashes: u64, elapsed: Duration) -> Self {
        Self {
            total_hashes,
            elapsed_secs: elapsed.as_secs_f64(),
            hash_rate: compute_hash_rate(total_hashes, elapsed),
        }
    }

    /// Elapsed time as a `Duration`
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_secs)
    }
}

/// Result of a successful search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Smallest candidate meeting the requirement
    pub candidate: Candidate,
    /// Digest of `secret || candidate`
    pub digest: Md5Digest,
    /// Search statistics
    pub stats: MiningStats,
}

/// Brute-force zero-prefix miner
#[derive(Debug, Clone, Default)]
pub struct Miner {
    strategy: ZeroPrefixStrategy,
    max_candidate: Option<u64>,
    cancellation: Option<CancellationToken>,
}

impl Miner {
    /// Create a miner using the raw nibble check and no upper bound
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the zero-prefix check
    pub fn with_strategy(mut self, strategy: ZeroPrefixStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Give up with [`Error::Exhausted`] after this candidate (inclusive)
    pub fn with_max_candidate(mut self, max_candidate: Option<u64>) -> Self {
        self.max_candidate = max_candidate;
        self
    }

    /// Stop with [`Error::Cancelled`] once the token fires
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    /// Zero-prefix check in use
    pub fn strategy(&self) -> ZeroPrefixStrategy {
        self.strategy
    }

    /// Find the smallest candidate whose digest has `zeros` leading zero nibbles
    pub fn mine(&self, secret: &Secret, zeros: LeadingZeros) -> Result<Solution> {
        let _span = mining_span(self.strategy, zeros).entered();
        info!(
            "Mining for {} leading zero nibbles with {} check",
            zeros, self.strategy
        );

        let mut hasher = Md5Hasher::new(secret);
        let mut candidate = Candidate::FIRST;
        let mut hashes = 0u64;
        let start = Instant::now();
        let mut last_progress = start;

        loop {
            if let Some(max) = self.max_candidate {
                if candidate.value() > max {
                    info!("No solution up to candidate {}", max);
                    return Err(Error::exhausted(max, zeros.value()));
                }
            }

            let (found, digest) = hasher.hash_and_check(candidate, zeros, self.strategy);
            hashes += 1;

            if found {
                let stats = MiningStats::from_run(hashes, start.elapsed());
                info!(
                    "Solution {} found after {} hashes ({})",
                    candidate,
                    stats.total_hashes,
                    HashRate::new(stats.hash_rate)
                );
                return Ok(Solution {
                    candidate,
                    digest,
                    stats,
                });
            }

            if hashes % BATCH_SIZE == 0 {
                if self.is_cancelled() {
                    debug!("Mining cancelled at candidate {}", candidate);
                    return Err(Error::cancelled("mining"));
                }

                if last_progress.elapsed() >= PROGRESS_INTERVAL {
                    debug!(
                        "Progress - candidate {}, hash rate: {}",
                        candidate,
                        HashRate::new(compute_hash_rate(hashes, start.elapsed()))
                    );
                    last_progress = Instant::now();
                }
            }

            candidate = candidate
                .next()
                .ok_or_else(|| Error::exhausted(u64::MAX, zeros.value()))?;
        }
    }

    /// Check a candidate directly, without searching
    pub fn verify(&self, secret: &Secret, candidate: Candidate, zeros: LeadingZeros) -> bool {
        let mut hasher = Md5Hasher::new(secret);
        hasher.hash_and_check(candidate, zeros, self.strategy).0
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

/// Find the smallest positive integer `n` such that `md5(secret || n)` starts
/// with `leading_zeros` zero hex digits.
///
/// Validates its arguments, then searches without an upper bound.
pub fn mine(secret: &str, leading_zeros: u8) -> Result<u64> {
    let secret = Secret::new(secret)?;
    let zeros = LeadingZeros::new(leading_zeros)?;
    Miner::new()
        .mine(&secret, zeros)
        .map(|solution| solution.candidate.value())
}

/// Create a tracing span for mining operations
pub fn mining_span(strategy: ZeroPrefixStrategy, zeros: LeadingZeros) -> Span {
    tracing::info_span!(
        "mining",
        strategy = %strategy,
        leading_zeros = zeros.value(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn secret(s: &str) -> Secret {
        Secret::new(s).unwrap()
    }

    fn zeros(n: u8) -> LeadingZeros {
        LeadingZeros::new(n).unwrap()
    }

    #[test]
    fn test_zero_requirement_returns_first_candidate() {
        let solution = Miner::new().mine(&secret("abcdef"), zeros(0)).unwrap();
        assert_eq!(solution.candidate, Candidate::FIRST);
        assert_eq!(solution.stats.total_hashes, 1);
    }

    #[test]
    fn test_small_requirement_is_minimal() {
        let secret = secret("abcdef");
        let miner = Miner::new();
        let solution = miner.mine(&secret, zeros(3)).unwrap();

        assert!(solution.digest.leading_zero_nibbles() >= 3);
        for n in 1..solution.candidate.value() {
            assert!(
                !miner.verify(&secret, Candidate::new(n), zeros(3)),
                "candidate {} also satisfies the requirement",
                n
            );
        }
    }

    #[test]
    fn test_strategies_find_same_solution() {
        let secret = secret("pqrstuv");
        for n in 0..=4 {
            let raw = Miner::new()
                .with_strategy(ZeroPrefixStrategy::Raw)
                .mine(&secret, zeros(n))
                .unwrap();
            let hex = Miner::new()
                .with_strategy(ZeroPrefixStrategy::Hex)
                .mine(&secret, zeros(n))
                .unwrap();
            assert_eq!(raw.candidate, hex.candidate);
            assert_eq!(raw.digest, hex.digest);
        }
    }

    #[test]
    fn test_max_candidate_exhausts() {
        let result = Miner::new()
            .with_max_candidate(Some(10))
            .mine(&secret("abcdef"), zeros(5));
        assert_matches!(
            result,
            Err(Error::Exhausted {
                last_candidate: 10,
                leading_zeros: 5
            })
        );
    }

    #[test]
    fn test_max_candidate_inclusive() {
        let secret = secret("abcdef");
        let unbounded = Miner::new().mine(&secret, zeros(2)).unwrap();
        let bounded = Miner::new()
            .with_max_candidate(Some(unbounded.candidate.value()))
            .mine(&secret, zeros(2))
            .unwrap();
        assert_eq!(bounded.candidate, unbounded.candidate);
    }

    #[test]
    fn test_cancellation() {
        let cancellation = CancellationToken::new();
        cancellation.cancel();

        let result = Miner::new()
            .with_cancellation(cancellation)
            .mine(&secret("abcdef"), zeros(32));
        assert_matches!(result, Err(Error::Cancelled { .. }));
    }

    #[test]
    fn test_mine_rejects_invalid_arguments() {
        assert_matches!(mine("", 5), Err(Error::InvalidArgument { .. }));
        assert_matches!(mine("abcdef", 33), Err(Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_mine_is_idempotent() {
        assert_eq!(mine("abcdef", 3).unwrap(), mine("abcdef", 3).unwrap());
    }
}
