//! Cryptographic utilities for mining
//!
//! MD5 hashing of `secret || decimal(candidate)` and the two interchangeable
//! leading-zero-nibble checks.

use crate::{Candidate, LeadingZeros, Md5Digest, Secret, DIGEST_HEX_LEN, DIGEST_SIZE};
use clap::ValueEnum;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the leading-zero requirement is checked against a digest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroPrefixStrategy {
    /// Inspect digest bytes directly, masking the final half byte
    #[default]
    Raw,
    /// Render lowercase hex and compare against a run of '0' characters
    Hex,
}

impl ZeroPrefixStrategy {
    /// Check whether `digest` starts with at least `zeros` zero nibbles
    pub fn check(self, digest: &Md5Digest, zeros: LeadingZeros) -> bool {
        match self {
            ZeroPrefixStrategy::Raw => has_leading_zero_nibbles(digest, zeros),
            ZeroPrefixStrategy::Hex => hex_has_leading_zeros(digest, zeros),
        }
    }

    /// The strategy used to cross-check this one
    pub fn other(self) -> Self {
        match self {
            ZeroPrefixStrategy::Raw => ZeroPrefixStrategy::Hex,
            ZeroPrefixStrategy::Hex => ZeroPrefixStrategy::Raw,
        }
    }
}

impl fmt::Display for ZeroPrefixStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZeroPrefixStrategy::Raw => write!(f, "raw"),
            ZeroPrefixStrategy::Hex => write!(f, "hex"),
        }
    }
}

/// Nibble check on the raw bytes. Byte order independent: whole bytes are
/// compared one at a time, then the high nibble of the next byte if the count
/// is odd.
pub fn has_leading_zero_nibbles(digest: &Md5Digest, zeros: LeadingZeros) -> bool {
    let bytes = digest.as_bytes();
    let full = zeros.full_bytes();

    if bytes[..full].iter().any(|&b| b != 0) {
        return false;
    }

    if zeros.has_half_byte() {
        return bytes[full] & 0xf0 == 0;
    }

    true
}

/// Nibble check on the lowercase hex rendering
pub fn hex_has_leading_zeros(digest: &Md5Digest, zeros: LeadingZeros) -> bool {
    let mut rendered = [0u8; DIGEST_HEX_LEN];
    // Buffer is exactly twice the digest length, so encoding cannot fail
    if hex::encode_to_slice(digest.as_bytes(), &mut rendered).is_err() {
        return false;
    }

    rendered[..usize::from(zeros.value())]
        .iter()
        .all(|&c| c == b'0')
}

/// Optimized MD5 hasher for mining operations
///
/// Keeps the secret in a reusable input buffer so each candidate only rewrites
/// its decimal suffix.
pub struct Md5Hasher {
    hasher: Md5,
    input: Vec<u8>,
    secret_len: usize,
    decimal: itoa::Buffer,
}

impl Md5Hasher {
    /// Create a hasher for the given secret
    pub fn new(secret: &Secret) -> Self {
        let secret_len = secret.as_bytes().len();
        // u64::MAX has 20 decimal digits
        let mut input = Vec::with_capacity(secret_len + 20);
        input.extend_from_slice(secret.as_bytes());

        Self {
            hasher: Md5::new(),
            input,
            secret_len,
            decimal: itoa::Buffer::new(),
        }
    }

    /// Hash `secret || decimal(candidate)`
    pub fn hash_candidate(&mut self, candidate: Candidate) -> Md5Digest {
        self.input.truncate(self.secret_len);
        self.input
            .extend_from_slice(self.decimal.format(candidate.value()).as_bytes());

        self.hasher.update(&self.input);
        let result: [u8; DIGEST_SIZE] = self.hasher.finalize_reset().into();
        Md5Digest::new(result)
    }

    /// Hash a candidate and check it against the requirement
    pub fn hash_and_check(
        &mut self,
        candidate: Candidate,
        zeros: LeadingZeros,
        strategy: ZeroPrefixStrategy,
    ) -> (bool, Md5Digest) {
        let digest = self.hash_candidate(candidate);
        (strategy.check(&digest, zeros), digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeros(n: u8) -> LeadingZeros {
        LeadingZeros::new(n).unwrap()
    }

    fn direct(input: &[u8]) -> Md5Digest {
        Md5Digest::new(Md5::digest(input).into())
    }

    #[test]
    fn test_hash_candidate_matches_direct_hash() {
        let secret = Secret::new("abcdef").unwrap();
        let mut hasher = Md5Hasher::new(&secret);

        let digest = hasher.hash_candidate(Candidate::new(609043));
        assert_eq!(digest, direct(b"abcdef609043"));
        assert!(digest.to_hex().starts_with("000001dbbf"));
    }

    #[test]
    fn test_hash_candidate_rewrites_suffix() {
        let secret = Secret::new("abcdef").unwrap();
        let mut hasher = Md5Hasher::new(&secret);

        // A long candidate followed by a short one must not leave stale digits
        hasher.hash_candidate(Candidate::new(u64::MAX));
        assert_eq!(
            hasher.hash_candidate(Candidate::new(7)),
            direct(b"abcdef7")
        );
        assert_eq!(
            hasher.hash_candidate(Candidate::new(u64::MAX)),
            direct(format!("abcdef{}", u64::MAX).as_bytes())
        );
        assert_eq!(
            hasher.hash_candidate(Candidate::new(1048970)),
            direct(b"abcdef1048970")
        );
    }

    #[test]
    fn test_odd_nibble_count_masks_half_byte() {
        let mut bytes = [0xffu8; DIGEST_SIZE];
        bytes[0] = 0x00;
        bytes[1] = 0x00;
        bytes[2] = 0x0f;
        let digest = Md5Digest::new(bytes);

        assert!(has_leading_zero_nibbles(&digest, zeros(5)));
        assert!(!has_leading_zero_nibbles(&digest, zeros(6)));
        assert!(hex_has_leading_zeros(&digest, zeros(5)));
        assert!(!hex_has_leading_zeros(&digest, zeros(6)));
    }

    #[test]
    fn test_zero_requirement_always_met() {
        let digest = Md5Digest::new([0xffu8; DIGEST_SIZE]);
        assert!(has_leading_zero_nibbles(&digest, zeros(0)));
        assert!(hex_has_leading_zeros(&digest, zeros(0)));
    }

    #[test]
    fn test_full_requirement() {
        let all_zero = Md5Digest::new([0u8; DIGEST_SIZE]);
        assert!(has_leading_zero_nibbles(&all_zero, zeros(32)));
        assert!(hex_has_leading_zeros(&all_zero, zeros(32)));

        let mut bytes = [0u8; DIGEST_SIZE];
        bytes[DIGEST_SIZE - 1] = 0x01;
        let last_set = Md5Digest::new(bytes);
        assert!(has_leading_zero_nibbles(&last_set, zeros(31)));
        assert!(!has_leading_zero_nibbles(&last_set, zeros(32)));
        assert!(!hex_has_leading_zeros(&last_set, zeros(32)));
    }

    #[test]
    fn test_strategy_other() {
        assert_eq!(ZeroPrefixStrategy::Raw.other(), ZeroPrefixStrategy::Hex);
        assert_eq!(ZeroPrefixStrategy::Hex.other(), ZeroPrefixStrategy::Raw);
        assert_eq!(ZeroPrefixStrategy::default().to_string(), "raw");
    }
}
