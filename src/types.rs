//! Core types for AdventCoin mining
//!
//! Validated inputs to the search (secret key, zero-nibble requirement), the
//! candidate counter and the MD5 digest it produces.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of an MD5 digest in bytes
pub const DIGEST_SIZE: usize = 16;

/// Length of the lowercase hex rendering of a digest
pub const DIGEST_HEX_LEN: usize = DIGEST_SIZE * 2;

/// Secret key prefixed to every candidate before hashing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Secret(String);

impl Secret {
    /// Create a new secret key
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(Error::invalid_argument("Secret key must not be empty"));
        }
        if secret.chars().any(|c| c.is_control()) {
            return Err(Error::invalid_argument(
                "Secret key must contain only printable characters",
            ));
        }
        Ok(Self(secret))
    }

    /// Get the secret as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the secret as the raw bytes fed to the hasher
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl TryFrom<String> for Secret {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Secret> for String {
    fn from(secret: Secret) -> Self {
        secret.0
    }
}

/// Number of hex nibbles, from the most significant end, that must be zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LeadingZeros(u8);

impl LeadingZeros {
    /// Largest meaningful requirement: every nibble of the digest
    pub const MAX: u8 = DIGEST_HEX_LEN as u8;

    /// Create a new requirement, rejecting counts longer than the digest
    pub fn new(count: u8) -> Result<Self> {
        if count > Self::MAX {
            return Err(Error::invalid_argument(format!(
                "Leading zero requirement must be 0-{}, got {}",
                Self::MAX,
                count
            )));
        }
        Ok(Self(count))
    }

    /// Get the nibble count
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Number of whole bytes that must be zero
    pub fn full_bytes(&self) -> usize {
        usize::from(self.0 / 2)
    }

    /// Whether a trailing high nibble must also be zero
    pub fn has_half_byte(&self) -> bool {
        self.0 % 2 == 1
    }
}

impl TryFrom<u8> for LeadingZeros {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<LeadingZeros> for u8 {
    fn from(zeros: LeadingZeros) -> Self {
        zeros.0
    }
}

impl fmt::Display for LeadingZeros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Candidate number appended to the secret (starts at 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Candidate(pub u64);

impl Candidate {
    /// First candidate tried by every search
    pub const FIRST: Candidate = Candidate(1);

    /// Create a new candidate
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the candidate value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Advance to the next candidate, `None` once `u64` is exhausted
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// MD5 digest of `secret || decimal(candidate)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Md5Digest([u8; DIGEST_SIZE]);

impl Md5Digest {
    /// Wrap raw digest bytes
    pub fn new(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the digest bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Lowercase hexadecimal rendering
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 32 character hexadecimal string
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let mut bytes = [0u8; DIGEST_SIZE];
        hex::decode_to_slice(hex_str, &mut bytes)
            .map_err(|e| Error::invalid_argument(format!("Invalid digest hex: {}", e)))?;
        Ok(Self(bytes))
    }

    /// Count the zero nibbles at the start of the digest
    pub fn leading_zero_nibbles(&self) -> u8 {
        let mut count = 0u8;
        for byte in self.0 {
            if byte == 0 {
                count += 2;
                continue;
            }
            if byte & 0xf0 == 0 {
                count += 1;
            }
            break;
        }
        count
    }
}

impl fmt::Display for Md5Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Md5Digest {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Md5Digest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Md5Digest::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Hash rate in hashes per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct HashRate(pub f64);

impl HashRate {
    /// Create new hash rate
    pub fn new(rate: f64) -> Self {
        Self(rate)
    }
}

impl fmt::Display for HashRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 1_000_000_000.0 {
            write!(f, "{:.2}G H/s", self.0 / 1_000_000_000.0)
        } else if self.0 >= 1_000_000.0 {
            write!(f, "{:.2}M H/s", self.0 / 1_000_000.0)
        } else if self.0 >= 1_000.0 {
            write!(f, "{:.2}K H/s", self.0 / 1_000.0)
        } else {
            write!(f, "{:.2} H/s", self.0)
        }
    }
}
