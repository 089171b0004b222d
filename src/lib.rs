//! Stocking Stuffer Miner
//!
//! Mines AdventCoins: finds the lowest positive number that, appended to a
//! secret key, gives an MD5 hash starting with a required number of zero hex
//! digits.
//! - Exhaustive, strictly increasing candidate search
//! - Raw-byte and hex-string zero checks that always agree
//! - Optional upper bound and cooperative cancellation

#![forbid(unsafe_code)]

pub mod config;
pub mod crypto;
pub mod error;
pub mod miner;
pub mod puzzle;
pub mod types;
pub mod utils;

pub use config::Config;
pub use error::{Error, Result};
pub use miner::{mine, Miner, MiningStats, Solution};
pub use types::*;

/// Application information
pub const APP_NAME: &str = "stocking-stuffer-miner";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
