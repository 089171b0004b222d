//! Configuration management for the stocking stuffer miner
//!
//! Supports configuration via command line arguments, environment variables,
//! and configuration files (YAML/JSON). Values given on the command line or in
//! the environment win over the file; the file wins over built-in defaults.

use crate::crypto::ZeroPrefixStrategy;
use crate::miner::Miner;
use crate::{Error, LeadingZeros, Result, Secret};
use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Secret key of the reference puzzle input
pub const DEFAULT_SECRET: &str = "iwrupvqb";

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

/// Report format on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `Part 1: <answer>` lines
    Text,
    /// Full report as JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Complete configuration for the miner
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[serde(default)]
#[command(
    name = "stocking-stuffer-miner",
    version = env!("CARGO_PKG_VERSION"),
    about = "Mine AdventCoins",
    long_about = "Finds the lowest positive number which, appended to the secret key, produces an MD5 hash starting with the required number of zeroes"
)]
pub struct Config {
    /// Print program info and exit
    #[arg(long)]
    #[serde(skip)]
    pub info: bool,

    /// Print the parsed configuration and exit
    #[arg(long)]
    #[serde(skip)]
    pub print_config: bool,

    /// Configuration file path (YAML or JSON)
    #[arg(long, value_name = "FILE")]
    #[serde(skip)]
    pub config_file: Option<PathBuf>,

    /// Secret key prefixed to every candidate
    #[arg(short = 's', long, env = "STOCKING_SECRET", default_value = DEFAULT_SECRET)]
    pub secret: String,

    /// Leading zero nibbles required for part 1
    #[arg(long, env = "STOCKING_PART_ONE_ZEROS", default_value = "5")]
    pub part_one_zeros: u8,

    /// Leading zero nibbles required for part 2
    #[arg(long, env = "STOCKING_PART_TWO_ZEROS", default_value = "6")]
    pub part_two_zeros: u8,

    /// How leading zeros are checked
    #[arg(long, value_enum, default_value = "raw")]
    pub strategy: ZeroPrefixStrategy,

    /// Give up after this candidate (inclusive)
    #[arg(short = 'm', long, env = "STOCKING_MAX_CANDIDATE")]
    pub max_candidate: Option<u64>,

    /// Re-check every answer with the other zero check
    #[arg(long)]
    pub verify: bool,

    /// Report format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Log level
    #[arg(short = 'l', long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            info: false,
            print_config: false,
            config_file: None,
            secret: DEFAULT_SECRET.to_string(),
            part_one_zeros: 5,
            part_two_zeros: 6,
            strategy: ZeroPrefixStrategy::Raw,
            max_candidate: None,
            verify: false,
            output: OutputFormat::Text,
            log_level: LogLevel::Info,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Parse the command line, merge the config file if one is given, validate
    pub async fn load() -> Result<Self> {
        let matches = Self::command().get_matches();
        Self::load_from_matches(&matches).await
    }

    /// Build configuration from already parsed arguments
    pub async fn load_from_matches(matches: &ArgMatches) -> Result<Self> {
        let mut config = Self::from_arg_matches(matches)
            .map_err(|e| Error::config(format!("Invalid arguments: {}", e)))?;

        if let Some(config_file) = config.config_file.clone() {
            let file_config = Self::load_from_file(&config_file).await?;
            config = config.merge_with_file(file_config, matches);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    async fn load_from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;

        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            serde_json::from_str(&content).map_err(Error::from)
        } else {
            serde_yaml::from_str(&content).map_err(Error::from)
        }
    }

    /// Take file values for every field not set on the command line or in the environment
    fn merge_with_file(mut self, file_config: Self, matches: &ArgMatches) -> Self {
        let from_file = |id: &str| {
            !matches!(
                matches.value_source(id),
                Some(ValueSource::CommandLine) | Some(ValueSource::EnvVariable)
            )
        };

        if from_file("secret") {
            self.secret = file_config.secret;
        }
        if from_file("part_one_zeros") {
            self.part_one_zeros = file_config.part_one_zeros;
        }
        if from_file("part_two_zeros") {
            self.part_two_zeros = file_config.part_two_zeros;
        }
        if from_file("strategy") {
            self.strategy = file_config.strategy;
        }
        if from_file("max_candidate") {
            self.max_candidate = file_config.max_candidate;
        }
        if from_file("verify") {
            self.verify = file_config.verify;
        }
        if from_file("output") {
            self.output = file_config.output;
        }
        if from_file("log_level") {
            self.log_level = file_config.log_level;
        }
        if from_file("log_format") {
            self.log_format = file_config.log_format;
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.secret()?;
        self.part_one_zeros()?;
        self.part_two_zeros()?;

        if self.max_candidate == Some(0) {
            return Err(Error::config("Max candidate must be at least 1"));
        }

        Ok(())
    }

    /// Get validated secret key
    pub fn secret(&self) -> Result<Secret> {
        Secret::new(self.secret.clone())
            .map_err(|e| Error::config(format!("Invalid secret: {}", e)))
    }

    /// Get validated part 1 requirement
    pub fn part_one_zeros(&self) -> Result<LeadingZeros> {
        LeadingZeros::new(self.part_one_zeros)
            .map_err(|e| Error::config(format!("Invalid part 1 zeros: {}", e)))
    }

    /// Get validated part 2 requirement
    pub fn part_two_zeros(&self) -> Result<LeadingZeros> {
        LeadingZeros::new(self.part_two_zeros)
            .map_err(|e| Error::config(format!("Invalid part 2 zeros: {}", e)))
    }

    /// Get a miner configured with the strategy and bound
    pub fn miner(&self) -> Miner {
        Miner::new()
            .with_strategy(self.strategy)
            .with_max_candidate(self.max_candidate)
    }
}
