//! Puzzle orchestration and reporting
//!
//! Runs the miner once per part against the same secret and renders the
//! answers either as `Part N: <answer>` lines or as a JSON report.

use crate::config::{Config, OutputFormat};
use crate::crypto::ZeroPrefixStrategy;
use crate::miner::{Miner, MiningStats};
use crate::utils::format_duration;
use crate::{Candidate, Error, LeadingZeros, Md5Digest, Result, Secret};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// One search of the puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Part {
    /// 1-based part number used in the report label
    pub number: u8,
    /// Zero nibbles required
    pub zeros: LeadingZeros,
}

impl Part {
    /// Label printed in front of the answer
    pub fn label(&self) -> String {
        format!("Part {}", self.number)
    }
}

/// Answer for one part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartReport {
    pub part: u8,
    pub leading_zeros: u8,
    pub answer: u64,
    pub digest: Md5Digest,
    /// Whether the other zero check confirmed the answer, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    pub stats: MiningStats,
}

/// Answers for every part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub secret: String,
    pub strategy: ZeroPrefixStrategy,
    pub parts: Vec<PartReport>,
}

impl Report {
    /// Render the report for stdout
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self
                .parts
                .iter()
                .map(|part| format!("Part {}: {}", part.part, part.answer))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// The two searches of the puzzle, in order
pub fn parts(config: &Config) -> Result<Vec<Part>> {
    Ok(vec![
        Part {
            number: 1,
            zeros: config.part_one_zeros()?,
        },
        Part {
            number: 2,
            zeros: config.part_two_zeros()?,
        },
    ])
}

/// Run every part of the puzzle described by `config`
pub fn solve(config: &Config, cancellation: CancellationToken) -> Result<Report> {
    let secret = config.secret()?;
    let miner = config.miner().with_cancellation(cancellation);

    let mut reports = Vec::new();
    for part in parts(config)? {
        reports.push(solve_part(&miner, &secret, part, config.verify)?);
    }

    Ok(Report {
        secret: secret.as_str().to_string(),
        strategy: miner.strategy(),
        parts: reports,
    })
}

fn solve_part(miner: &Miner, secret: &Secret, part: Part, verify: bool) -> Result<PartReport> {
    info!("{}: searching for {} leading zeros", part.label(), part.zeros);

    let solution = miner.mine(secret, part.zeros)?;
    info!(
        "{}: answer {} (digest {}) in {}",
        part.label(),
        solution.candidate,
        solution.digest,
        format_duration(solution.stats.elapsed())
    );

    let verified = if verify {
        cross_check(miner, secret, part.zeros, solution.candidate)?;
        Some(true)
    } else {
        None
    };

    Ok(PartReport {
        part: part.number,
        leading_zeros: part.zeros.value(),
        answer: solution.candidate.value(),
        digest: solution.digest,
        verified,
        stats: solution.stats,
    })
}

/// Confirm an answer with the other zero check: it must pass, and its
/// predecessor must not.
fn cross_check(
    miner: &Miner,
    secret: &Secret,
    zeros: LeadingZeros,
    answer: Candidate,
) -> Result<()> {
    let checker = Miner::new().with_strategy(miner.strategy().other());

    if !checker.verify(secret, answer, zeros) {
        warn!("{} check rejects answer {}", checker.strategy(), answer);
        return Err(Error::verification(format!(
            "{} check rejects answer {} for {} zeros",
            checker.strategy(),
            answer,
            zeros
        )));
    }

    if answer.value() > 1 {
        let previous = Candidate::new(answer.value() - 1);
        if checker.verify(secret, previous, zeros) {
            warn!("{} check accepts earlier candidate {}", checker.strategy(), previous);
            return Err(Error::verification(format!(
                "{} check accepts earlier candidate {} for {} zeros",
                checker.strategy(),
                previous,
                zeros
            )));
        }
    }

    Ok(())
}
