//! Stocking Stuffer Miner - Main Application
//!
//! Solves both parts of the puzzle for the configured secret and prints the
//! answers.

use stocking_stuffer_miner::{
    config::Config,
    puzzle::{self, Report},
    utils::init_logging,
    Error, Result, APP_DESCRIPTION, APP_NAME, APP_VERSION,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // No subscriber exists until the configuration names a level and format
    let config = match Config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(config.log_level, config.log_format);

    if let Err(e) = run(config).await {
        error!(category = e.category(), "{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    // Handle special commands
    if config.info {
        print_info();
        return Ok(());
    }

    if config.print_config {
        print_configuration(&config)?;
        return Ok(());
    }

    info!("Starting {} v{}", APP_NAME, APP_VERSION);
    info!(
        "Configuration: strategy={}, max_candidate={:?}, output={}",
        config.strategy, config.max_candidate, config.output
    );

    let report = mine_until_interrupted(config.clone()).await?;
    println!("{}", report.render(config.output)?);

    Ok(())
}

/// Run the searches on a blocking thread, cancelling them on Ctrl-C
async fn mine_until_interrupted(config: Config) -> Result<Report> {
    let cancellation = CancellationToken::new();
    let search_cancellation = cancellation.clone();

    let mut search =
        tokio::task::spawn_blocking(move || puzzle::solve(&config, search_cancellation));

    tokio::select! {
        result = &mut search => {
            result.map_err(|e| Error::task(e.to_string()))?
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, stopping search");
            cancellation.cancel();
            search.await.map_err(|e| Error::task(e.to_string()))?
        }
    }
}

/// Basic program information
fn info_text() -> String {
    format!("{} v{}\n{}", APP_NAME, APP_VERSION, APP_DESCRIPTION)
}

/// Print basic program information
fn print_info() {
    println!("{}", info_text());
}

/// Print current configuration
fn print_configuration(config: &Config) -> Result<()> {
    let config_yaml = serde_yaml::to_string(config)?;
    println!("{}", config_yaml);
    Ok(())
}
