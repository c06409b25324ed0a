//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `fightstats_scrape` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - One-shot or fixed-interval scheduling of runs
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use fightstats_scrape::initialization::init_logger_with;
use fightstats_scrape::{build_pipeline, run_on_interval, Config, LogFormat};

const SECONDS_PER_HOUR: u64 = 60 * 60;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let pipeline = match build_pipeline(&config).await {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("fightstats_scrape error: {:#}", e);
            process::exit(1);
        }
    };

    let Some(hours) = config.interval_hours.filter(|hours| *hours > 0) else {
        let outcome = pipeline.run().await;
        match config.log_format {
            LogFormat::Json => println!(
                "{}",
                serde_json::to_string(&outcome).context("Failed to serialize run outcome")?
            ),
            LogFormat::Plain => println!("{}", outcome.message),
        }
        if !outcome.success {
            process::exit(1);
        }
        return Ok(());
    };

    info!("Running every {} hour(s); press Ctrl-C to stop", hours);
    let period = Duration::from_secs(hours.saturating_mul(SECONDS_PER_HOUR));
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            // Without a signal listener the scheduler runs until killed
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl-C, stopping scheduler");
    };
    run_on_interval(&pipeline, period, shutdown).await;

    Ok(())
}
