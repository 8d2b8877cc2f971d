//! Parcela command-line front end.
//!
//! Runs one command against the local store and prints the result.

mod cli;
mod commands;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parcela_core::currency::DisplayFormat;
use parcela_core::{Clock, Household, SystemClock};
use parcela_shared::AppConfig;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(dir) = cli.data_dir.clone() {
        config.store.data_dir = dir;
    }

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let backends = parcela_store::open_local(&config.store);
    debug!(data_dir = %config.store.data_dir.display(), "Local store opened");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let today = clock.today();
    let mut household = Household::open(&backends, clock).await?;
    let format = DisplayFormat::from(&config.display);

    commands::run(cli.command, &mut household, &format, today).await
}
