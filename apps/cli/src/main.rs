mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fundamentals_core::CacheConfig;

use crate::cli::Cli;

const LOG_FORMAT_ENV: &str = "FUNDAMENTALS_LOG_FORMAT";

/// Logs go to stderr so that CSV on stdout stays clean.
fn init_tracing() {
    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = CacheConfig::from_env()?;
    init_tracing();

    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    tracing::info!("Database path in use: {}", config.db_path);

    commands::run(&cli, &config).await
}
