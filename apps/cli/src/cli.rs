//! CLI argument definitions.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `prices` | Daily price table for symbols and aliases, as CSV |
//! | `eps` | Interval values (e.g. EPS) for dates, from a report file |
//!
//! # Examples
//!
//! ```bash
//! fundamentals prices --symbol GOOG --symbol AAPL --start 2012-12-01 --end 2012-12-31
//! fundamentals prices --alias "S&P 500=^GSPC" --start 2012-12-01 --end 2012-12-31
//! fundamentals eps --symbol GOOG --date 2012-12-14 --reports eps.csv
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "fundamentals",
    version,
    about = "Gap-filling cache for daily prices and quarterly figures"
)]
pub struct Cli {
    /// SQLite database file. Overrides FUNDAMENTALS_DB_PATH.
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a price table over the business days of a range and print it as CSV.
    ///
    /// Only dates missing from the cache are fetched from Yahoo Finance.
    Prices(PricesArgs),

    /// Look up interval values for dates, filling misses from a report file.
    Eps(EpsArgs),
}

#[derive(Debug, Args)]
pub struct PricesArgs {
    /// Symbol to load as its own column. Repeatable.
    #[arg(long = "symbol", short = 's')]
    pub symbols: Vec<String>,

    /// Column with a display name, as NAME=SYMBOL. Repeatable.
    #[arg(long = "alias", short = 'a', value_parser = parse_alias)]
    pub aliases: Vec<(String, String)>,

    /// First day (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day, inclusive (YYYY-MM-DD).
    #[arg(long)]
    pub end: NaiveDate,

    /// Write CSV here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct EpsArgs {
    #[arg(long, short = 's')]
    pub symbol: String,

    /// Date to resolve (YYYY-MM-DD or RFC 3339). Repeatable.
    #[arg(long = "date", short = 'd', required = true)]
    pub dates: Vec<String>,

    /// CSV of reported figures with a symbol,date,value header.
    #[arg(long)]
    pub reports: PathBuf,
}

/// Parses `NAME=SYMBOL`.
pub fn parse_alias(raw: &str) -> Result<(String, String), String> {
    let (name, symbol) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=SYMBOL, got '{}'", raw))?;
    let (name, symbol) = (name.trim(), symbol.trim());
    if name.is_empty() || symbol.is_empty() {
        return Err(format!("expected NAME=SYMBOL, got '{}'", raw));
    }
    Ok((name.to_string(), symbol.to_string()))
}
