use std::fs::File;
use std::io::{self, Write};

use anyhow::{anyhow, bail, Context};
use tracing::info;

use fundamentals_core::series::{PointCache, TableRequest, YahooPointFetcher};
use fundamentals_core::CacheConfig;
use fundamentals_market_data::PriceField;
use fundamentals_storage_sqlite::SqlitePointStore;

use super::Storage;
use crate::cli::PricesArgs;

pub async fn run(args: &PricesArgs, config: &CacheConfig, storage: &Storage) -> anyhow::Result<()> {
    if args.symbols.is_empty() && args.aliases.is_empty() {
        bail!("Nothing to load: pass at least one --symbol or --alias");
    }

    // The metric name doubles as the bar field to fetch ("Adj Close", "Close").
    let field: PriceField = config
        .price_metric
        .as_str()
        .parse()
        .map_err(|e| anyhow!("Unsupported price metric '{}': {}", config.price_metric, e))?;

    let store = SqlitePointStore::new(
        storage.pool.clone(),
        storage.writer.clone(),
        config.price_metric.clone(),
    );
    let cache = PointCache::new(store, YahooPointFetcher::yahoo(field)?);

    let mut request = TableRequest::new(args.start, args.end);
    for symbol in &args.symbols {
        request = request.with_symbol(symbol.as_str());
    }
    for (name, symbol) in &args.aliases {
        request = request.with_alias(name.as_str(), symbol.as_str());
    }

    let table = cache.load_table(&request).await?;
    info!(
        "Loaded {} rows x {} columns",
        table.row_count(),
        table.columns().len()
    );

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Cannot create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    table.to_csv(writer)?;
    Ok(())
}
