use std::io;

use anyhow::Context;
use tracing::info;

use fundamentals_core::series::{
    CsvReportSource, IntervalCache, ObservationDate, ReportScheduleFetcher, Symbol,
};
use fundamentals_core::CacheConfig;
use fundamentals_storage_sqlite::SqliteIntervalStore;

use super::Storage;
use crate::cli::EpsArgs;

pub async fn run(args: &EpsArgs, config: &CacheConfig, storage: &Storage) -> anyhow::Result<()> {
    let dates = args
        .dates
        .iter()
        .map(|raw| {
            ObservationDate::parse_lenient(raw).with_context(|| format!("Invalid date '{}'", raw))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let source = CsvReportSource::from_path(&args.reports)?;
    let store = SqliteIntervalStore::new(
        storage.pool.clone(),
        storage.writer.clone(),
        config.eps_metric.clone(),
    );
    let cache = IntervalCache::new(store, ReportScheduleFetcher::new(source));

    let symbol = Symbol::new(args.symbol.as_str());
    let values = cache.get_all(&symbol, dates).await?;
    info!("Resolved {} {} values for {}", values.len(), config.eps_metric, symbol);

    let mut wtr = csv::Writer::from_writer(io::stdout().lock());
    wtr.write_record(["Date", config.eps_metric.as_str()])?;
    for (date, value) in values {
        let cell = if value.is_nan() {
            String::new()
        } else {
            value.to_string()
        };
        wtr.write_record([date.day().format("%Y-%m-%d").to_string(), cell])?;
    }
    wtr.flush()?;
    Ok(())
}
