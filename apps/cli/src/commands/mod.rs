mod eps;
mod prices;

use std::sync::Arc;

use fundamentals_core::CacheConfig;
use fundamentals_storage_sqlite::{DbPool, WriteHandle};

use crate::cli::{Cli, Command};

/// Opened database shared by the commands.
pub struct Storage {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
}

impl Storage {
    pub fn open(config: &CacheConfig) -> anyhow::Result<Self> {
        let (pool, writer) = fundamentals_storage_sqlite::open(&config.db_path, config.db_pool_size)?;
        Ok(Self { pool, writer })
    }
}

pub async fn run(cli: &Cli, config: &CacheConfig) -> anyhow::Result<()> {
    let storage = Storage::open(config)?;
    match &cli.command {
        Command::Prices(args) => prices::run(args, config, &storage).await,
        Command::Eps(args) => eps::run(args, config, &storage).await,
    }
}
