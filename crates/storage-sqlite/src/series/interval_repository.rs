use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::IntervalValueDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::interval_values::dsl as interval_values_dsl;
use fundamentals_core::series::{Interval, IntervalStore, Metric, ObservationDate, Symbol};
use fundamentals_core::Result;

/// Interval values of one metric in the `interval_values` table.
pub struct SqliteIntervalStore {
    pool: Arc<DbPool>,
    writer: WriteHandle,
    metric: Metric,
}

impl SqliteIntervalStore {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle, metric: Metric) -> Self {
        Self {
            pool,
            writer,
            metric,
        }
    }

    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    /// All intervals stored for `symbol`, ordered by start (unbounded first).
    pub fn list(&self, symbol: &Symbol) -> Result<Vec<Interval>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<IntervalValueDB> = interval_values_dsl::interval_values
            .filter(interval_values_dsl::metric.eq(self.metric.as_str()))
            .filter(interval_values_dsl::symbol.eq(symbol.as_str()))
            .order(interval_values_dsl::starts_at.asc())
            .select(IntervalValueDB::as_select())
            .load(&mut conn)
            .into_core()?;
        rows.iter().map(IntervalValueDB::to_interval).collect()
    }
}

#[async_trait]
impl IntervalStore for SqliteIntervalStore {
    fn find_covering(&self, symbol: &Symbol, date: ObservationDate) -> Result<Option<Interval>> {
        let mut conn = get_connection(&self.pool)?;
        let at = date.to_storage_string();

        // Bounds are fixed-width UTC strings, so text comparison is
        // chronological. NULL starts sort last under DESC. REPLACE INTO
        // assigns a fresh rowid, so the higher rowid is the later insert.
        let row: Option<IntervalValueDB> = sql_query(
            "SELECT * FROM interval_values \
             WHERE metric = ? AND symbol = ? \
               AND (starts_at IS NULL OR starts_at <= ?) \
               AND (ends_at IS NULL OR ? < ends_at) \
             ORDER BY starts_at DESC, rowid DESC \
             LIMIT 1",
        )
        .bind::<Text, _>(self.metric.as_str())
        .bind::<Text, _>(symbol.as_str())
        .bind::<Text, _>(&at)
        .bind::<Text, _>(&at)
        .get_result(&mut conn)
        .optional()
        .into_core()?;

        row.as_ref().map(IntervalValueDB::to_interval).transpose()
    }

    async fn insert(&self, symbol: &Symbol, interval: &Interval) -> Result<()> {
        let row = IntervalValueDB::new(&self.metric, symbol, interval);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::replace_into(interval_values_dsl::interval_values)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::QueryFailed)?;
                Ok(())
            })
            .await
    }
}
