use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::model::PointValueDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::point_values::dsl as point_values_dsl;
use crate::utils::{chunk_keys, chunk_rows, POINT_VALUE_COLUMNS};
use fundamentals_core::series::{Metric, ObservationDate, PointStore, PointValue, Symbol};
use fundamentals_core::Result;

/// Point values of one metric in the `point_values` table.
pub struct SqlitePointStore {
    pool: Arc<DbPool>,
    writer: WriteHandle,
    metric: Metric,
}

impl SqlitePointStore {
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

    /// Number of rows stored for `symbol` under this metric.
    pub fn count(&self, symbol: &Symbol) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        point_values_dsl::point_values
            .filter(point_values_dsl::metric.eq(self.metric.as_str()))
            .filter(point_values_dsl::symbol.eq(symbol.as_str()))
            .count()
            .get_result(&mut conn)
            .into_core()
    }
}

#[async_trait]
impl PointStore for SqlitePointStore {
    fn get(
        &self,
        symbol: &Symbol,
        dates: &[ObservationDate],
    ) -> Result<HashMap<ObservationDate, PointValue>> {
        if dates.is_empty() {
            return Ok(HashMap::new());
        }

        let keys: Vec<String> = dates.iter().map(|d| d.to_storage_string()).collect();
        let by_key: HashMap<&str, ObservationDate> = keys
            .iter()
            .map(String::as_str)
            .zip(dates.iter().copied())
            .collect();

        let mut conn = get_connection(&self.pool)?;
        let mut found = HashMap::with_capacity(dates.len());

        for chunk in chunk_keys(&keys) {
            let rows: Vec<PointValueDB> = point_values_dsl::point_values
                .filter(point_values_dsl::metric.eq(self.metric.as_str()))
                .filter(point_values_dsl::symbol.eq(symbol.as_str()))
                .filter(point_values_dsl::observed_at.eq_any(chunk))
                .select(PointValueDB::as_select())
                .load(&mut conn)
                .into_core()?;

            for row in rows {
                if let Some(date) = by_key.get(row.observed_at.as_str()) {
                    found.insert(*date, row.point_value());
                }
            }
        }

        debug!(
            "Loaded {} of {} {} values for {}",
            found.len(),
            dates.len(),
            self.metric,
            symbol
        );
        Ok(found)
    }

    async fn set(&self, symbol: &Symbol, date: ObservationDate, value: PointValue) -> Result<()> {
        let row = PointValueDB::new(&self.metric, symbol, date, value);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::replace_into(point_values_dsl::point_values)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::QueryFailed)?;
                Ok(())
            })
            .await
    }

    async fn set_batch(
        &self,
        symbol: &Symbol,
        entries: &[(ObservationDate, PointValue)],
    ) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }

        let rows: Vec<PointValueDB> = entries
            .iter()
            .map(|(date, value)| PointValueDB::new(&self.metric, symbol, *date, *value))
            .collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut total = 0;
                for chunk in chunk_rows(&rows, POINT_VALUE_COLUMNS) {
                    total += diesel::replace_into(point_values_dsl::point_values)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::QueryFailed)?;
                }
                Ok(total)
            })
            .await
    }
}
