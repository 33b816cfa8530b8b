//! Database models for cached series values.

use chrono::Utc;
use diesel::prelude::*;

use fundamentals_core::errors::{DatabaseError, Error, Result};
use fundamentals_core::series::{Bound, Interval, Metric, ObservationDate, PointValue, Symbol};

/// Database model for point values
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::point_values)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PointValueDB {
    pub metric: String,
    pub symbol: String,
    pub observed_at: String,
    pub value: Option<f64>,
    pub created_at: String,
}

impl PointValueDB {
    pub fn new(metric: &Metric, symbol: &Symbol, date: ObservationDate, value: PointValue) -> Self {
        Self {
            metric: metric.as_str().to_string(),
            symbol: symbol.as_str().to_string(),
            observed_at: date.to_storage_string(),
            value: value.as_option(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// NULL is NoData.
    pub fn point_value(&self) -> PointValue {
        PointValue::from_option(self.value)
    }
}

/// Database model for interval values
#[derive(Queryable, Selectable, Insertable, QueryableByName, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::interval_values)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IntervalValueDB {
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub id: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub metric: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub symbol: String,
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub starts_at: Option<String>,
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub ends_at: Option<String>,
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Double>)]
    pub value: Option<f64>,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub created_at: String,
}

fn bound_to_column(bound: Bound) -> Option<String> {
    bound.as_option().map(|date| date.to_storage_string())
}

fn column_to_bound(column: Option<&str>) -> Result<Bound> {
    match column {
        None => Ok(Bound::Unbounded),
        Some(raw) => ObservationDate::parse(raw).map(Bound::At).ok_or_else(|| {
            Error::Database(DatabaseError::Internal(format!(
                "Invalid interval bound '{}'",
                raw
            )))
        }),
    }
}

/// Deterministic id: the same bounds for the same series map to one row.
pub fn interval_id(metric: &Metric, symbol: &Symbol, interval: &Interval) -> String {
    format!(
        "{}:{}:{}:{}",
        metric,
        symbol,
        bound_to_column(interval.start).unwrap_or_else(|| "-".to_string()),
        bound_to_column(interval.end).unwrap_or_else(|| "-".to_string())
    )
}

impl IntervalValueDB {
    pub fn new(metric: &Metric, symbol: &Symbol, interval: &Interval) -> Self {
        Self {
            id: interval_id(metric, symbol, interval),
            metric: metric.as_str().to_string(),
            symbol: symbol.as_str().to_string(),
            starts_at: bound_to_column(interval.start),
            ends_at: bound_to_column(interval.end),
            // SQLite has no NaN; it is stored as NULL.
            value: Some(interval.value).filter(|v| !v.is_nan()),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn to_interval(&self) -> Result<Interval> {
        Ok(Interval {
            start: column_to_bound(self.starts_at.as_deref())?,
            end: column_to_bound(self.ends_at.as_deref())?,
            value: self.value.unwrap_or(f64::NAN),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> ObservationDate {
        ObservationDate::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_point_row_maps_no_data_to_null() {
        let row = PointValueDB::new(
            &Metric::new("Adj Close"),
            &Symbol::new("GOOG"),
            date(2012, 12, 1),
            PointValue::NoData,
        );
        assert_eq!(row.observed_at, "2012-12-01T00:00:00Z");
        assert_eq!(row.value, None);
        assert!(row.point_value().is_no_data());
    }

    #[test]
    fn test_interval_row_round_trip() {
        let interval = Interval::new(date(2012, 12, 1), Bound::Unbounded, 6.5);
        let row = IntervalValueDB::new(&Metric::new("EPS"), &Symbol::new("CSCO"), &interval);
        assert_eq!(row.id, "EPS:CSCO:2012-12-01T00:00:00Z:-");
        assert_eq!(row.ends_at, None);
        assert_eq!(row.to_interval().unwrap(), interval);
    }

    #[test]
    fn test_nan_interval_value_is_null() {
        let interval = Interval::new(Bound::Unbounded, date(2012, 7, 19), f64::NAN);
        let row = IntervalValueDB::new(&Metric::new("EPS"), &Symbol::new("GOOG"), &interval);
        assert_eq!(row.value, None);
        assert!(row.to_interval().unwrap().value.is_nan());
    }

    #[test]
    fn test_corrupt_bound_is_an_error() {
        let mut row = IntervalValueDB::new(
            &Metric::new("EPS"),
            &Symbol::new("GOOG"),
            &Interval::new(Bound::Unbounded, Bound::Unbounded, 1.0),
        );
        row.starts_at = Some("yesterday".to_string());
        assert!(row.to_interval().is_err());
    }
}
