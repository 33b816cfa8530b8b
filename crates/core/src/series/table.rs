//! Multi-symbol price table built on top of the point cache.

use chrono::NaiveDate;
use log::debug;
use std::collections::HashSet;
use std::io::Write;

use super::fetcher::PointFetcher;
use super::point_cache::{PointCache, PointSeries};
use super::store::PointStore;
use super::types::{ObservationDate, Symbol};
use crate::errors::{Error, Result};
use crate::utils::time_utils::business_days_between;

/// Which columns to load and over which business days.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRequest {
    /// Columns named after the symbol itself.
    pub symbols: Vec<Symbol>,
    /// Columns with a display name different from the symbol, e.g.
    /// ("S&P 500", "^GSPC").
    pub aliases: Vec<(String, Symbol)>,
    pub start: NaiveDate,
    /// Inclusive.
    pub end: NaiveDate,
}

impl TableRequest {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbols: Vec::new(),
            aliases: Vec::new(),
            start,
            end,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<Symbol>) -> Self {
        self.symbols.push(symbol.into());
        self
    }

    pub fn with_alias(mut self, name: impl Into<String>, symbol: impl Into<Symbol>) -> Self {
        self.aliases.push((name.into(), symbol.into()));
        self
    }

    /// Column names paired with the symbol each one resolves.
    fn columns(&self) -> Result<Vec<(String, Symbol)>> {
        let columns: Vec<(String, Symbol)> = self
            .symbols
            .iter()
            .map(|symbol| (symbol.to_string(), symbol.clone()))
            .chain(self.aliases.iter().cloned())
            .collect();

        let mut seen = HashSet::new();
        for (name, _) in &columns {
            if !seen.insert(name.as_str()) {
                return Err(Error::Validation(format!("Duplicate column name '{}'", name)));
            }
        }
        Ok(columns)
    }
}

/// Date-indexed table of values, one column per symbol or alias.
///
/// Rows on which every column is NaN are not kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    columns: Vec<String>,
    dates: Vec<ObservationDate>,
    rows: Vec<Vec<f64>>,
}

impl PriceTable {
    fn from_series(dates: &[ObservationDate], columns: Vec<(String, PointSeries)>) -> Self {
        let mut table = PriceTable {
            columns: columns.iter().map(|(name, _)| name.clone()).collect(),
            ..Default::default()
        };

        for date in dates {
            let row: Vec<f64> = columns
                .iter()
                .map(|(_, series)| series.get(*date).unwrap_or(f64::NAN))
                .collect();
            if row.iter().any(|v| !v.is_nan()) {
                table.dates.push(*date);
                table.rows.push(row);
            }
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn dates(&self) -> &[ObservationDate] {
        &self.dates
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    /// Cell value; None if the column or the row does not exist.
    pub fn value(&self, column: &str, date: ObservationDate) -> Option<f64> {
        let col = self.columns.iter().position(|c| c == column)?;
        let row = self.dates.binary_search(&date).ok()?;
        Some(self.rows[row][col])
    }

    /// All (date, value) pairs of one column.
    pub fn column(&self, name: &str) -> Option<Vec<(ObservationDate, f64)>> {
        let col = self.columns.iter().position(|c| c == name)?;
        Some(
            self.dates
                .iter()
                .zip(&self.rows)
                .map(|(date, row)| (*date, row[col]))
                .collect(),
        )
    }

    /// Writes the table as CSV with a leading `Date` column. NaN cells are
    /// left empty.
    pub fn to_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push("Date".to_string());
        header.extend(self.columns.iter().cloned());
        wtr.write_record(&header)?;

        for (date, row) in self.dates.iter().zip(&self.rows) {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(date.day().format("%Y-%m-%d").to_string());
            record.extend(row.iter().map(|v| {
                if v.is_nan() {
                    String::new()
                } else {
                    v.to_string()
                }
            }));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl<S, F> PointCache<S, F>
where
    S: PointStore,
    F: PointFetcher,
{
    /// Loads every requested column over the business days of the request.
    ///
    /// Each column is resolved through [`PointCache::get`] independently, so a
    /// symbol whose dates are all cached never reaches the fetcher.
    pub async fn load_table(&self, request: &TableRequest) -> Result<PriceTable> {
        let columns = request.columns()?;
        let dates: Vec<ObservationDate> = business_days_between(request.start, request.end)
            .into_iter()
            .map(ObservationDate::from_naive_date)
            .collect();

        debug!(
            "Loading table with {} columns over {} business days",
            columns.len(),
            dates.len()
        );

        let mut loaded = Vec::with_capacity(columns.len());
        for (name, symbol) in columns {
            let series = self.get(&symbol, dates.iter().copied()).await?;
            loaded.push((name, series));
        }

        Ok(PriceTable::from_series(&dates, loaded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> ObservationDate {
        ObservationDate::from_ymd(y, m, d).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_table() -> PriceTable {
        let dates = vec![date(2012, 12, 3), date(2012, 12, 4), date(2012, 12, 5)];
        let goog = PointSeries::from_sorted(vec![
            (date(2012, 12, 3), 695.25),
            (date(2012, 12, 4), f64::NAN),
            (date(2012, 12, 5), 682.25),
        ]);
        let aapl = PointSeries::from_sorted(vec![
            (date(2012, 12, 3), 585.28),
            (date(2012, 12, 4), f64::NAN),
            (date(2012, 12, 5), f64::NAN),
        ]);
        PriceTable::from_series(&dates, vec![("GOOG".into(), goog), ("AAPL".into(), aapl)])
    }

    #[test]
    fn test_all_nan_rows_are_dropped() {
        let table = sample_table();
        assert_eq!(table.columns(), &["GOOG".to_string(), "AAPL".to_string()]);
        assert_eq!(table.dates(), &[date(2012, 12, 3), date(2012, 12, 5)]);
        assert_eq!(table.value("GOOG", date(2012, 12, 5)), Some(682.25));
        assert!(table.value("AAPL", date(2012, 12, 5)).unwrap().is_nan());
        assert_eq!(table.value("AAPL", date(2012, 12, 4)), None);
        assert_eq!(table.value("MSFT", date(2012, 12, 3)), None);
    }

    #[test]
    fn test_column_accessor() {
        let table = sample_table();
        let goog = table.column("GOOG").unwrap();
        assert_eq!(goog, vec![(date(2012, 12, 3), 695.25), (date(2012, 12, 5), 682.25)]);
        assert!(table.column("MSFT").is_none());
    }

    #[test]
    fn test_to_csv_leaves_nan_cells_empty() {
        let table = sample_table();
        let mut out = Vec::new();
        table.to_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Date,GOOG,AAPL\n2012-12-03,695.25,585.28\n2012-12-05,682.25,\n"
        );
    }

    #[test]
    fn test_duplicate_column_names_rejected() {
        let request = TableRequest::new(ymd(2012, 12, 1), ymd(2012, 12, 31))
            .with_symbol("GOOG")
            .with_alias("GOOG", "GOOGL");
        assert!(matches!(request.columns(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_alias_columns_follow_symbols() {
        let request = TableRequest::new(ymd(2012, 12, 1), ymd(2012, 12, 31))
            .with_alias("S&P 500", "^GSPC")
            .with_symbol("AAPL");
        let columns = request.columns().unwrap();
        assert_eq!(columns[0], ("AAPL".to_string(), Symbol::new("AAPL")));
        assert_eq!(columns[1], ("S&P 500".to_string(), Symbol::new("^GSPC")));
    }
}
