//! Statement-size helpers for SQLite.
//!
//! SQLite caps the number of bound parameters per statement
//! (`SQLITE_MAX_VARIABLE_NUMBER`, 999 on older builds). Reads bind one
//! parameter per observation date; batch writes bind one per column per row.

/// Parameters allowed in a single statement, with headroom for the
/// metric and symbol filters.
pub const SQLITE_MAX_PARAMS: usize = 900;

/// Columns bound per `point_values` row.
pub const POINT_VALUE_COLUMNS: usize = 5;

/// Splits observation-date keys for `observed_at IN (...)` reads.
///
/// ```ignore
/// for keys in chunk_keys(&storage_keys) {
///     rows.extend(load_points(conn, metric, symbol, keys)?);
/// }
/// ```
pub fn chunk_keys<T>(keys: &[T]) -> impl Iterator<Item = &[T]> {
    keys.chunks(SQLITE_MAX_PARAMS)
}

/// Splits rows for multi-row `REPLACE INTO` so that
/// `rows * columns_per_row` stays within [`SQLITE_MAX_PARAMS`].
pub fn chunk_rows<T>(rows: &[T], columns_per_row: usize) -> impl Iterator<Item = &[T]> {
    rows.chunks(rows_per_statement(columns_per_row))
}

fn rows_per_statement(columns_per_row: usize) -> usize {
    (SQLITE_MAX_PARAMS / columns_per_row.max(1)).max(1)
}
