use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use tiberius::Uuid;
use tiberius::numeric::Numeric;

use crate::error::DbError;
use crate::helpers::{NULL_TEXT, hex_text};
use crate::model::KeyValue;
use crate::results::{Field, ResultSet, Row};

fn display_text<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| NULL_TEXT.to_string(), |v| v.to_string())
}

/// Render the value at `idx` as text.
///
/// Tiberius exposes typed getters only, so each candidate type is tried in turn;
/// a type mismatch moves on, a NULL of the right type renders as empty text.
///
/// # Errors
/// Returns `DbError::Backend` if the column type is none of the supported ones.
pub fn mssql_extract_text(row: &tiberius::Row, idx: usize) -> Result<String, DbError> {
    if let Ok(val) = row.try_get::<&str, _>(idx) {
        return Ok(val.unwrap_or(NULL_TEXT).to_string());
    }
    if let Ok(val) = row.try_get::<i32, _>(idx) {
        return Ok(display_text(val));
    }
    if let Ok(val) = row.try_get::<i64, _>(idx) {
        return Ok(display_text(val));
    }
    if let Ok(val) = row.try_get::<i16, _>(idx) {
        return Ok(display_text(val));
    }
    if let Ok(val) = row.try_get::<u8, _>(idx) {
        return Ok(display_text(val));
    }
    if let Ok(val) = row.try_get::<f64, _>(idx) {
        return Ok(display_text(val));
    }
    if let Ok(val) = row.try_get::<f32, _>(idx) {
        return Ok(display_text(val));
    }
    if let Ok(val) = row.try_get::<bool, _>(idx) {
        return Ok(display_text(val.map(u8::from)));
    }
    if let Ok(val) = row.try_get::<Numeric, _>(idx) {
        return Ok(display_text(val));
    }
    if let Ok(val) = row.try_get::<NaiveDateTime, _>(idx) {
        return Ok(display_text(val.map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.f"))));
    }
    if let Ok(val) = row.try_get::<DateTime<FixedOffset>, _>(idx) {
        return Ok(display_text(val.map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.f %:z"))));
    }
    if let Ok(val) = row.try_get::<NaiveDate, _>(idx) {
        return Ok(display_text(val));
    }
    if let Ok(val) = row.try_get::<NaiveTime, _>(idx) {
        return Ok(display_text(val));
    }
    if let Ok(val) = row.try_get::<Uuid, _>(idx) {
        return Ok(display_text(val));
    }
    if let Ok(val) = row.try_get::<&[u8], _>(idx) {
        return Ok(val.map_or_else(|| NULL_TEXT.to_string(), hex_text));
    }

    Err(DbError::backend(
        None,
        format!("unsupported SQL Server column type at index {idx}"),
    ))
}

/// Build a result set from tiberius rows, keeping those that match `filter`.
///
/// # Errors
/// Returns `DbError::Backend` if a value cannot be rendered.
pub fn build_result_set(rows: &[tiberius::Row], filter: &[KeyValue]) -> Result<ResultSet, DbError> {
    let mut result_set = ResultSet::with_capacity(rows.len());

    for mssql_row in rows {
        let mut fields = Vec::with_capacity(mssql_row.len());
        for (idx, col) in mssql_row.columns().iter().enumerate() {
            fields.push(Field::new(col.name(), mssql_extract_text(mssql_row, idx)?));
        }

        let row = Row::new(fields);
        if row.matches(filter) {
            result_set.add_row(row);
        }
    }

    Ok(result_set)
}
