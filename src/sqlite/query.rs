use rusqlite::Statement;
use rusqlite::types::ValueRef;

use crate::error::DbError;
use crate::helpers::{NULL_TEXT, hex_text};
use crate::model::KeyValue;
use crate::results::{Field, ResultSet, Row};

/// Render a `SQLite` value as text.
///
/// # Errors
///
/// Returns `DbError` if the column cannot be read.
pub fn sqlite_extract_text(row: &rusqlite::Row, idx: usize) -> Result<String, DbError> {
    let text = match row.get_ref(idx)? {
        ValueRef::Null => NULL_TEXT.to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Blob(bytes) => hex_text(bytes),
    };
    Ok(text)
}

/// Build a result set from a prepared `SQLite` query, keeping rows that match `filter`.
///
/// # Errors
/// Returns `DbError::Backend` if query execution or value extraction fails.
pub fn build_result_set(stmt: &mut Statement, filter: &[KeyValue]) -> Result<ResultSet, DbError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();

    let mut rows_iter = stmt.query([])?;
    let mut result_set = ResultSet::with_capacity(10);

    while let Some(row) = rows_iter.next()? {
        let mut fields = Vec::with_capacity(column_names.len());
        for (i, name) in column_names.iter().enumerate() {
            fields.push(Field::new(name.as_str(), sqlite_extract_text(row, i)?));
        }

        let row = Row::new(fields);
        if row.matches(filter) {
            result_set.add_row(row);
        }
    }

    Ok(result_set)
}
