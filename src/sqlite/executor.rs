use rusqlite::Connection;

use crate::error::DbError;
use crate::model::KeyValue;
use crate::results::ResultSet;

use super::query::build_result_set;

/// Execute one or more statements that return no rows.
///
/// # Errors
/// Returns `DbError::Backend` with SQLite's extended code on failure.
pub fn execute_batch(conn: &Connection, sql: &str) -> Result<(), DbError> {
    conn.execute_batch(sql)?;
    Ok(())
}

/// Run a SELECT and collect the rows that match `filter`.
///
/// # Errors
/// Returns `DbError::Backend` if preparing or stepping the statement fails.
pub fn execute_select(
    conn: &Connection,
    query: &str,
    filter: &[KeyValue],
) -> Result<ResultSet, DbError> {
    let mut stmt = conn.prepare(query)?;
    build_result_set(&mut stmt, filter)
}
