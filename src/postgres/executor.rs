use crate::error::DbError;
use crate::model::KeyValue;
use crate::results::ResultSet;

use super::config::PgHandle;
use super::query::build_result_set;

/// Execute one or more statements that return no rows.
///
/// # Errors
/// Returns `DbError::Backend` with the SQLSTATE on failure.
pub fn execute_batch(handle: &PgHandle, sql: &str) -> Result<(), DbError> {
    handle.runtime.block_on(handle.client.batch_execute(sql))?;
    Ok(())
}

/// Run a query over the simple protocol so every value arrives as text.
///
/// # Errors
/// Returns `DbError::Backend` with the SQLSTATE on failure.
pub fn execute_select(
    handle: &PgHandle,
    query: &str,
    filter: &[KeyValue],
) -> Result<ResultSet, DbError> {
    let messages = handle.runtime.block_on(handle.client.simple_query(query))?;
    Ok(build_result_set(&messages, filter))
}

/// `CREATE DATABASE "<name>"` over an already open maintenance connection.
///
/// # Errors
/// Returns `DbError::Backend` if the server refuses (for example `42P04`, already exists).
pub fn create_database(handle: &PgHandle, name: &str) -> Result<(), DbError> {
    let sql = format!("CREATE DATABASE \"{name}\"");
    tracing::debug!(sql = %sql, "creating postgres database");
    execute_batch(handle, &sql)
}
