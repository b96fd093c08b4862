use crate::error::DbError;
use crate::model::KeyValue;
use crate::results::ResultSet;

use super::config::MssqlHandle;
use super::query::build_result_set;

/// Execute a batch that returns no rows.
///
/// # Errors
/// Returns `DbError::Backend` with the server's error number on failure.
pub fn execute_batch(handle: &mut MssqlHandle, sql: &str) -> Result<(), DbError> {
    let MssqlHandle { client, runtime } = handle;
    runtime.block_on(async {
        let stream = client.simple_query(sql).await?;
        stream.into_results().await?;
        Ok::<(), DbError>(())
    })
}

/// Run a query and read its first result set.
///
/// # Errors
/// Returns `DbError::Backend` if execution or value extraction fails.
pub fn execute_select(
    handle: &mut MssqlHandle,
    query: &str,
    filter: &[KeyValue],
) -> Result<ResultSet, DbError> {
    let MssqlHandle { client, runtime } = handle;
    let rows = runtime.block_on(async {
        let stream = client.simple_query(query).await?;
        stream.into_first_result().await
    })?;
    build_result_set(&rows, filter)
}
