use std::time::Duration;

use rusqlite::Connection;

use crate::error::DbError;
use crate::model::Database;

/// Path used when the descriptor names no database file.
pub const MEMORY_PATH: &str = ":memory:";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the `SQLite` database named by `db.db` (`:memory:` when empty).
///
/// # Errors
/// Returns `DbError::Backend` if the file cannot be opened or configured.
pub fn open_connection(db: &Database) -> Result<Connection, DbError> {
    let path = if db.db.is_empty() {
        MEMORY_PATH
    } else {
        db.db.as_str()
    };

    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    tracing::debug!(alias = %db.alias, path, "opened sqlite connection");
    Ok(conn)
}
