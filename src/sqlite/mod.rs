// SQLite module - bundled driver for the `sqlite` backend type
//
// This module is split into several sub-modules:
// - config: Opening connections from a descriptor
// - executor: Statement execution and fetches against an open connection
// - query: Result extraction and building

pub mod config;
pub mod executor;
pub mod query;

use rusqlite::Connection;

use crate::backend::Backend;
use crate::error::DbError;
use crate::executor::with_connection;
use crate::model::{Database, KeyValue};
use crate::results::ResultSet;

pub use config::open_connection;
pub use query::build_result_set;

/// Driver for `SQLite` files (or `:memory:`) named by the descriptor's `db`.
///
/// `host`, `user`, and `pass` are ignored. An in-memory database lives only as
/// long as its connection, so ephemeral calls against `:memory:` always start
/// from an empty database.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteBackend;

impl Backend for SqliteBackend {
    fn connect(&self, db: &mut Database) -> Result<(), DbError> {
        let conn = open_connection(db)?;
        db.set_handle(conn);
        Ok(())
    }

    fn disconnect(&self, db: &mut Database) -> Result<(), DbError> {
        match db.take_handle_as::<Connection>() {
            Some(conn) => (*conn).close().map_err(|(_, e)| DbError::from(e)),
            None => Ok(()),
        }
    }

    fn exec(&self, db: &mut Database, sql: &str) -> Result<(), DbError> {
        let conn = db.require_handle::<Connection>()?;
        executor::execute_batch(conn, sql)
    }

    fn fetch_all(
        &self,
        db: &mut Database,
        query: &str,
        filter: &[KeyValue],
    ) -> Result<ResultSet, DbError> {
        with_connection(self, db, |db| {
            let conn = db.require_handle::<Connection>()?;
            executor::execute_select(conn, query, filter)
        })
    }
}

// Convert rusqlite::Error into DbError, keeping SQLite's extended result code.
// Prepare-time failures arrive as `SqlInputError` and carry the code too.
impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        let code = err.sqlite_error().map(|e| e.extended_code.to_string());
        let message = match &err {
            rusqlite::Error::SqliteFailure(_, Some(msg))
            | rusqlite::Error::SqlInputError { msg, .. } => msg.clone(),
            _ => err.to_string(),
        };
        DbError::backend(code, message)
    }
}
