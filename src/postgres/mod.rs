// PostgreSQL module - bundled driver for the `pg` backend type
//
// This module is split into several sub-modules:
// - config: Descriptor validation and client connection
// - executor: Statement execution, fetches, and database creation
// - query: Result extraction and building

pub mod config;
pub mod executor;
pub mod query;

use crate::backend::Backend;
use crate::error::DbError;
use crate::executor::with_connection;
use crate::model::{Database, KeyValue};
use crate::results::ResultSet;

pub use config::{PgHandle, build_pg_config};
pub use query::build_result_set;

/// Default maintenance database used to issue `CREATE DATABASE`.
pub const MAINTENANCE_DB: &str = "postgres";

/// Driver for `PostgreSQL` servers.
///
/// Supports schema `create`: the database named by the descriptor is created
/// through a separate connection to the maintenance database.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresBackend;

impl Backend for PostgresBackend {
    fn connect(&self, db: &mut Database) -> Result<(), DbError> {
        let handle = PgHandle::connect(db, &db.db)?;
        db.set_handle(handle);
        Ok(())
    }

    fn disconnect(&self, db: &mut Database) -> Result<(), DbError> {
        // dropping the client ends the connection task; the runtime goes with it
        drop(db.take_handle_as::<PgHandle>());
        Ok(())
    }

    fn exec(&self, db: &mut Database, sql: &str) -> Result<(), DbError> {
        let handle = db.require_handle::<PgHandle>()?;
        executor::execute_batch(handle, sql)
    }

    fn fetch_all(
        &self,
        db: &mut Database,
        query: &str,
        filter: &[KeyValue],
    ) -> Result<ResultSet, DbError> {
        with_connection(self, db, |db| {
            let handle = db.require_handle::<PgHandle>()?;
            executor::execute_select(handle, query, filter)
        })
    }

    fn create(&self, db: &mut Database) -> Result<(), DbError> {
        if db.db.is_empty() {
            return Err(DbError::NullInput("database name"));
        }
        let handle = PgHandle::connect(db, MAINTENANCE_DB)?;
        executor::create_database(&handle, &db.db)
    }
}

// Convert tokio_postgres::Error into DbError, keeping the SQLSTATE.
impl From<tokio_postgres::Error> for DbError {
    fn from(err: tokio_postgres::Error) -> Self {
        let code = err.code().map(|state| state.code().to_string());
        let message = err
            .as_db_error()
            .map_or_else(|| err.to_string(), |db_err| db_err.message().to_string());
        DbError::backend(code, message)
    }
}
