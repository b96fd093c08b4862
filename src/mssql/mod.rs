// SQL Server module - bundled driver for the `tds` backend type
//
// This module is split into several sub-modules:
// - config: Descriptor to tiberius configuration and client connection
// - executor: Statement execution and fetches
// - query: Result extraction and building

pub mod config;
pub mod executor;
pub mod query;

use crate::backend::Backend;
use crate::error::DbError;
use crate::executor::with_connection;
use crate::model::{Database, KeyValue};
use crate::results::ResultSet;

pub use config::{MssqlClient, MssqlHandle, build_tiberius_config};
pub use query::build_result_set;

/// Driver for SQL Server (and other TDS speakers) using tiberius.
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlBackend;

impl Backend for MssqlBackend {
    fn connect(&self, db: &mut Database) -> Result<(), DbError> {
        let handle = MssqlHandle::connect(db)?;
        db.set_handle(handle);
        Ok(())
    }

    fn disconnect(&self, db: &mut Database) -> Result<(), DbError> {
        match db.take_handle_as::<MssqlHandle>() {
            Some(handle) => handle.close(),
            None => Ok(()),
        }
    }

    fn exec(&self, db: &mut Database, sql: &str) -> Result<(), DbError> {
        let handle = db.require_handle::<MssqlHandle>()?;
        executor::execute_batch(handle, sql)
    }

    fn fetch_all(
        &self,
        db: &mut Database,
        query: &str,
        filter: &[KeyValue],
    ) -> Result<ResultSet, DbError> {
        with_connection(self, db, |db| {
            let handle = db.require_handle::<MssqlHandle>()?;
            executor::execute_select(handle, query, filter)
        })
    }
}

// Convert tiberius errors into DbError, keeping the server's error number.
impl From<tiberius::error::Error> for DbError {
    fn from(err: tiberius::error::Error) -> Self {
        match &err {
            tiberius::error::Error::Server(token) => {
                DbError::backend(Some(token.code().to_string()), token.message())
            }
            _ => DbError::backend(None, err.to_string()),
        }
    }
}
