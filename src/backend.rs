//! The driver contract every backend implements, and the registry the
//! dispatcher routes through.

mod registry;

pub use registry::Registry;

use crate::error::DbError;
use crate::model::{Database, KeyValue};
use crate::results::ResultSet;
use crate::types::Operation;

/// Capability interface for one store family.
///
/// `connect` and `disconnect` are required. The rest default to
/// `DbError::Unsupported`, so a driver only implements what its store can do:
/// SQL drivers implement `exec` (inserts are built for them), directory and
/// key-value drivers implement `insert` natively, and `create` is optional.
///
/// Drivers keep their client in the descriptor's handle
/// ([`Database::set_handle`]) and must leave the descriptor disconnected after
/// `disconnect`.
pub trait Backend: Send + Sync {
    /// Open a connection and store it in `db`.
    ///
    /// # Errors
    /// Returns the driver's failure; the dispatcher wraps it as `ConnectionFailure`.
    fn connect(&self, db: &mut Database) -> Result<(), DbError>;

    /// Close the stored connection and clear the handle.
    ///
    /// # Errors
    /// Returns `DbError::Backend` if the store reports a failure while closing.
    fn disconnect(&self, db: &mut Database) -> Result<(), DbError>;

    /// Execute a statement that returns no rows.
    ///
    /// # Errors
    /// Returns `DbError::Backend` on failure, or `Unsupported` if not implemented.
    fn exec(&self, db: &mut Database, sql: &str) -> Result<(), DbError> {
        let _ = sql;
        unsupported(db, Operation::Execute)
    }

    /// Run `query` and return every row, keeping only rows that match `filter`
    /// when the driver supports filtering.
    ///
    /// # Errors
    /// Returns `DbError::Backend` on failure, or `Unsupported` if not implemented.
    fn fetch_all(
        &self,
        db: &mut Database,
        query: &str,
        filter: &[KeyValue],
    ) -> Result<ResultSet, DbError> {
        let _ = (query, filter);
        unsupported(db, Operation::FetchAll)
    }

    /// Store `data` under `resource` natively (entry DN, key prefix, ...).
    ///
    /// # Errors
    /// Returns `DbError::Backend` on failure, or `Unsupported` if not implemented.
    fn insert(&self, db: &mut Database, resource: &str, data: &[KeyValue]) -> Result<(), DbError> {
        let _ = (resource, data);
        unsupported(db, Operation::Insert)
    }

    /// Create the database named by `db.db`.
    ///
    /// # Errors
    /// Returns `DbError::Backend` on failure, or `Unsupported` if not implemented.
    fn create(&self, db: &mut Database) -> Result<(), DbError> {
        unsupported(db, Operation::Create)
    }
}

fn unsupported<T>(db: &Database, operation: Operation) -> Result<T, DbError> {
    Err(DbError::Unsupported {
        backend: db.backend_type()?,
        operation,
    })
}
