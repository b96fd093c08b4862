use std::sync::Arc;

use crate::backend::{Backend, Registry};
use crate::error::DbError;
use crate::model::{Database, KeyValue};
use crate::query_builder::SqlBuilder;
use crate::results::ResultSet;
use crate::types::{BackendFamily, BackendType, Operation};

use super::lifecycle::{open, with_connection};

/// Routes each operation to the driver registered for the descriptor's type tag.
///
/// Every call returns its own outcome. Callers that share a `Dispatcher` across
/// threads must still not use the same [`Database`] from two threads at once.
///
/// ```rust,no_run
/// use store_middleware::prelude::*;
///
/// # fn demo() -> Result<(), DbError> {
/// let mut dbs = Databases::from_json_file("databases.json")?;
/// let dispatcher = Dispatcher::default();
/// if let Some(db) = dbs.get_mut("users") {
///     let payload = vec![KeyValue::new("name", "Alice"), KeyValue::new("age", "30")];
///     dispatcher.insert(db, "users", &payload)?;
///     let rows = dispatcher.fetch_all(db, "SELECT name, age FROM users", &[])?;
///     for row in &rows {
///         println!("{:?}", row.get("name"));
///     }
/// }
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Registry,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Registry::with_defaults())
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Open a long-lived connection; it stays open until [`Dispatcher::disconnect`].
    ///
    /// # Errors
    /// Returns a routing error or `DbError::ConnectionFailure`.
    pub fn connect(&self, db: &mut Database) -> Result<(), DbError> {
        let (_, driver) = self.route(db, Operation::Connect)?;
        open(driver.as_ref(), db)
    }

    /// Create the database named by the descriptor.
    ///
    /// # Errors
    /// Returns a routing error, `DbError::Unsupported` for variants without
    /// schema creation, or the driver's failure.
    pub fn create(&self, db: &mut Database) -> Result<(), DbError> {
        let (_, driver) = self.route(db, Operation::Create)?;
        driver
            .create(db)
            .inspect_err(|e| log_failure(db, Operation::Create, e))
    }

    /// Close the descriptor's connection. Already closed is a no-op success.
    ///
    /// # Errors
    /// Returns a routing error (even when nothing is open) or the driver's failure.
    pub fn disconnect(&self, db: &mut Database) -> Result<(), DbError> {
        let (_, driver) = self.route(db, Operation::Disconnect)?;
        if !db.is_connected() {
            return Ok(());
        }
        let result = driver.disconnect(db);
        db.take_handle();
        result.inspect_err(|e| log_failure(db, Operation::Disconnect, e))
    }

    /// Execute a statement, connecting ephemerally if `db` is not open.
    ///
    /// # Errors
    /// Returns `DbError::NullInput` for an empty statement, a routing error,
    /// `DbError::ConnectionFailure`, or the driver's failure.
    pub fn exec(&self, db: &mut Database, sql: &str) -> Result<(), DbError> {
        if sql.is_empty() {
            return Err(null_input(db, Operation::Execute, "statement"));
        }
        let (_, driver) = self.route(db, Operation::Execute)?;
        self.exec_with(driver.as_ref(), db, sql, Operation::Execute)
    }

    /// Fetch every row `query` yields, keeping those matching `filter`.
    ///
    /// # Errors
    /// Returns `DbError::NullInput` for an empty query, a routing error, or the
    /// driver's failure.
    pub fn fetch_all(
        &self,
        db: &mut Database,
        query: &str,
        filter: &[KeyValue],
    ) -> Result<ResultSet, DbError> {
        if query.is_empty() {
            return Err(null_input(db, Operation::FetchAll, "query"));
        }
        let (_, driver) = self.route(db, Operation::FetchAll)?;
        driver
            .fetch_all(db, query, filter)
            .inspect_err(|e| log_failure(db, Operation::FetchAll, e))
    }

    /// Insert `data` into `resource`.
    ///
    /// SQL-family backends get a literal `INSERT` built from `data` (in order) and
    /// executed with ephemeral-connection handling; other families use their
    /// driver's native insert.
    ///
    /// # Errors
    /// Returns `DbError::NullInput` for an empty resource or payload, a routing
    /// error, `DbError::ConnectionFailure`, or the driver's failure.
    pub fn insert(
        &self,
        db: &mut Database,
        resource: &str,
        data: &[KeyValue],
    ) -> Result<(), DbError> {
        if resource.is_empty() {
            return Err(null_input(db, Operation::Insert, "resource"));
        }
        if data.is_empty() {
            return Err(null_input(db, Operation::Insert, "insert payload"));
        }
        let (kind, driver) = self.route(db, Operation::Insert)?;

        match (kind.family(), SqlBuilder::new(kind)) {
            (BackendFamily::Sql, Some(builder)) => {
                let sql = builder.insert(resource, data)?;
                self.exec_with(driver.as_ref(), db, &sql, Operation::Insert)
            }
            _ => driver
                .insert(db, resource, data)
                .inspect_err(|e| log_failure(db, Operation::Insert, e)),
        }
    }

    fn exec_with(
        &self,
        driver: &dyn Backend,
        db: &mut Database,
        sql: &str,
        operation: Operation,
    ) -> Result<(), DbError> {
        with_connection(driver, db, |db| driver.exec(db, sql))
            .inspect_err(|e| log_failure(db, operation, e))
    }

    fn route(
        &self,
        db: &Database,
        operation: Operation,
    ) -> Result<(BackendType, Arc<dyn Backend>), DbError> {
        let kind = db.backend_type().inspect_err(|_| {
            tracing::error!(
                alias = %db.alias,
                backend = %db.kind,
                %operation,
                "Invalid database type '{}' passed to {}()",
                db.kind,
                operation
            );
        })?;

        let Some(driver) = self.registry.get(kind) else {
            tracing::error!(
                alias = %db.alias,
                backend = %kind,
                %operation,
                "No driver registered for database type '{}'",
                kind
            );
            return Err(DbError::UnknownBackendType(db.kind.clone()));
        };

        Ok((kind, driver))
    }
}

fn null_input(db: &Database, operation: Operation, what: &'static str) -> DbError {
    tracing::error!(alias = %db.alias, %operation, "No {} supplied to {}()", what, operation);
    DbError::NullInput(what)
}

fn log_failure(db: &Database, operation: Operation, err: &DbError) {
    match err {
        // already reported where the connect failed
        DbError::ConnectionFailure { .. } => {}
        DbError::Unsupported { .. } => {
            tracing::debug!(alias = %db.alias, %operation, error = %err, "operation not supported");
        }
        _ => {
            tracing::error!(alias = %db.alias, backend = %db.kind, %operation, error = %err, "database operation failed");
        }
    }
}
