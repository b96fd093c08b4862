//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::backend::{Backend, Registry};
pub use crate::config::DatabaseConfig;
pub use crate::error::DbError;
pub use crate::executor::{Dispatcher, with_connection};
pub use crate::model::{Database, Databases, Handle, KeyValCount, KeyValue, count_keyvals};
pub use crate::query_builder::SqlBuilder;
pub use crate::results::{Field, ResultSet, Row};
pub use crate::types::{BackendFamily, BackendType, Operation};

#[cfg(feature = "mssql")]
pub use crate::mssql::MssqlBackend;
#[cfg(feature = "postgres")]
pub use crate::postgres::PostgresBackend;
#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteBackend;
