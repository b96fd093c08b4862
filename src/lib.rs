//! One synchronous data-access API over directory, relational, and key-value stores.
//!
//! A [`model::Database`] descriptor names its backend with a type tag (`pg`, `my`,
//! `tds`, `sqlite`, `ldap`, `lmdb`). The [`executor::Dispatcher`] resolves that tag
//! to a registered [`backend::Backend`] driver on every call, so calling code never
//! branches on backend type:
//!
//! ```rust
//! use store_middleware::prelude::*;
//!
//! # #[cfg(feature = "sqlite")]
//! # fn demo() -> Result<(), DbError> {
//! let dispatcher = Dispatcher::default();
//! let mut db = Database::new("scratch", "sqlite");
//! dispatcher.connect(&mut db)?;
//! dispatcher.exec(&mut db, "CREATE TABLE users (name TEXT, age INTEGER)")?;
//! dispatcher.insert(
//!     &mut db,
//!     "users",
//!     &[KeyValue::new("name", "Alice"), KeyValue::new("age", "30")],
//! )?;
//! let rows = dispatcher.fetch_all(&mut db, "SELECT name, age FROM users", &[])?;
//! assert_eq!(rows.row_count(), 1);
//! assert_eq!(rows.rows[0].get("age"), Some("30"));
//! dispatcher.disconnect(&mut db)?;
//! # Ok(()) }
//! # #[cfg(feature = "sqlite")]
//! # demo().unwrap();
//! ```
//!
//! Statements and fetches on a descriptor that is not connected open a connection
//! for that call only and close it before returning. Connections opened with
//! [`executor::Dispatcher::connect`] stay open until
//! [`executor::Dispatcher::disconnect`].
//!
//! Inserts into SQL backends are built as literal SQL with no escaping; see
//! [`query_builder::SqlBuilder`].

pub mod backend;
pub mod config;
pub mod error;
pub mod executor;
mod helpers;
pub mod model;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod types;

#[cfg(feature = "mssql")]
pub mod mssql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use error::DbError;
