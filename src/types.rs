use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::DbError;

/// The store families this middleware can route to.
///
/// Each variant is gated behind its own cargo feature. A variant that is compiled
/// out does not exist here, so its tag fails to parse exactly like an unknown tag:
/// ```rust
/// use store_middleware::prelude::*;
///
/// # #[cfg(feature = "postgres")]
/// assert_eq!("pg".parse::<BackendType>().unwrap(), BackendType::Postgres);
/// assert!("PG".parse::<BackendType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum BackendType {
    /// LDAP directory service
    #[cfg(feature = "ldap")]
    #[value(name = "ldap")]
    Ldap,
    /// `MySQL` / `MariaDB`
    #[cfg(feature = "mysql")]
    #[value(name = "my")]
    MySql,
    /// `PostgreSQL`
    #[cfg(feature = "postgres")]
    #[value(name = "pg")]
    Postgres,
    /// SQL Server (TDS wire protocol)
    #[cfg(feature = "mssql")]
    #[value(name = "tds")]
    Mssql,
    /// LMDB key-value store
    #[cfg(feature = "lmdb")]
    #[value(name = "lmdb")]
    Lmdb,
    /// `SQLite`
    #[cfg(feature = "sqlite")]
    #[value(name = "sqlite")]
    Sqlite,
}

/// How a backend stores data, which decides how `insert` is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendFamily {
    Directory,
    Sql,
    KeyValue,
}

impl BackendType {
    /// The configuration tag for this variant (`pg`, `my`, `tds`, ...).
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            #[cfg(feature = "ldap")]
            BackendType::Ldap => "ldap",
            #[cfg(feature = "mysql")]
            BackendType::MySql => "my",
            #[cfg(feature = "postgres")]
            BackendType::Postgres => "pg",
            #[cfg(feature = "mssql")]
            BackendType::Mssql => "tds",
            #[cfg(feature = "lmdb")]
            BackendType::Lmdb => "lmdb",
            #[cfg(feature = "sqlite")]
            BackendType::Sqlite => "sqlite",
        }
    }

    #[must_use]
    pub fn family(self) -> BackendFamily {
        match self {
            #[cfg(feature = "ldap")]
            BackendType::Ldap => BackendFamily::Directory,
            #[cfg(feature = "mysql")]
            BackendType::MySql => BackendFamily::Sql,
            #[cfg(feature = "postgres")]
            BackendType::Postgres => BackendFamily::Sql,
            #[cfg(feature = "mssql")]
            BackendType::Mssql => BackendFamily::Sql,
            #[cfg(feature = "lmdb")]
            BackendType::Lmdb => BackendFamily::KeyValue,
            #[cfg(feature = "sqlite")]
            BackendType::Sqlite => BackendFamily::Sql,
        }
    }

    /// Value delimiter used when building literal SQL for this variant.
    ///
    /// `None` for variants outside the SQL family; those implement their own insert.
    /// Values are wrapped as-is: embedded quotes and SQL metacharacters are not
    /// escaped, so payloads must come from trusted input.
    #[must_use]
    pub fn value_quote(self) -> Option<char> {
        match self {
            #[cfg(feature = "ldap")]
            BackendType::Ldap => None,
            #[cfg(feature = "mysql")]
            BackendType::MySql => Some('"'),
            #[cfg(feature = "postgres")]
            BackendType::Postgres => Some('\''),
            #[cfg(feature = "mssql")]
            BackendType::Mssql => Some('\''),
            #[cfg(feature = "lmdb")]
            BackendType::Lmdb => None,
            #[cfg(feature = "sqlite")]
            BackendType::Sqlite => Some('\''),
        }
    }

    /// Parse a configuration tag, case-sensitively.
    ///
    /// # Errors
    /// Returns `DbError::NullInput` for an empty tag and `DbError::UnknownBackendType`
    /// when the tag names no compiled-in variant.
    pub fn from_tag(tag: &str) -> Result<Self, DbError> {
        if tag.is_empty() {
            return Err(DbError::NullInput("database type"));
        }
        <BackendType as ValueEnum>::from_str(tag, false)
            .map_err(|_| DbError::UnknownBackendType(tag.to_string()))
    }
}

impl FromStr for BackendType {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendType::from_tag(s)
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The public operations, used in errors and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Connect,
    Create,
    Disconnect,
    Execute,
    FetchAll,
    Insert,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Connect => "connect",
            Operation::Create => "create",
            Operation::Disconnect => "disconnect",
            Operation::Execute => "exec",
            Operation::FetchAll => "fetch_all",
            Operation::Insert => "insert",
        };
        f.write_str(name)
    }
}
