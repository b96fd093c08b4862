use std::any::Any;
use std::fmt;

use crate::error::DbError;
use crate::types::BackendType;

/// Opaque open-connection handle owned by a [`Database`].
///
/// Drivers store whatever client type they use and get it back by downcasting.
pub struct Handle(Box<dyn Any + Send>);

impl Handle {
    pub fn new<T: Any + Send>(conn: T) -> Self {
        Handle(Box::new(conn))
    }

    #[must_use]
    pub fn downcast_mut<T: Any + Send>(&mut self) -> Option<&mut T> {
        self.0.downcast_mut::<T>()
    }

    /// Recover the concrete client, or give the handle back if the type is wrong.
    ///
    /// # Errors
    /// Returns the original handle when it does not hold a `T`.
    pub fn downcast<T: Any + Send>(self) -> Result<Box<T>, Handle> {
        self.0.downcast::<T>().map_err(Handle)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handle(<open>)")
    }
}

/// One configured connection: where it points, how to authenticate, and its
/// open handle (absent while disconnected).
///
/// A descriptor's handle is used by one caller at a time; nothing here locks it.
#[derive(Debug, Default)]
pub struct Database {
    /// Lookup key, unique within a [`crate::model::Databases`] collection
    pub alias: String,
    /// Backend type tag as configured (`pg`, `my`, `tds`, `ldap`, `lmdb`, `sqlite`)
    pub kind: String,
    pub host: String,
    /// Database name (a file path for `SQLite`, a base DN for directories)
    pub db: String,
    pub user: String,
    pub pass: String,
    pub port: Option<u16>,
    conn: Option<Handle>,
}

impl Database {
    #[must_use]
    pub fn new(alias: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_db(mut self, db: impl Into<String>) -> Self {
        self.db = db.into();
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.user = user.into();
        self.pass = pass.into();
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Resolve the configured tag to a compiled-in variant.
    ///
    /// # Errors
    /// Returns `DbError::NullInput` or `DbError::UnknownBackendType`.
    pub fn backend_type(&self) -> Result<BackendType, DbError> {
        BackendType::from_tag(&self.kind)
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Store an open client, replacing (and dropping) any previous handle.
    pub fn set_handle<T: Any + Send>(&mut self, conn: T) {
        self.conn = Some(Handle::new(conn));
    }

    #[must_use]
    pub fn handle_mut<T: Any + Send>(&mut self) -> Option<&mut T> {
        self.conn.as_mut().and_then(Handle::downcast_mut::<T>)
    }

    /// Borrow the open client or fail with `NotConnected`.
    ///
    /// # Errors
    /// Returns `DbError::NotConnected` when no handle of type `T` is stored.
    pub fn require_handle<T: Any + Send>(&mut self) -> Result<&mut T, DbError> {
        let alias = self.alias.clone();
        self.handle_mut::<T>()
            .ok_or_else(|| DbError::NotConnected(alias))
    }

    /// Remove the handle, leaving the descriptor disconnected.
    pub fn take_handle(&mut self) -> Option<Handle> {
        self.conn.take()
    }

    /// Remove and downcast the handle in one step.
    pub fn take_handle_as<T: Any + Send>(&mut self) -> Option<Box<T>> {
        self.take_handle().and_then(|h| h.downcast::<T>().ok())
    }
}
