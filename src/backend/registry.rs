use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::Backend;
use crate::types::BackendType;

/// Maps each backend variant to the driver that serves it.
#[derive(Clone, Default)]
pub struct Registry {
    drivers: HashMap<BackendType, Arc<dyn Backend>>,
}

impl Registry {
    /// An empty registry; every tag is unroutable until a driver is registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every bundled driver compiled into this build.
    ///
    /// `ldap`, `my`, and `lmdb` ship without a driver; register one with
    /// [`Registry::register`].
    #[must_use]
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "sqlite")]
        registry.register(BackendType::Sqlite, crate::sqlite::SqliteBackend);
        #[cfg(feature = "postgres")]
        registry.register(BackendType::Postgres, crate::postgres::PostgresBackend);
        #[cfg(feature = "mssql")]
        registry.register(BackendType::Mssql, crate::mssql::MssqlBackend);
        registry
    }

    /// Register `driver` for `kind`, replacing any driver already there.
    pub fn register<B: Backend + 'static>(&mut self, kind: BackendType, driver: B) -> &mut Self {
        self.drivers.insert(kind, Arc::new(driver));
        self
    }

    /// Register an already shared driver.
    pub fn register_arc(&mut self, kind: BackendType, driver: Arc<dyn Backend>) -> &mut Self {
        self.drivers.insert(kind, driver);
        self
    }

    #[must_use]
    pub fn get(&self, kind: BackendType) -> Option<Arc<dyn Backend>> {
        self.drivers.get(&kind).cloned()
    }

    #[must_use]
    pub fn contains(&self, kind: BackendType) -> bool {
        self.drivers.contains_key(&kind)
    }
}

// Manual Debug implementation because driver trait objects do not expose `Debug`
impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&'static str> = self.drivers.keys().map(|k| k.tag()).collect();
        kinds.sort_unstable();
        f.debug_struct("Registry").field("drivers", &kinds).finish()
    }
}
