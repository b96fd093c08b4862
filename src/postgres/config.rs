use tokio::runtime::Runtime;
use tokio_postgres::{Client, Config as PgConfig, NoTls};

use crate::error::DbError;
use crate::helpers::current_thread_runtime;
use crate::model::Database;

/// Open `PostgreSQL` connection stored in a descriptor's handle.
pub struct PgHandle {
    // field order matters: the client must drop before its runtime
    pub(crate) client: Client,
    pub(crate) runtime: Runtime,
}

impl std::fmt::Debug for PgHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgHandle")
            .field("closed", &self.client.is_closed())
            .finish_non_exhaustive()
    }
}

/// Build a `tokio_postgres` config from a descriptor, targeting `dbname`.
///
/// # Errors
/// Returns `DbError::ConfigError` if host, database, or user is missing.
pub fn build_pg_config(db: &Database, dbname: &str) -> Result<PgConfig, DbError> {
    if db.host.is_empty() {
        return Err(DbError::ConfigError("host is required".to_string()));
    }
    if dbname.is_empty() {
        return Err(DbError::ConfigError("dbname is required".to_string()));
    }
    if db.user.is_empty() {
        return Err(DbError::ConfigError("user is required".to_string()));
    }

    let mut config = PgConfig::new();
    config
        .host(&db.host)
        .dbname(dbname)
        .user(&db.user)
        .application_name("store-middleware");
    if !db.pass.is_empty() {
        config.password(&db.pass);
    }
    if let Some(port) = db.port {
        config.port(port);
    }
    Ok(config)
}

impl PgHandle {
    /// Connect to `dbname` on the descriptor's server.
    ///
    /// # Errors
    /// Returns `DbError::ConfigError` for an incomplete descriptor or
    /// `DbError::Backend` if the server rejects the connection.
    pub fn connect(db: &Database, dbname: &str) -> Result<Self, DbError> {
        let config = build_pg_config(db, dbname)?;
        let runtime = current_thread_runtime()?;

        let (client, connection) = runtime.block_on(config.connect(NoTls))?;
        let alias = db.alias.clone();
        runtime.spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(alias = %alias, error = %e, "postgres connection error");
            }
        });

        Ok(PgHandle { client, runtime })
    }
}
