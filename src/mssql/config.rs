use tiberius::{AuthMethod, Client, Config as TiberiusConfig};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::error::DbError;
use crate::helpers::current_thread_runtime;
use crate::model::Database;

/// Type alias for SQL Server client
pub type MssqlClient = Client<Compat<TcpStream>>;

/// Default TDS port.
pub const DEFAULT_PORT: u16 = 1433;

/// Open SQL Server connection stored in a descriptor's handle.
pub struct MssqlHandle {
    pub(crate) client: MssqlClient,
    pub(crate) runtime: Runtime,
}

impl std::fmt::Debug for MssqlHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MssqlHandle")
            .field(&"<TiberiusConnection>")
            .finish()
    }
}

/// Build a tiberius config from a descriptor.
///
/// # Errors
/// Returns `DbError::ConfigError` if the host is missing.
pub fn build_tiberius_config(db: &Database) -> Result<TiberiusConfig, DbError> {
    if db.host.is_empty() {
        return Err(DbError::ConfigError("host is required".to_string()));
    }

    let mut config = TiberiusConfig::new();
    config.host(&db.host);
    if !db.db.is_empty() {
        config.database(&db.db);
    }
    config.port(db.port.unwrap_or(DEFAULT_PORT));
    config.authentication(AuthMethod::sql_server(&db.user, &db.pass));
    config.trust_cert();
    Ok(config)
}

impl MssqlHandle {
    /// Connect to the descriptor's server.
    ///
    /// # Errors
    /// Returns `DbError::ConfigError` for an incomplete descriptor or
    /// `DbError::Backend` if the TCP connect or login fails.
    pub fn connect(db: &Database) -> Result<Self, DbError> {
        let config = build_tiberius_config(db)?;
        let runtime = current_thread_runtime()?;

        let client = runtime.block_on(async {
            let tcp = TcpStream::connect(config.get_addr()).await.map_err(|e| {
                DbError::backend(None, format!("TCP connection error: {e}"))
            })?;
            tcp.set_nodelay(true)
                .map_err(|e| DbError::backend(None, format!("TCP configuration error: {e}")))?;
            Client::connect(config, tcp.compat_write())
                .await
                .map_err(DbError::from)
        })?;

        Ok(MssqlHandle { client, runtime })
    }

    /// Log out cleanly.
    ///
    /// # Errors
    /// Returns `DbError::Backend` if the server does not acknowledge the close.
    pub fn close(self) -> Result<(), DbError> {
        let MssqlHandle { client, runtime } = self;
        runtime.block_on(client.close())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_is_required() {
        let db = Database::new("t", "tds");
        assert!(matches!(
            build_tiberius_config(&db),
            Err(DbError::ConfigError(msg)) if msg == "host is required"
        ));
    }

    #[test]
    fn default_port_applies() {
        let db = Database::new("t", "tds")
            .with_host("sql1")
            .with_credentials("sa", "pw");
        let config = build_tiberius_config(&db).unwrap();
        assert_eq!(config.get_addr(), "sql1:1433");

        let config = build_tiberius_config(&db.with_port(Some(14330))).unwrap();
        assert_eq!(config.get_addr(), "sql1:14330");
    }
}
