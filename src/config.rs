use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DbError;
use crate::model::{Database, Databases};
use crate::types::BackendType;

/// Serialized shape of one connection entry.
///
/// ```json
/// { "alias": "users", "type": "pg", "host": "db1", "db": "app",
///   "user": "app", "pass": "secret", "port": 5432 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub alias: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub db: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl From<DatabaseConfig> for Database {
    fn from(cfg: DatabaseConfig) -> Self {
        Database::new(cfg.alias, cfg.kind)
            .with_host(cfg.host)
            .with_db(cfg.db)
            .with_credentials(cfg.user, cfg.pass)
            .with_port(cfg.port)
    }
}

impl From<&Database> for DatabaseConfig {
    fn from(db: &Database) -> Self {
        DatabaseConfig {
            alias: db.alias.clone(),
            kind: db.kind.clone(),
            host: db.host.clone(),
            db: db.db.clone(),
            user: db.user.clone(),
            pass: db.pass.clone(),
            port: db.port,
        }
    }
}

impl Databases {
    /// Build the collection from parsed entries, in order.
    ///
    /// # Errors
    /// Returns `DbError::ConfigError` for an empty alias or type, or a repeated alias.
    pub fn from_configs(configs: Vec<DatabaseConfig>) -> Result<Self, DbError> {
        let mut seen = HashSet::new();
        let mut dbs = Databases::new();

        for cfg in configs {
            if cfg.alias.is_empty() {
                return Err(DbError::ConfigError("alias is required".to_string()));
            }
            if cfg.kind.is_empty() {
                return Err(DbError::ConfigError(format!(
                    "type is required for '{}'",
                    cfg.alias
                )));
            }
            if !seen.insert(cfg.alias.clone()) {
                return Err(DbError::ConfigError(format!(
                    "duplicate alias '{}'",
                    cfg.alias
                )));
            }
            // Kept anyway: the build may simply lack this backend, and routing
            // reports that per call.
            if BackendType::from_tag(&cfg.kind).is_err() {
                tracing::warn!(
                    alias = %cfg.alias,
                    backend = %cfg.kind,
                    "database type is not available in this build"
                );
            }
            dbs.push(cfg.into());
        }

        Ok(dbs)
    }

    /// Parse a JSON array of [`DatabaseConfig`] entries.
    ///
    /// # Errors
    /// Returns `DbError::ConfigError` if the JSON is malformed or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, DbError> {
        let configs: Vec<DatabaseConfig> = serde_json::from_str(json)
            .map_err(|e| DbError::ConfigError(format!("invalid database config: {e}")))?;
        Self::from_configs(configs)
    }

    /// Read and parse a JSON config file.
    ///
    /// # Errors
    /// Returns `DbError::ConfigError` if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DbError::ConfigError(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&content)
    }

    /// Serialize the descriptors (without handles) back to JSON.
    ///
    /// # Errors
    /// Returns `DbError::ConfigError` if serialization fails.
    pub fn to_json_string(&self) -> Result<String, DbError> {
        let configs: Vec<DatabaseConfig> = self.iter().map(DatabaseConfig::from).collect();
        serde_json::to_string_pretty(&configs)
            .map_err(|e| DbError::ConfigError(format!("failed to serialize config: {e}")))
    }
}
