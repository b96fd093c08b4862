use thiserror::Error;

use crate::types::{BackendType, Operation};

/// Errors returned by every public operation.
///
/// Each call carries its own error back to the caller; nothing is kept in
/// shared state, so concurrent callers on distinct descriptors never see each
/// other's failures.
#[derive(Debug, Error)]
pub enum DbError {
    /// A required argument (type tag, statement, resource, payload) is empty.
    #[error("No {0} supplied")]
    NullInput(&'static str),

    /// The type tag matches no compiled-in variant, or no driver is registered for it.
    #[error("Invalid database type '{0}'")]
    UnknownBackendType(String),

    /// The variant exists but its driver does not implement the operation.
    #[error("{operation} is not supported by the {backend} backend")]
    Unsupported {
        backend: BackendType,
        operation: Operation,
    },

    /// The backend connect call failed.
    #[error("Failed to connect to db on {host}: {source}")]
    ConnectionFailure {
        host: String,
        #[source]
        source: Box<DbError>,
    },

    /// A backend call failed; code and message are supplied by the driver.
    #[error("{}", backend_display(.code, .message))]
    Backend {
        code: Option<String>,
        message: String,
    },

    /// The descriptor has no usable open handle for this driver.
    #[error("Connection '{0}' is not open")]
    NotConnected(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

fn backend_display(code: &Option<String>, message: &str) -> String {
    match code {
        Some(code) => format!("Backend error {code}: {message}"),
        None => format!("Backend error: {message}"),
    }
}

impl DbError {
    /// Build a backend failure from a driver-specific code and message.
    pub fn backend(code: Option<String>, message: impl Into<String>) -> Self {
        DbError::Backend {
            code,
            message: message.into(),
        }
    }

    /// Driver-supplied error code, looking through connection failures.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            DbError::Backend { code, .. } => code.as_deref(),
            DbError::ConnectionFailure { source, .. } => source.code(),
            _ => None,
        }
    }

    /// Human-readable message; for backend failures this is the driver's text only.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            DbError::Backend { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_exposes_code_and_message() {
        let err = DbError::backend(Some("42P01".into()), "relation \"users\" does not exist");
        assert_eq!(err.code(), Some("42P01"));
        assert_eq!(err.message(), "relation \"users\" does not exist");
        assert_eq!(
            err.to_string(),
            "Backend error 42P01: relation \"users\" does not exist"
        );
    }

    #[test]
    fn connection_failure_surfaces_inner_code() {
        let err = DbError::ConnectionFailure {
            host: "db1".into(),
            source: Box::new(DbError::backend(Some("28P01".into()), "bad password")),
        };
        assert_eq!(err.code(), Some("28P01"));
        assert!(err.to_string().starts_with("Failed to connect to db on db1"));
    }

    #[test]
    fn routing_errors_carry_no_code() {
        let err = DbError::UnknownBackendType("oracle".into());
        assert_eq!(err.code(), None);
        assert_eq!(err.message(), "Invalid database type 'oracle'");
    }
}
