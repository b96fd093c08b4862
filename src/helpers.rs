//! Rendering helpers shared by the bundled drivers.

use std::fmt::Write as _;

/// Lowercase hex rendering of binary column values.
pub(crate) fn hex_text(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Text used for SQL NULL in a [`crate::results::Field`].
pub(crate) const NULL_TEXT: &str = "";

/// Runtime owned by one open connection of an async client library.
///
/// Tasks spawned on it (the connection driver) only make progress while a call
/// is blocking on it, which is enough for one-call-at-a-time use.
#[cfg(any(feature = "postgres", feature = "mssql"))]
pub(crate) fn current_thread_runtime() -> Result<tokio::runtime::Runtime, crate::error::DbError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| crate::error::DbError::backend(None, format!("failed to start runtime: {e}")))
}
