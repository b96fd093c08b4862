use crate::backend::Backend;
use crate::error::DbError;
use crate::model::Database;

/// Run `op` against `db`, opening an ephemeral connection first if it has none.
///
/// A connection opened here is closed again before returning, whether `op`
/// succeeded or not; a connection the caller opened beforehand is left open.
/// If the open fails, `op` never runs and `DbError::ConnectionFailure` is returned.
///
/// # Errors
/// Returns `DbError::ConnectionFailure` if the ephemeral connect fails, otherwise
/// whatever `op` returns.
pub fn with_connection<B, R, F>(backend: &B, db: &mut Database, op: F) -> Result<R, DbError>
where
    B: Backend + ?Sized,
    F: FnOnce(&mut Database) -> Result<R, DbError>,
{
    let opened_here = if db.is_connected() {
        false
    } else {
        open(backend, db)?;
        true
    };

    let result = op(db);

    if opened_here {
        close(backend, db);
    }

    result
}

/// Connect through `backend`, wrapping any failure as `ConnectionFailure`.
pub(crate) fn open<B: Backend + ?Sized>(backend: &B, db: &mut Database) -> Result<(), DbError> {
    let was_connected = db.is_connected();
    backend.connect(db).map_err(|source| {
        tracing::error!(alias = %db.alias, host = %db.host, error = %source, "Failed to connect to db");
        // a failed first connect leaves the descriptor disconnected
        if !was_connected {
            db.take_handle();
        }
        match source {
            DbError::ConnectionFailure { .. } => source,
            other => DbError::ConnectionFailure {
                host: db.host.clone(),
                source: Box::new(other),
            },
        }
    })
}

fn close<B: Backend + ?Sized>(backend: &B, db: &mut Database) {
    if let Err(e) = backend.disconnect(db) {
        tracing::warn!(alias = %db.alias, host = %db.host, error = %e, "Failed to close ephemeral connection");
    }
    db.take_handle();
}
