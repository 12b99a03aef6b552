use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the store and the query layer.
///
/// `NotFound` is the structured "no rows" signal: callers match on it instead
/// of inspecting error text.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("no matching row")]
    NotFound,

    #[error("unique constraint '{constraint}' violated")]
    UniqueViolation { constraint: String },

    /// Pool acquisition, `BEGIN` and `COMMIT` failures all land here.
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("database did not respond within {0:?}")]
    Timeout(Duration),

    #[error("migration '{module}/{id}' failed: {source}")]
    Migration {
        module: String,
        id: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to read schema script {path}: {source}")]
    SchemaScript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk schema directory: {0}")]
    SchemaWalk(#[from] walkdir::Error),
}

/// Result type for store and query operations.
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound)
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation { .. })
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                DbError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or_default().to_string(),
                }
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => DbError::Connection(err),
            other => DbError::Query(other),
        }
    }
}
