use futures_util::future::BoxFuture;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseSettings;
use crate::error::{DbError, DbResult};
use crate::executor::Executor;

/// Owner of the Postgres connection pool and the only transaction boundary.
///
/// The pool is safe for concurrent acquisition; cloning a `Store` shares it.
#[derive(Clone, Debug)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Build the pool from settings and verify the database answers.
    ///
    /// Both steps are bounded by `connect_timeout_secs` so an unreachable
    /// database fails startup instead of hanging it.
    pub async fn connect(settings: &DatabaseSettings) -> DbResult<Self> {
        let timeout = settings.connect_timeout();

        tracing::info!(
            host = %settings.host,
            port = settings.port,
            database = %settings.name,
            min_connections = settings.min_connections,
            max_connections = settings.max_connections,
            "connecting to postgres"
        );

        let connecting = PgPoolOptions::new()
            .min_connections(settings.min_connections)
            .max_connections(settings.max_connections)
            .acquire_timeout(timeout)
            .connect_with(settings.connect_options());

        let pool = tokio::time::timeout(timeout, connecting)
            .await
            .map_err(|_| DbError::Timeout(timeout))?
            .map_err(DbError::Connection)?;

        let store = Self::from_pool(pool);
        store.ping(timeout).await?;

        tracing::info!(database = %settings.name, "database connected");
        Ok(store)
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip `SELECT 1`, failing once `timeout` elapses.
    pub async fn ping(&self, timeout: std::time::Duration) -> DbResult<()> {
        let ping = sqlx::query("SELECT 1").execute(&self.pool);
        tokio::time::timeout(timeout, ping)
            .await
            .map_err(|_| DbError::Timeout(timeout))?
            .map_err(DbError::Connection)?;
        Ok(())
    }

    /// Run `unit_of_work` inside a fresh transaction.
    ///
    /// Commits when the unit of work returns `Ok`, rolls back when it returns
    /// `Err`. Acquire, `BEGIN` and `COMMIT` failures surface as
    /// [`DbError::Connection`]. A failed rollback is logged and never replaces
    /// the unit of work's own error. The connection goes back to the pool on
    /// every path, including when the caller's future is dropped mid-flight.
    ///
    /// The unit of work returns a boxed future, written as
    /// `|tx| async move { ... }.boxed()`.
    pub async fn with_transaction<T, F>(&self, unit_of_work: F) -> DbResult<T>
    where
        F: FnOnce(Executor) -> BoxFuture<'static, DbResult<T>> + Send,
        T: Send,
    {
        let tx = self.pool.begin().await.map_err(DbError::Connection)?;
        let executor = Executor::new(tx);

        let outcome = unit_of_work(executor.clone()).await;
        let tx = executor.take_transaction().await?;

        match outcome {
            Ok(value) => {
                tx.commit().await.map_err(DbError::Connection)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(
                        error = %rollback_err,
                        original = %err,
                        "transaction rollback failed"
                    );
                }
                Err(err)
            }
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
