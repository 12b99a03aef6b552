use std::sync::Arc;

use sqlx::{Postgres, Transaction};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

use crate::error::{DbError, DbResult};

/// Handle to the transaction of the unit of work currently running.
///
/// Cloning is cheap; every clone refers to the same transaction. The store
/// takes the transaction back out once the unit of work returns, so a clone
/// kept beyond that point only yields [`DbError::Connection`].
#[derive(Clone, Debug)]
pub struct Executor {
    tx: Arc<Mutex<Option<Transaction<'static, Postgres>>>>,
}

impl Executor {
    pub(crate) fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Lock the transaction for a single statement.
    ///
    /// Use as `.execute(&mut **guard)`.
    pub async fn acquire(&self) -> DbResult<MappedMutexGuard<'_, Transaction<'static, Postgres>>> {
        let guard = self.tx.lock().await;
        MutexGuard::try_map(guard, |slot| slot.as_mut())
            .map_err(|_| DbError::Connection(sqlx::Error::PoolClosed))
    }

    /// Takes ownership of the transaction, leaving None in its place.
    pub(crate) async fn take_transaction(&self) -> DbResult<Transaction<'static, Postgres>> {
        self.tx
            .lock()
            .await
            .take()
            .ok_or(DbError::Connection(sqlx::Error::PoolClosed))
    }
}
