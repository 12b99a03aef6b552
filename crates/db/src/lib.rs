//! Transactional store for the bookshelf service.
//!
//! [`Store`] owns the Postgres pool. Every repository call runs as one unit of
//! work through [`Store::with_transaction`], which hands the closure an
//! [`Executor`] wrapping the open transaction and commits or rolls back based
//! on the closure's result.

pub mod config;
pub mod error;
pub mod executor;
pub mod migrate;
pub mod store;

pub use config::DatabaseSettings;
pub use error::{DbError, DbResult};
pub use executor::Executor;
pub use migrate::Migration;
pub use store::Store;
