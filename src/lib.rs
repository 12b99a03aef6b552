//! Bookshelf application library
//!
//! Author and book modules plus the bootstrap that wires them to the store,
//! the cache and the HTTP server.

pub mod app;
pub mod modules;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{check, Application};
