//! SQLite backend for the Agora forum.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on dedicated
//! connection threads without blocking the async runtime. Connections are
//! drawn from a fixed-size pool and every operation runs inside one
//! transaction on one pooled connection.

mod encode;
mod ledger;
mod pool;
mod schema;
mod store;
mod transaction;

pub mod error;

pub use error::{Error, Result};
pub use pool::DEFAULT_POOL_SIZE;
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
