//! Error type for `agora-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain outcome (not found, invalid input) raised inside a
  /// transaction. The transaction is rolled back before this is returned.
  #[error(transparent)]
  Domain(#[from] agora_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("invalid pool size {0}: at least one connection is required")]
  InvalidPoolSize(usize),

  #[error("connection pool is closed")]
  PoolClosed,

  /// The caller stopped waiting before the transaction committed, so it was
  /// rolled back instead.
  #[error("transaction abandoned before commit")]
  Abandoned,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Domain outcomes pass through unchanged; everything else is an
/// infrastructure failure from the caller's point of view.
impl From<Error> for agora_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Domain(inner) => inner,
      other => agora_core::Error::Store(Box::new(other)),
    }
  }
}
