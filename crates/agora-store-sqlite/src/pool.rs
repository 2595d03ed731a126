//! A fixed-size pool of [`tokio_rusqlite::Connection`]s.
//!
//! Every connection is opened up front. Callers take one with
//! [`Pool::acquire`]; when all are in use they wait on the semaphore, which is
//! the store's only backpressure. The connection goes back to the pool when
//! the returned guard is dropped, whatever the outcome of the work done on it.

use std::{
  ops::Deref,
  path::Path,
  sync::{Arc, Mutex, PoisonError},
  time::Duration,
};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_rusqlite::Connection;

use crate::{Error, Result, schema::CONNECTION_PRAGMAS};

/// Pool size used when the configuration does not specify one.
pub const DEFAULT_POOL_SIZE: usize = 8;

/// How long a connection waits on another connection's write lock before
/// giving up with `SQLITE_BUSY`.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

struct Inner {
  idle:    Mutex<Vec<Connection>>,
  permits: Arc<Semaphore>,
  size:    usize,
}

/// Cloning is cheap — clones share the same connections.
#[derive(Clone)]
pub struct Pool {
  inner: Arc<Inner>,
}

impl Pool {
  /// Open `size` connections to the database file at `path`.
  pub async fn open(path: &Path, size: usize) -> Result<Self> {
    if size == 0 {
      return Err(Error::InvalidPoolSize(size));
    }
    let mut conns = Vec::with_capacity(size);
    for _ in 0..size {
      let conn = Connection::open(path).await?;
      configure(&conn).await?;
      conns.push(conn);
    }
    Ok(Self::from_connections(conns))
  }

  /// A pool over a single in-memory database.
  ///
  /// Each in-memory SQLite connection is a separate database, so this pool
  /// always holds exactly one connection.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory().await?;
    configure(&conn).await?;
    Ok(Self::from_connections(vec![conn]))
  }

  fn from_connections(conns: Vec<Connection>) -> Self {
    let size = conns.len();
    Self {
      inner: Arc::new(Inner {
        idle: Mutex::new(conns),
        permits: Arc::new(Semaphore::new(size)),
        size,
      }),
    }
  }

  pub fn size(&self) -> usize { self.inner.size }

  /// Wait for a free connection.
  pub async fn acquire(&self) -> Result<PooledConnection> {
    let permit = Arc::clone(&self.inner.permits)
      .acquire_owned()
      .await
      .map_err(|_| Error::PoolClosed)?;
    // Holding a permit guarantees an idle connection: permits and idle
    // connections are created together and returned together.
    let conn = self
      .inner
      .idle
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .pop()
      .ok_or(Error::PoolClosed)?;
    Ok(PooledConnection {
      conn,
      pool: Arc::clone(&self.inner),
      _permit: permit,
    })
  }
}

async fn configure(conn: &Connection) -> Result<()> {
  conn
    .call(|conn| {
      conn.busy_timeout(BUSY_TIMEOUT)?;
      conn.execute_batch(CONNECTION_PRAGMAS)?;
      Ok(())
    })
    .await?;
  Ok(())
}

// ─── Guard ───────────────────────────────────────────────────────────────────

/// A connection on loan from the pool.
pub struct PooledConnection {
  conn:    Connection,
  pool:    Arc<Inner>,
  // Released after `drop` has put the connection back.
  _permit: OwnedSemaphorePermit,
}

impl Deref for PooledConnection {
  type Target = Connection;

  fn deref(&self) -> &Connection { &self.conn }
}

impl Drop for PooledConnection {
  fn drop(&mut self) {
    // `Connection` is a handle to the connection's thread; the clone keeps
    // that thread alive while this one is dropped.
    self
      .pool
      .idle
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .push(self.conn.clone());
  }
}
