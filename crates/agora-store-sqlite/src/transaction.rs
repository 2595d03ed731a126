//! Scoped transactions over pooled connections.
//!
//! [`transact`] acquires a connection, opens a transaction, runs the caller's
//! statements and commits only if they all succeed. Any `Err` drops the
//! transaction, which rolls it back. The connection returns to the pool on
//! every path.
//!
//! The statements run synchronously on the connection's own thread, so a
//! transaction is never interleaved with another one on the same connection.
//! If the awaiting future is dropped before the commit, the commit is skipped
//! and the work is rolled back.

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use rusqlite::{Transaction, TransactionBehavior};

use crate::{Error, Result, pool::Pool};

/// Run `f` inside one transaction on one pooled connection.
pub(crate) async fn transact<T, F>(
  pool: &Pool,
  behavior: TransactionBehavior,
  f: F,
) -> Result<T>
where
  T: Send + 'static,
  F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
{
  let conn = pool.acquire().await?;
  let guard = AbandonGuard::new();
  let abandoned = guard.flag();

  let outcome = conn
    .call(move |conn| {
      let tx = conn.transaction_with_behavior(behavior)?;
      let value = match f(&tx) {
        Ok(value) => value,
        Err(e) => return Ok(Err(e)),
      };
      if abandoned.load(Ordering::Acquire) {
        return Ok(Err(Error::Abandoned));
      }
      tx.commit()?;
      Ok(Ok(value))
    })
    .await;

  guard.disarm();
  outcome?
}

/// Raises its flag when dropped unless disarmed first, i.e. when the future
/// owning it is cancelled mid-transaction.
struct AbandonGuard(Option<Arc<AtomicBool>>);

impl AbandonGuard {
  fn new() -> Self { Self(Some(Arc::new(AtomicBool::new(false)))) }

  fn flag(&self) -> Arc<AtomicBool> {
    self.0.clone().unwrap_or_default()
  }

  fn disarm(mut self) { self.0 = None; }
}

impl Drop for AbandonGuard {
  fn drop(&mut self) {
    if let Some(flag) = self.0.take() {
      flag.store(true, Ordering::Release);
    }
  }
}
