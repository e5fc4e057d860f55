//! Process-wide shared store connection.
//!
//! # Responsibility
//! - Establish the store connection lazily on first use.
//! - Reuse that one connection for every later request.
//!
//! # Invariants
//! - A failed open is reported to the calling request only and is not
//!   cached; the next request attempts the open again.
//! - A panic while holding the connection does not disable the handle.
//! - The connection is released when the handle is dropped.

use super::{open_target, DbError, DbResult, DbTarget};
use log::warn;
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::sync::Mutex;

/// Lazily-opened, shareable store connection.
///
/// The handle is `Send + Sync`; concurrent callers are serialized on the
/// inner lock for the duration of one operation.
pub struct StoreHandle {
    target: DbTarget,
    conn: OnceCell<Mutex<Connection>>,
}

impl StoreHandle {
    /// Creates a handle without touching storage.
    pub fn new(target: DbTarget) -> Self {
        Self {
            target,
            conn: OnceCell::new(),
        }
    }

    /// Convenience constructor for an in-memory store.
    pub fn in_memory() -> Self {
        Self::new(DbTarget::Memory)
    }

    /// Returns whether the connection has been established.
    pub fn is_connected(&self) -> bool {
        self.conn.get().is_some()
    }

    /// Runs `op` against the shared connection, opening it first if needed.
    ///
    /// A panic inside an earlier `op` fails that request only. The next
    /// caller rolls back whatever transaction it left open and proceeds.
    ///
    /// # Errors
    /// - Returns the open/bootstrap error when the connection cannot be
    ///   established.
    pub fn with_connection<T, E>(
        &self,
        op: impl FnOnce(&Connection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<DbError>,
    {
        let cell = self.connection()?;
        let guard = match cell.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("event=store_lock module=db status=recovered reason=poisoned");
                cell.clear_poison();
                let guard = poisoned.into_inner();
                if !guard.is_autocommit() {
                    guard.execute_batch("ROLLBACK;").map_err(DbError::from)?;
                }
                guard
            }
        };
        op(&guard)
    }

    fn connection(&self) -> DbResult<&Mutex<Connection>> {
        self.conn
            .get_or_try_init(|| open_target(&self.target).map(Mutex::new))
    }
}

#[cfg(test)]
mod tests {
    use super::StoreHandle;
    use crate::db::{DbError, DbTarget};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn connection_is_opened_on_first_use_only() {
        let handle = StoreHandle::in_memory();
        assert!(!handle.is_connected());

        let version: u32 = handle
            .with_connection(|conn| {
                conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
                    .map_err(DbError::from)
            })
            .unwrap();
        assert_eq!(version, crate::db::migrations::latest_version());
        assert!(handle.is_connected());
    }

    #[test]
    fn panicking_request_does_not_break_later_requests() {
        let handle = Arc::new(StoreHandle::in_memory());
        let worker = Arc::clone(&handle);
        let crashed = thread::spawn(move || {
            let _: Result<(), DbError> = worker.with_connection(|conn| {
                conn.execute_batch(
                    "BEGIN;
                     DELETE FROM portfolios;",
                )
                .unwrap();
                panic!("request failed mid-transaction");
            });
        })
        .join();
        assert!(crashed.is_err());

        for _ in 0..2 {
            let count: i64 = handle
                .with_connection(|conn| {
                    conn.query_row("SELECT COUNT(*) FROM portfolios;", [], |row| row.get(0))
                        .map_err(DbError::from)
                })
                .unwrap();
            assert_eq!(count, 0);
        }
        let autocommit = handle
            .with_connection(|conn| Ok::<_, DbError>(conn.is_autocommit()))
            .unwrap();
        assert!(autocommit);
    }

    #[test]
    fn failed_open_is_retried_on_next_request() {
        let dir = tempfile::tempdir().unwrap();
        let missing_parent = dir.path().join("not-yet-created");
        let handle = StoreHandle::new(DbTarget::File(missing_parent.join("folio.db")));

        let first: Result<(), DbError> = handle.with_connection(|_| Ok(()));
        assert!(first.is_err());
        assert!(!handle.is_connected());

        std::fs::create_dir_all(&missing_parent).unwrap();
        let second: Result<(), DbError> = handle.with_connection(|_| Ok(()));
        assert!(second.is_ok());
        assert!(handle.is_connected());
    }
}
