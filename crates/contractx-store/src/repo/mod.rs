//! Repository layer
//!
//! All repositories share one SQLite connection behind a mutex. The async
//! port methods run their statements on tokio's blocking pool through
//! [`with_conn`], so the lock is never taken on a runtime worker.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rusqlite::Connection;

use crate::errors::{blocking_task_failed, Result};

mod audit;
mod outbox;
mod sqlite_contract_repo;

pub use audit::SqliteAuditSink;
pub use outbox::{OutboxMessage, SqliteOutboxPublisher, CONTRACT_STATUS_TOPIC};
pub use sqlite_contract_repo::SqliteContractRepository;

/// Connection shared between repositories
pub type SharedConnection = Arc<Mutex<Connection>>;

pub(crate) fn lock(conn: &SharedConnection) -> MutexGuard<'_, Connection> {
    // A panic mid-statement leaves SQLite itself consistent.
    conn.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run `work` against the shared connection on the blocking pool
pub(crate) async fn with_conn<T, F>(conn: &SharedConnection, op: &'static str, work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
{
    let conn = Arc::clone(conn);
    tokio::task::spawn_blocking(move || {
        let mut guard = lock(&conn);
        work(&mut guard)
    })
    .await
    .map_err(|e| blocking_task_failed(op, e))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use contractx_core::errors::ExErrorKind;

    #[tokio::test]
    async fn test_with_conn_runs_statements_off_the_worker() {
        let conn: SharedConnection = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let value = with_conn(&conn, "select_one", |c| {
            c.query_row("SELECT 41 + 1", [], |row| row.get::<_, i64>(0))
                .map_err(crate::errors::from_rusqlite)
        })
        .await
        .unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_with_conn_reports_panicked_work_as_internal() {
        let conn: SharedConnection = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let err = with_conn::<(), _>(&conn, "exploding", |_| panic!("boom"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Internal);
        assert_eq!(err.op(), Some("exploding"));

        // The connection is still usable after a poisoned lock
        let ok = with_conn(&conn, "after_panic", |c| {
            c.execute_batch("SELECT 1").map_err(crate::errors::from_rusqlite)
        })
        .await;
        assert!(ok.is_ok());
    }
}
