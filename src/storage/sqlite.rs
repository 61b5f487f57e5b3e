//! Shared `SQLite` connection handling.
//!
//! Utilities for the `SQLite` backend: mutex handling with poison recovery
//! and connection configuration for concurrent access.

use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use crate::Result;

/// Helper to acquire the connection mutex with poison recovery.
///
/// If the mutex is poisoned (a panic in a previous critical section), the
/// inner value is recovered and a warning is logged. The connection state is
/// still valid; `SQLite` transactions that were open at panic time were
/// rolled back by the driver.
pub fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("SQLite mutex was poisoned, recovering");
            metrics::counter!("cardbox_sqlite_mutex_poison_recovery_total").increment(1);
            poisoned.into_inner()
        },
    }
}

/// Configures a `SQLite` connection for performance and concurrency.
///
/// - **WAL mode**: concurrent readers with a single writer
/// - **NORMAL synchronous**: balances durability with performance
/// - **`busy_timeout`**: waits up to 5 seconds for locks instead of failing
///   immediately with `SQLITE_BUSY`
///
/// # Errors
///
/// Currently infallible; pragma results are ignored because `journal_mode`
/// returns a row (`"wal"`) that would fail `execute_batch`.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    let _ = conn.pragma_update(None, "journal_mode", "WAL");
    let _ = conn.pragma_update(None, "synchronous", "NORMAL");
    let _ = conn.pragma_update(None, "busy_timeout", "5000");

    Ok(())
}

/// Records count and latency for a storage operation.
pub fn record_operation(operation: &'static str, start: Instant, outcome: &'static str) {
    metrics::counter!(
        "cardbox_storage_operations_total",
        "operation" => operation,
        "outcome" => outcome,
    )
    .increment(1);
    metrics::histogram!(
        "cardbox_storage_operation_seconds",
        "operation" => operation,
    )
    .record(start.elapsed().as_secs_f64());
}
