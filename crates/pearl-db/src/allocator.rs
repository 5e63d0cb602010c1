//! # Sequence Allocator
//!
//! Keeps the transaction-record identifier space gapless-forward: the next
//! assigned `id` must be strictly greater than any id that exists, even if
//! rows were inserted through side channels or deleted since the counter
//! last moved.
//!
//! ## Why Resync At All?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HOW THE COUNTER GOES STALE                                             │
//! │                                                                         │
//! │  sqlite_sequence('transactions') = 42                                  │
//! │       │                                                                 │
//! │       ├── admin purge deletes rows 40-42 ──► max(id) = 39              │
//! │       ├── out-of-band import inserts id 90 ──► max(id) = 90            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  resync: seq := max(seq, max(id))  ← runs at the START OF EVERY        │
//! │                                      submission batch, not once at     │
//! │                                      process start                     │
//! │                                                                         │
//! │  The resync is an idempotent REPAIR step, not a concurrency-control    │
//! │  primitive: two in-flight submissions may both resync against the      │
//! │  same stale maximum. Actual uniqueness comes from SQLite's             │
//! │  AUTOINCREMENT machinery, which never reuses an id.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! If the resync itself fails, the submission batch aborts before any
//! record is written.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

/// Resynchronizes the transaction-id high-water mark.
///
/// Sets SQLite's `sqlite_sequence` entry for `transactions` to
/// `max(current seq, max(existing id))`. The counter never decreases and
/// no id is ever duplicated, so running this twice in a row is a no-op.
///
/// Takes a `&mut SqliteConnection` so the caller decides the transaction
/// boundary; the recorder runs it inside the same unit of work as its
/// inserts.
///
/// ## Returns
/// The next id the allocator will hand out (`max + 1`), useful for
/// diagnostics and tests.
pub async fn resync_transaction_ids(conn: &mut SqliteConnection) -> EngineResult<i64> {
    let max_id: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) FROM transactions")
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| EngineError::Allocator(e.to_string()))?;

    // sqlite_sequence exists once any AUTOINCREMENT table is created, but
    // the 'transactions' row only appears after the first insert.
    let updated = sqlx::query("UPDATE sqlite_sequence SET seq = MAX(seq, ?1) WHERE name = 'transactions'")
        .bind(max_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| EngineError::Allocator(e.to_string()))?;

    if updated.rows_affected() == 0 {
        sqlx::query("INSERT INTO sqlite_sequence (name, seq) VALUES ('transactions', ?1)")
            .bind(max_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| EngineError::Allocator(e.to_string()))?;
    }

    debug!(max_id, "Transaction id sequence resynced");

    Ok(max_id + 1)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_item(db: &Database) {
        sqlx::query(
            "INSERT INTO menuitem (itemid, itemname, itemtype, itemprice_cents, available) \
             VALUES (1, 'Classic Milk Tea', 'Drink', 575, 1)",
        )
        .execute(db.pool())
        .await
        .unwrap();
    }

    async fn insert_with_id(db: &Database, id: i64) {
        sqlx::query(
            "INSERT INTO transactions (id, sale_id, menu_item_id, quantity, price_cents, payment_method, category) \
             VALUES (?1, 0, 1, 1, 575, 'Cash', 'Sale')",
        )
        .bind(id)
        .execute(db.pool())
        .await
        .unwrap();
    }

    async fn insert_auto(db: &Database) -> i64 {
        let row = sqlx::query_scalar(
            "INSERT INTO transactions (sale_id, menu_item_id, quantity, price_cents, payment_method, category) \
             VALUES (0, 1, 1, 575, 'Cash', 'Sale') RETURNING id",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        row
    }

    #[tokio::test]
    async fn test_resync_after_out_of_band_insert() {
        let db = test_db().await;
        seed_item(&db).await;

        // Side-channel insert far ahead of the (nonexistent) counter
        insert_with_id(&db, 500).await;

        let mut conn = db.pool().acquire().await.unwrap();
        let next = resync_transaction_ids(&mut *conn).await.unwrap();
        drop(conn);
        assert_eq!(next, 501);

        assert_eq!(insert_auto(&db).await, 501);
    }

    #[tokio::test]
    async fn test_resync_after_delete_never_reuses_ids() {
        let db = test_db().await;
        seed_item(&db).await;

        insert_with_id(&db, 10).await;
        let mut conn = db.pool().acquire().await.unwrap();
        resync_transaction_ids(&mut *conn).await.unwrap();
        drop(conn);

        // Admin purge removes the highest rows
        sqlx::query("DELETE FROM transactions WHERE id >= 10")
            .execute(db.pool())
            .await
            .unwrap();

        // Resync must not walk the counter backwards
        let mut conn = db.pool().acquire().await.unwrap();
        resync_transaction_ids(&mut *conn).await.unwrap();
        drop(conn);

        assert!(insert_auto(&db).await > 10);
    }

    #[tokio::test]
    async fn test_resync_is_idempotent() {
        let db = test_db().await;
        seed_item(&db).await;
        insert_with_id(&db, 7).await;

        let mut conn = db.pool().acquire().await.unwrap();
        let first = resync_transaction_ids(&mut *conn).await.unwrap();
        let second = resync_transaction_ids(&mut *conn).await.unwrap();
        drop(conn);

        assert_eq!(first, 8);
        assert_eq!(second, 8);
    }

    #[tokio::test]
    async fn test_resync_on_empty_log() {
        let db = test_db().await;
        seed_item(&db).await;

        let mut conn = db.pool().acquire().await.unwrap();
        let next = resync_transaction_ids(&mut *conn).await.unwrap();
        drop(conn);
        assert_eq!(next, 1);

        assert_eq!(insert_auto(&db).await, 1);
    }
}
