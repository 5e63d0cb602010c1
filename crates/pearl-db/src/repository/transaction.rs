//! # Transaction Repository
//!
//! The Transaction Recorder: turns a logical sale into one transaction
//! record per line item, inside a single atomic unit of work.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       submit_sale()                                     │
//! │                                                                         │
//! │  1. VALIDATE (pure, pearl-core)                                        │
//! │     └── bad input → ValidationError, zero I/O attempted                │
//! │                                                                         │
//! │  2. BEGIN TRANSACTION                                                  │
//! │     └── resync_transaction_ids()  ← allocator repair, fail-fast        │
//! │                                                                         │
//! │  3. FOR EACH LINE ITEM, IN INPUT ORDER                                 │
//! │     └── INSERT INTO transactions (quantity=1, price verbatim,          │
//! │         sale_id=0 sentinel, category='Sale') RETURNING id              │
//! │                                                                         │
//! │  4. ANY FAILURE → ROLLBACK (no partial sale survives)                  │
//! │                                                                         │
//! │  5. COMMIT → SaleReceipt { recorded_lines, transaction_ids }           │
//! │                                                                         │
//! │  NOT DONE HERE (deliberate decoupling):                                │
//! │  • no inventory adjustment (separate, independently callable path)     │
//! │  • no sale header row (line items stay sentinel-linked)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Referential integrity against the catalog is enforced by the foreign key
//! on `menu_item_id`: a line naming an unknown item fails the batch and
//! rolls back everything written so far.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::allocator;
use crate::error::EngineResult;
use pearl_core::validation::validate_sale_submission;
use pearl_core::{
    SaleReceipt, SaleSubmission, TransactionCategory, TransactionRecord, UNLINKED_SALE_ID,
};

/// Repository for the append-only transaction log.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Records a logical sale as one transaction record per line item.
    ///
    /// All-or-nothing per sale: either every line is persisted with a
    /// fresh, strictly-increasing id, or none are. The allocator resync
    /// runs first inside the same transaction, so a resync failure aborts
    /// before anything is written.
    ///
    /// Each cart line is exactly one sold unit (`quantity = 1`); the price
    /// is captured verbatim from the request, not re-read from the catalog.
    pub async fn submit_sale(&self, submission: &SaleSubmission) -> EngineResult<SaleReceipt> {
        validate_sale_submission(submission)?;

        debug!(
            customer = %submission.customer_name,
            payer_id = submission.payer_id,
            lines = submission.items.len(),
            "Submitting sale"
        );

        let mut tx = self.pool.begin().await?;

        allocator::resync_transaction_ids(&mut *tx).await?;

        let mut transaction_ids = Vec::with_capacity(submission.items.len());
        for line in &submission.items {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO transactions \
                    (sale_id, menu_item_id, quantity, price_cents, payment_method, category) \
                 VALUES (?1, ?2, 1, ?3, ?4, ?5) \
                 RETURNING id",
            )
            .bind(UNLINKED_SALE_ID)
            .bind(line.item_id)
            .bind(line.price_cents)
            .bind(&submission.payment_method)
            .bind(TransactionCategory::Sale)
            .fetch_one(&mut *tx)
            .await?;

            transaction_ids.push(id);
        }

        tx.commit().await?;

        info!(
            customer = %submission.customer_name,
            recorded = transaction_ids.len(),
            "Sale recorded"
        );

        Ok(SaleReceipt {
            recorded_lines: transaction_ids.len(),
            transaction_ids,
        })
    }

    /// Records a correction as a new adjustment row.
    ///
    /// The log is append-only: a return, void, or discard never edits the
    /// original `Sale` row, it adds a new row with the adjustment category
    /// and a positive magnitude.
    pub async fn record_adjustment(
        &self,
        menu_item_id: i64,
        quantity: i64,
        price_cents: i64,
        payment_method: &str,
        category: TransactionCategory,
    ) -> EngineResult<i64> {
        debug!(menu_item_id, quantity, category = category.as_str(), "Recording adjustment");

        let mut tx = self.pool.begin().await?;

        allocator::resync_transaction_ids(&mut *tx).await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO transactions \
                (sale_id, menu_item_id, quantity, price_cents, payment_method, category) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             RETURNING id",
        )
        .bind(UNLINKED_SALE_ID)
        .bind(menu_item_id)
        .bind(quantity)
        .bind(price_cents)
        .bind(payment_method)
        .bind(category)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(id)
    }

    /// Returns the most recent transaction records, newest first.
    pub async fn recent(&self, limit: u32) -> EngineResult<Vec<TransactionRecord>> {
        let records = sqlx::query_as::<_, TransactionRecord>(
            "SELECT id, sale_id, menu_item_id, quantity, price_cents, payment_method, category \
             FROM transactions \
             ORDER BY id DESC \
             LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Gets one transaction record by id.
    pub async fn get_by_id(&self, id: i64) -> EngineResult<Option<TransactionRecord>> {
        let record = sqlx::query_as::<_, TransactionRecord>(
            "SELECT id, sale_id, menu_item_id, quantity, price_cents, payment_method, category \
             FROM transactions \
             WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// The next id the allocator would assign, after a fresh resync.
    ///
    /// Diagnostic view; submissions re-run the resync themselves.
    pub async fn next_transaction_id(&self) -> EngineResult<i64> {
        let mut conn = self.pool.acquire().await?;
        allocator::resync_transaction_ids(&mut *conn).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use pearl_core::{SaleLine, ValidationError};

    async fn test_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for (id, name, kind, price) in [
            (1, "Classic Milk Tea", "Drink", 575),
            (2, "Taro Milk Tea", "Drink", 625),
            (3, "Pumpkin Spice Tea", "Seasonal", 650),
        ] {
            sqlx::query(
                "INSERT INTO menuitem (itemid, itemname, itemtype, itemprice_cents, available) \
                 VALUES (?1, ?2, ?3, ?4, 1)",
            )
            .bind(id)
            .bind(name)
            .bind(kind)
            .bind(price)
            .execute(db.pool())
            .await
            .unwrap();
        }
        db
    }

    fn submission(items: Vec<SaleLine>) -> SaleSubmission {
        SaleSubmission {
            customer_name: "Ada".to_string(),
            payer_id: 1,
            items,
            payment_method: "Cash".to_string(),
        }
    }

    async fn count_rows(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_submit_creates_one_row_per_line() {
        let db = test_db().await;
        let repo = db.transactions();

        let receipt = repo
            .submit_sale(&submission(vec![
                SaleLine { item_id: 1, price_cents: 575 },
                SaleLine { item_id: 2, price_cents: 625 },
                SaleLine { item_id: 1, price_cents: 575 },
            ]))
            .await
            .unwrap();

        assert_eq!(receipt.recorded_lines, 3);
        assert_eq!(count_rows(&db).await, 3);

        // Ids are distinct and strictly increasing in input order
        assert!(receipt.transaction_ids.windows(2).all(|w| w[0] < w[1]));

        // The allocator's next id exceeds every assigned id
        let next = repo.next_transaction_id().await.unwrap();
        assert!(receipt.transaction_ids.iter().all(|id| *id < next));
    }

    #[tokio::test]
    async fn test_submitted_lines_capture_request_fields() {
        let db = test_db().await;
        let repo = db.transactions();

        // Price deliberately differs from the catalog price: the request
        // value must be captured verbatim
        repo.submit_sale(&submission(vec![SaleLine { item_id: 2, price_cents: 99 }]))
            .await
            .unwrap();

        let records = repo.recent(10).await.unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.menu_item_id, 2);
        assert_eq!(record.price_cents, 99);
        assert_eq!(record.quantity, 1);
        assert_eq!(record.sale_id, UNLINKED_SALE_ID);
        assert_eq!(record.category, TransactionCategory::Sale);
        assert_eq!(record.payment_method, "Cash");
    }

    #[tokio::test]
    async fn test_invalid_line_persists_nothing() {
        let db = test_db().await;
        let repo = db.transactions();

        // Invalid first, middle, and last line: always full rejection
        for bad_index in [0usize, 1, 2] {
            let mut items = vec![
                SaleLine { item_id: 1, price_cents: 575 },
                SaleLine { item_id: 2, price_cents: 625 },
                SaleLine { item_id: 3, price_cents: 650 },
            ];
            items[bad_index].price_cents = -1;

            let err = repo.submit_sale(&submission(items)).await.unwrap_err();
            assert!(matches!(
                err,
                crate::error::EngineError::Validation(ValidationError::InvalidLineItem { .. })
            ));
            assert_eq!(count_rows(&db).await, 0);
        }
    }

    #[tokio::test]
    async fn test_mid_batch_failure_rolls_back_earlier_lines() {
        let db = test_db().await;
        let repo = db.transactions();

        // Passes pure validation, but item 999 violates the catalog FK on
        // the third insert; lines one and two must be rolled back
        let err = repo
            .submit_sale(&submission(vec![
                SaleLine { item_id: 1, price_cents: 575 },
                SaleLine { item_id: 2, price_cents: 625 },
                SaleLine { item_id: 999, price_cents: 100 },
            ]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            crate::error::EngineError::ForeignKeyViolation { .. }
        ));
        assert_eq!(count_rows(&db).await, 0);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_before_io() {
        let db = test_db().await;
        let repo = db.transactions();

        let err = repo.submit_sale(&submission(vec![])).await.unwrap_err();
        assert!(matches!(err, crate::error::EngineError::Validation(_)));
        assert_eq!(count_rows(&db).await, 0);
    }

    #[tokio::test]
    async fn test_ids_survive_out_of_band_churn() {
        let db = test_db().await;
        let repo = db.transactions();

        let first = repo
            .submit_sale(&submission(vec![SaleLine { item_id: 1, price_cents: 575 }]))
            .await
            .unwrap();

        // Out-of-band import far ahead of the counter
        sqlx::query(
            "INSERT INTO transactions (id, sale_id, menu_item_id, quantity, price_cents, payment_method, category) \
             VALUES (900, 0, 1, 1, 575, 'Card', 'Sale')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let second = repo
            .submit_sale(&submission(vec![SaleLine { item_id: 1, price_cents: 575 }]))
            .await
            .unwrap();

        assert!(second.transaction_ids[0] > 900);
        assert!(second.transaction_ids[0] > first.transaction_ids[0]);
    }

    #[tokio::test]
    async fn test_record_adjustment_appends_new_row() {
        let db = test_db().await;
        let repo = db.transactions();

        repo.submit_sale(&submission(vec![SaleLine { item_id: 1, price_cents: 575 }]))
            .await
            .unwrap();

        let id = repo
            .record_adjustment(1, 1, 575, "Cash", TransactionCategory::Return)
            .await
            .unwrap();

        let record = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(record.category, TransactionCategory::Return);
        // Positive magnitude per the sign convention
        assert!(record.price_cents > 0);
        // Original Sale row still present, untouched
        assert_eq!(count_rows(&db).await, 2);
    }

    #[tokio::test]
    async fn test_recent_is_newest_first() {
        let db = test_db().await;
        let repo = db.transactions();

        repo.submit_sale(&submission(vec![
            SaleLine { item_id: 1, price_cents: 575 },
            SaleLine { item_id: 2, price_cents: 625 },
        ]))
        .await
        .unwrap();

        let records = repo.recent(10).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].id > records[1].id);
    }
}
