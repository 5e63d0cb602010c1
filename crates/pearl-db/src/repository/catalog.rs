//! # Catalog Repository
//!
//! Read path for sellable menu items, plus the admin operations that
//! maintain them. The recorder never consults the catalog for prices
//! (line prices are captured verbatim); the catalog's job is existence
//! and classification (`item_type` drives the drink counter in reports).

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use pearl_core::MenuItem;

const MENU_ITEM_COLUMNS: &str = "itemid AS item_id, itemname AS name, \
     itemtype AS item_type, itemprice_cents AS price_cents, available";

/// Repository for menu catalog access.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Fetches a single catalog item by id.
    pub async fn get_item(&self, item_id: i64) -> EngineResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_ITEM_COLUMNS} FROM menuitem WHERE itemid = ?1"
        ))
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists available items, optionally restricted to one `item_type`.
    ///
    /// Ordered by id so the menu renders in a stable order.
    pub async fn list_available(&self, item_type: Option<&str>) -> EngineResult<Vec<MenuItem>> {
        let items = match item_type {
            Some(kind) => {
                sqlx::query_as::<_, MenuItem>(&format!(
                    "SELECT {MENU_ITEM_COLUMNS} FROM menuitem \
                     WHERE available = 1 AND itemtype = ?1 \
                     ORDER BY itemid"
                ))
                .bind(kind)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MenuItem>(&format!(
                    "SELECT {MENU_ITEM_COLUMNS} FROM menuitem \
                     WHERE available = 1 \
                     ORDER BY itemid"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(items)
    }

    /// Adds a catalog item, allocating `max(itemid) + 1` as its id.
    ///
    /// The max+1 allocation runs inside a transaction; catalog ids are
    /// admin-facing and low-churn, so the simple scheme is enough here
    /// (unlike transaction ids, which get the allocator treatment).
    pub async fn add_item(
        &self,
        name: &str,
        item_type: &str,
        price_cents: i64,
    ) -> EngineResult<MenuItem> {
        pearl_core::validation::validate_price_cents(price_cents)?;

        let mut tx = self.pool.begin().await?;

        let item_id: i64 = sqlx::query_scalar(
            "INSERT INTO menuitem (itemid, itemname, itemtype, itemprice_cents, available) \
             SELECT COALESCE(MAX(itemid), 0) + 1, ?1, ?2, ?3, 1 FROM menuitem \
             RETURNING itemid",
        )
        .bind(name)
        .bind(item_type)
        .bind(price_cents)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(item_id, name, "Catalog item added");

        Ok(MenuItem {
            item_id,
            name: name.to_string(),
            item_type: item_type.to_string(),
            price_cents,
            available: true,
        })
    }

    /// Removes a catalog item by id.
    ///
    /// Fails with `ForeignKeyViolation` if transaction or inventory rows
    /// still reference the item; the log keeps its history.
    pub async fn remove_item(&self, item_id: i64) -> EngineResult<()> {
        debug!(item_id, "Removing catalog item");

        let result = sqlx::query("DELETE FROM menuitem WHERE itemid = ?1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::not_found("MenuItem", item_id));
        }

        Ok(())
    }
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

    #[tokio::test]
    async fn test_add_and_get_item() {
        let db = test_db().await;
        let repo = db.catalog();

        let added = repo.add_item("Classic Milk Tea", "Drink", 575).await.unwrap();
        assert_eq!(added.item_id, 1);

        let fetched = repo.get_item(added.item_id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Classic Milk Tea");
        assert_eq!(fetched.item_type, "Drink");
        assert_eq!(fetched.price_cents, 575);
        assert!(fetched.available);
    }

    #[tokio::test]
    async fn test_ids_allocate_max_plus_one() {
        let db = test_db().await;
        let repo = db.catalog();

        // Pre-existing item with a high id
        sqlx::query(
            "INSERT INTO menuitem (itemid, itemname, itemtype, itemprice_cents, available) \
             VALUES (40, 'Taro Milk Tea', 'Drink', 625, 1)",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let added = repo.add_item("Thai Tea", "Drink", 600).await.unwrap();
        assert_eq!(added.item_id, 41);
    }

    #[tokio::test]
    async fn test_list_available_filters_and_orders() {
        let db = test_db().await;
        let repo = db.catalog();

        repo.add_item("Classic Milk Tea", "Drink", 575).await.unwrap();
        repo.add_item("Popping Boba", "Topping", 75).await.unwrap();
        repo.add_item("Taro Milk Tea", "Drink", 625).await.unwrap();

        // Unavailable item must not show up
        sqlx::query("UPDATE menuitem SET available = 0 WHERE itemname = 'Taro Milk Tea'")
            .execute(db.pool())
            .await
            .unwrap();

        let all = repo.list_available(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.windows(2).all(|w| w[0].item_id < w[1].item_id));

        let drinks = repo.list_available(Some("Drink")).await.unwrap();
        assert_eq!(drinks.len(), 1);
        assert_eq!(drinks[0].name, "Classic Milk Tea");
    }

    #[tokio::test]
    async fn test_remove_missing_item_is_not_found() {
        let db = test_db().await;
        let repo = db.catalog();

        let err = repo.remove_item(99).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let db = test_db().await;
        let repo = db.catalog();

        let err = repo.add_item("Mystery Tea", "Drink", -5).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
