//! # Inventory Repository
//!
//! The Inventory Adjuster: cumulative on-hand counts, one row per catalog
//! item, adjusted additively.
//!
//! ## Upsert Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       adjust(item, delta)                               │
//! │                                                                         │
//! │  UPDATE inventory SET quantity = quantity + delta  ──► row hit?        │
//! │       │ yes: Updated                                                   │
//! │       │ no:                                                            │
//! │       ▼                                                                 │
//! │  INSERT ... ON CONFLICT(menuitemid) DO UPDATE  ──► Created             │
//! │                                                                         │
//! │  The ON CONFLICT arm only fires if another writer inserted the row     │
//! │  between the two statements; either way the delta lands exactly once   │
//! │  and the UNIQUE(menuitemid) constraint keeps it to one row per item.   │
//! │                                                                         │
//! │  quantity CHECK (>= 0): a delta that would go negative fails the       │
//! │  statement instead of corrupting the count.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use pearl_core::validation::validate_absolute_quantity;
use pearl_core::{AdjustOutcome, InventoryLine, InventoryRecord};

const INVENTORY_COLUMNS: &str = "inventoryid AS inventory_id, menuitemid AS menu_item_id, \
     quantity, timestamp, restockdate AS restock_date, lastupdated AS last_updated";

/// Repository for on-hand inventory counts.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Applies an additive adjustment to an item's on-hand count.
    ///
    /// Creates the row on first sight of the item (with the delta as the
    /// initial quantity and all timestamps set to now). An existing row
    /// only gets `quantity` and `lastupdated` touched; `restockdate` stays
    /// at its insert-time value so the usage trend's date grouping is
    /// stable. A negative delta that would take the count below zero fails
    /// without writing.
    pub async fn adjust(&self, menu_item_id: i64, delta: i64) -> EngineResult<AdjustOutcome> {
        let now = Utc::now();

        debug!(menu_item_id, delta, "Adjusting inventory");

        let updated = sqlx::query(
            "UPDATE inventory \
             SET quantity = quantity + ?2, lastupdated = ?3 \
             WHERE menuitemid = ?1",
        )
        .bind(menu_item_id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() > 0 {
            return Ok(AdjustOutcome::Updated);
        }

        sqlx::query(
            "INSERT INTO inventory (menuitemid, quantity, timestamp, restockdate, lastupdated) \
             VALUES (?1, ?2, ?3, ?3, ?3) \
             ON CONFLICT(menuitemid) DO UPDATE SET \
                 quantity = inventory.quantity + excluded.quantity, \
                 lastupdated = excluded.lastupdated",
        )
        .bind(menu_item_id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!(menu_item_id, delta, "Inventory row created");

        Ok(AdjustOutcome::Created)
    }

    /// Overwrites an inventory row's quantity with an absolute value.
    pub async fn set_quantity(&self, inventory_id: i64, quantity: i64) -> EngineResult<()> {
        validate_absolute_quantity(quantity)?;

        let result = sqlx::query(
            "UPDATE inventory SET quantity = ?2, lastupdated = ?3 WHERE inventoryid = ?1",
        )
        .bind(inventory_id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::not_found("Inventory", inventory_id));
        }

        Ok(())
    }

    /// Deletes an inventory row by id.
    pub async fn delete(&self, inventory_id: i64) -> EngineResult<()> {
        let result = sqlx::query("DELETE FROM inventory WHERE inventoryid = ?1")
            .bind(inventory_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::not_found("Inventory", inventory_id));
        }

        info!(inventory_id, "Inventory row deleted");

        Ok(())
    }

    /// Lists all inventory rows joined with their catalog names.
    pub async fn list(&self) -> EngineResult<Vec<InventoryLine>> {
        let lines = sqlx::query_as::<_, InventoryLine>(
            "SELECT i.inventoryid AS inventory_id, i.menuitemid AS menu_item_id, \
                    m.itemname AS item_name, i.quantity, i.timestamp, \
                    i.restockdate AS restock_date, i.lastupdated AS last_updated \
             FROM inventory i \
             JOIN menuitem m ON m.itemid = i.menuitemid \
             ORDER BY i.inventoryid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Fetches the inventory row for one catalog item, if present.
    pub async fn get_by_item(&self, menu_item_id: i64) -> EngineResult<Option<InventoryRecord>> {
        let record = sqlx::query_as::<_, InventoryRecord>(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory WHERE menuitemid = ?1"
        ))
        .bind(menu_item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
