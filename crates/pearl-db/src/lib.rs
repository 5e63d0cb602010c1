//! # pearl-db: Storage Engine for Pearl POS
//!
//! This crate provides the transaction recording and reporting engine for
//! Pearl POS. It uses SQLite for local storage with sqlx for async
//! operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Pearl POS Data Flow                               │
//! │                                                                         │
//! │  Caller (API handler, admin tool)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     pearl-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Allocator   │  │   │
//! │  │   │   (pool.rs)   │    │               │    │              │  │   │
//! │  │   │               │    │ Transaction   │    │ id resync    │  │   │
//! │  │   │ SqlitePool    │◄───│ Inventory     │◄───│ (runs inside │  │   │
//! │  │   │ Migrations    │    │ Report        │    │  each batch) │  │   │
//! │  │   │ WAL mode      │    │ Catalog       │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (./pearl.db)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure domain rules (validation, money arithmetic, report-time rates, CSV
//! shaping) live in `pearl-core`; this crate owns the SQL and the
//! transaction boundaries.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`allocator`] - Transaction-id high-water-mark resync
//! - [`error`] - Engine error types
//! - [`repository`] - Repository implementations (transaction, inventory,
//!   report, catalog)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pearl_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./pearl.db")).await?;
//!
//! let receipt = db.transactions().submit_sale(&submission).await?;
//! let closing = db.reports().hourly_z(0, 23).await?;
//! let csv = pearl_core::report::z_report_to_csv(&closing)?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocator;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{EngineError, EngineResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::report::ReportRepository;
pub use repository::transaction::TransactionRepository;
