//! # Repository Layer
//!
//! Data access for the engine, one repository per concern.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Repository Layer                                   │
//! │                                                                         │
//! │  Database (pool.rs)                                                    │
//! │       │                                                                 │
//! │       ├── catalog()      → CatalogRepository      (menu items)         │
//! │       ├── transactions() → TransactionRepository  (recorder + ids)     │
//! │       ├── inventory()    → InventoryRepository    (adjuster)           │
//! │       └── reports()      → ReportRepository       (read-only)          │
//! │                                                                         │
//! │  Each repository owns its SQL; pure rules (validation, money, rates)   │
//! │  live in pearl-core and are called before any query runs.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod inventory;
pub mod report;
pub mod transaction;

pub use catalog::CatalogRepository;
pub use inventory::InventoryRepository;
pub use report::ReportRepository;
pub use transaction::TransactionRepository;
