//! # pearl-core: Pure Business Logic for Pearl POS
//!
//! This crate is the **heart** of the Pearl POS transaction recording and
//! reporting engine. It contains all business logic as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pearl POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI / CLI (external)                          │   │
//! │  │    submit-sale ──► hourly-report ──► trend ──► product-usage   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pearl-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  report   │  │ validation│  │   │
//! │  │   │ MenuItem  │  │   Money   │  │ 8%/5% math│  │   rules   │  │   │
//! │  │   │ TxRecord  │  │ChargeRate │  │ CSV export│  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    pearl-db (Storage Layer)                     │   │
//! │  │     SQLite queries, migrations, recorder, allocator, reports    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuItem, TransactionRecord, report rows, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Validation error types
//! - [`validation`] - Pre-I/O request validation
//! - [`report`] - Report-time derived charges and Z-report CSV
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use pearl_core::money::Money;
//! use pearl_core::report::derived_charges;
//!
//! // Create money from cents (never from floats!)
//! let gross = Money::from_cents(10_000); // $100.00 of gross sales
//!
//! // Z-report fields are derived fresh on every run
//! let (tax, service) = derived_charges(gross);
//! assert_eq!(tax.cents(), 800);     // 8%  → $8.00
//! assert_eq!(service.cents(), 500); // 5%  → $5.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use pearl_core::Money` instead of
// `use pearl_core::money::Money`

pub use error::{ValidationError, ValidationResult};
pub use money::{ChargeRate, Money};
pub use types::*;
