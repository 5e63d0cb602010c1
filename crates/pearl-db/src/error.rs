//! # Engine Error Types
//!
//! The storage-facing error taxonomy for the engine.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EngineError (this module) ← Categorized at the repository boundary    │
//! │       │                                                                 │
//! │       ├── Validation   bad input, raised before any I/O               │
//! │       ├── Allocator    id resync failed, batch aborted, retryable     │
//! │       ├── Persistence  write failed mid-batch, rolled back, retryable │
//! │       └── Report       read failed during aggregation, no mutation    │
//! │                                                                         │
//! │  No raw sqlx error ever crosses a repository boundary.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Engine operation errors.
///
/// The four submission/report kinds mirror the engine's failure contract;
/// the remaining variants cover the storage layer's own lifecycle.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or missing input, caught before any I/O was attempted.
    #[error("validation failed: {0}")]
    Validation(#[from] pearl_core::ValidationError),

    /// The sequence allocator could not resync its high-water mark.
    /// The batch was aborted before any record was written; safe to retry.
    #[error("sequence allocator resync failed: {0}")]
    Allocator(String),

    /// A storage write failed mid-operation. The enclosing unit of work was
    /// rolled back, so no partial state survives; safe to retry.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// A storage read failed during report aggregation. Reports never
    /// mutate state, so a retry is always safe.
    #[error("report query failed: {0}")]
    Report(String),

    /// Entity not found in the database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    #[error("duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation (e.g. a line item referencing a
    /// catalog item that does not exist).
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),
}

impl EngineError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Wraps a storage read failure from a report query.
    ///
    /// Report paths call this instead of relying on `From<sqlx::Error>`,
    /// which categorizes as a write-side persistence failure.
    pub fn report(err: sqlx::Error) -> Self {
        EngineError::Report(err.to_string())
    }

    /// True when the operation left no partial state and can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::Allocator(_) | EngineError::Persistence(_) | EngineError::Report(_)
        )
    }
}

/// Convert sqlx errors to EngineError on the write path.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → EngineError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// Other                       → EngineError::Persistence
/// ```
impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => EngineError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite error messages for constraints:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    EngineError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    EngineError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    EngineError::Persistence(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => {
                EngineError::ConnectionFailed("pool timed out".to_string())
            }

            sqlx::Error::PoolClosed => EngineError::ConnectionFailed("pool is closed".to_string()),

            _ => EngineError::Persistence(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for EngineError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        EngineError::MigrationFailed(err.to_string())
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: EngineError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(EngineError::Allocator("x".into()).is_retryable());
        assert!(EngineError::Persistence("x".into()).is_retryable());
        assert!(EngineError::Report("x".into()).is_retryable());
        assert!(!EngineError::not_found("Inventory", 9).is_retryable());
    }

    #[test]
    fn test_validation_wraps() {
        let err: EngineError = pearl_core::ValidationError::Required {
            field: "customer_name".to_string(),
        }
        .into();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(!err.is_retryable());
    }
}
