//! # Store Errors
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error ─────────────┐                                             │
//! │  MigrateError ────────────┼──► DbError ──► ApiError (status + body)     │
//! │  CoreError (inside a tx) ─┘                                             │
//! │                                                                         │
//! │  NotFound / UniqueViolation / ForeignKeyViolation / Rejected /          │
//! │  ConcurrentUpdate     → the caller asked for something wrong (4xx)      │
//! │  everything else      → the store is unwell (503)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockroom_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row for the id (lookup, update or delete).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index fired, e.g. two creates racing for one SKU.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A core rule refused the write partway through a transaction.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// The stock compare-and-swap lost every retry.
    #[error("Concurrent updates to product {product_id}, gave up after {attempts} attempts")]
    ConcurrentUpdate { product_id: String, attempts: u32 },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// BEGIN or COMMIT failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// SQLite could not take a lock within `busy_timeout`. Retryable.
    #[error("Database busy: {0}")]
    Busy(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True when the store itself failed rather than the request. The API
    /// answers these with 503.
    pub fn is_store_unavailable(&self) -> bool {
        !matches!(
            self,
            DbError::NotFound { .. }
                | DbError::UniqueViolation { .. }
                | DbError::ForeignKeyViolation { .. }
                | DbError::Rejected(_)
                | DbError::ConcurrentUpdate { .. }
        )
    }
}

/// SQLITE_BUSY (5) and its extended codes such as BUSY_SNAPSHOT (517).
fn is_busy_code(code: &str) -> bool {
    code.parse::<i32>().map(|c| c & 0xff == 5).unwrap_or(false)
}

/// SQLite reports constraint failures only through the message text, e.g.
/// `UNIQUE constraint failed: products.sku`.
fn classify_database_error(message: &str) -> DbError {
    if let Some(columns) = message.strip_prefix("UNIQUE constraint failed: ") {
        let field = columns.rsplit('.').next().unwrap_or(columns);
        return DbError::duplicate(field, "unknown");
    }
    if message.contains("FOREIGN KEY constraint failed") {
        return DbError::ForeignKeyViolation {
            message: message.to_string(),
        };
    }
    DbError::QueryFailed(message.to_string())
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::Database(db_err) => {
                if db_err.code().is_some_and(|code| is_busy_code(&code)) {
                    DbError::Busy(db_err.message().to_string())
                } else {
                    classify_database_error(db_err.message())
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_unavailable_classification() {
        assert!(DbError::PoolExhausted.is_store_unavailable());
        assert!(DbError::QueryFailed("boom".into()).is_store_unavailable());
        assert!(!DbError::not_found("Product", "p-1").is_store_unavailable());
        assert!(!DbError::duplicate("sku", "A-1").is_store_unavailable());
        assert!(!DbError::Rejected(CoreError::DuplicateSku("A".into())).is_store_unavailable());
    }

    #[test]
    fn test_classify_constraint_messages() {
        match classify_database_error("UNIQUE constraint failed: products.sku") {
            DbError::UniqueViolation { field, .. } => assert_eq!(field, "sku"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            classify_database_error("FOREIGN KEY constraint failed"),
            DbError::ForeignKeyViolation { .. }
        ));
        assert!(matches!(
            classify_database_error("no such table: widgets"),
            DbError::QueryFailed(_)
        ));
    }

    #[test]
    fn test_busy_codes() {
        assert!(is_busy_code("5"));
        assert!(is_busy_code("517"));
        assert!(is_busy_code("261"));
        assert!(!is_busy_code("6"));
        assert!(!is_busy_code("2067"));
        assert!(!is_busy_code("not-a-code"));
        assert!(DbError::Busy("database is locked".into()).is_store_unavailable());
    }

    #[test]
    fn test_rejected_keeps_core_message() {
        let err: DbError = CoreError::ProductNotFound("p-9".into()).into();
        assert_eq!(err.to_string(), "Product not found: p-9");
    }
}
