//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Domain rule failures                           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  stockroom-api errors (in app)                                         │
//! │  └── ApiError         - What HTTP clients see (status + JSON body)      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Taxonomy
//! Every [`CoreError`] falls into one [`ErrorKind`]. The API turns the kind
//! into a status code, so new variants only need a `kind()` arm.

use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification of domain failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing field, non-positive quantity, malformed range, bad transition.
    InvalidArgument,
    /// Unknown product, supplier, alert or request id.
    NotFound,
    /// Uniqueness violation (duplicate SKU, duplicate username).
    Conflict,
}

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by the inventory rules.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Product ID doesn't exist
    /// - Product was deleted while a movement form was open
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Supplier cannot be found.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    /// Alert cannot be found.
    #[error("Alert not found: {0}")]
    AlertNotFound(String),

    /// Replenishment request cannot be found.
    #[error("Request not found: {0}")]
    RequestNotFound(String),

    /// Another product already uses this SKU.
    #[error("SKU '{0}' already exists")]
    DuplicateSku(String),

    /// Another user already uses this username.
    #[error("Username '{0}' already exists")]
    DuplicateUsername(String),

    /// A replenishment request cannot move between these states.
    ///
    /// ## When This Occurs
    /// - Approving a request that was already rejected
    /// - Fulfilling a request that was never approved
    #[error("Request cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// A field-level input problem.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Classifies this error for transport mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ProductNotFound(_)
            | CoreError::SupplierNotFound(_)
            | CoreError::AlertNotFound(_)
            | CoreError::RequestNotFound(_) => ErrorKind::NotFound,
            CoreError::DuplicateSku(_) | CoreError::DuplicateUsername(_) => ErrorKind::Conflict,
            CoreError::InvalidTransition { .. } | CoreError::Validation(_) => {
                ErrorKind::InvalidArgument
            }
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A field failed an input check.
///
/// Raised before any rule or store call; always maps to `InvalidArgument`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Missing, or blank after trimming.
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Zero or negative where only `> 0` makes sense (quantity, price).
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Value must be strictly greater than another field.
    #[error("{field} must be greater than {other}")]
    MustExceed { field: String, other: String },

    /// Bad email, unknown supplier id, unparseable date...
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Enum-like string outside its allowed values (movement type).
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Date range with the start after the end.
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: String, end: String },
}

impl ValidationError {
    /// Creates a Required error for a field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
