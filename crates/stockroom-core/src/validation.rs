//! # Validation Module
//!
//! Field-level input validation for Stockroom.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser form                                                 │
//! │  ├── Required markers, number inputs                                   │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: stockroom-core (Rust)                                        │
//! │  ├── THIS MODULE: one function per field rule                          │
//! │  └── product / movement modules: cross-field rules                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE (sku, username)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{validate_sku, validate_movement_quantity};
//!
//! assert!(validate_sku("LECHE-GLORIA-1L").is_ok());
//! assert!(validate_movement_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_MOVEMENT_QUANTITY, MAX_SEARCH_QUERY_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum SKU length.
pub const MAX_SKU_LEN: usize = 50;

/// Maximum length for names, categories, units and locations.
pub const MAX_TEXT_LEN: usize = 200;

/// Username length bounds.
pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 50;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_TEXT_LEN`] characters
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_required;
///
/// assert_eq!(validate_required("category", "  Lacteos ").unwrap(), "Lacteos");
/// assert!(validate_required("category", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only letters, digits, hyphens, underscores
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_sku;
///
/// assert!(validate_sku("ARROZ-5KG").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("ARROZ 5KG").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::required("sku"));
    }

    if sku.chars().count() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query and returns it trimmed.
///
/// Empty is fine (means "everything"); only the length is bounded.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

pub fn validate_username(username: &str) -> ValidationResult<()> {
    let len = username.trim().chars().count();

    if len == 0 {
        return Err(ValidationError::required("username"));
    }
    if len < MIN_USERNAME_LEN {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: MIN_USERNAME_LEN,
        });
    }
    if len > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: MAX_USERNAME_LEN,
        });
    }

    Ok(())
}

/// Shape check only: one `@` with something on both sides and a dot in
/// the domain. Deliverability is not our problem.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain.tld".to_string(),
        });
    }

    Ok(())
}

pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a product price in minor units. Must be strictly positive.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(450).is_ok());
/// assert!(validate_price_cents(0).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a count that may be zero (stock, minStock).
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates the stock band: `max_stock > min_stock`.
pub fn validate_stock_levels(min_stock: i64, max_stock: i64) -> ValidationResult<()> {
    if max_stock <= min_stock {
        return Err(ValidationError::MustExceed {
            field: "maxStock".to_string(),
            other: "minStock".to_string(),
        });
    }
    Ok(())
}

/// Validates a movement (or request) quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_MOVEMENT_QUANTITY`]
///
/// ## User Workflow
/// ```text
/// Movement form: quantity = 24
///      │
///      ▼
/// validate_movement_quantity(24) ← THIS FUNCTION
///      │
///      ├── qty <= 0?        → "quantity must be positive"
///      ├── qty > 1,000,000? → "quantity must be between 1 and 1000000"
///      └── OK → plan_movement
/// ```
pub fn validate_movement_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_MOVEMENT_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_MOVEMENT_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an optional cost. Zero is allowed (donations, samples).
pub fn validate_cost_cents(cost: Option<i64>) -> ValidationResult<()> {
    match cost {
        Some(c) => validate_non_negative("cost", c),
        None => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("LECHE-GLORIA-1L").is_ok());
        assert!(validate_sku("ABC123").is_ok());
        assert!(validate_sku("arroz_5kg").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(51)).is_err());
        assert!(validate_sku(&"A".repeat(50)).is_ok());
    }

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required("unit", " kg ").unwrap(), "kg");
        assert_eq!(
            validate_required("unit", "").unwrap_err(),
            ValidationError::required("unit")
        );
        assert!(validate_required("name", &"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(1).is_ok());
        assert!(validate_price_cents(0).is_err());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_stock_levels() {
        assert!(validate_stock_levels(10, 100).is_ok());
        assert!(validate_stock_levels(10, 10).is_err());
        assert!(validate_stock_levels(10, 5).is_err());
        assert!(validate_non_negative("stock", 0).is_ok());
        assert!(validate_non_negative("stock", -1).is_err());
    }

    #[test]
    fn test_validate_movement_quantity() {
        assert!(validate_movement_quantity(1).is_ok());
        assert!(validate_movement_quantity(MAX_MOVEMENT_QUANTITY).is_ok());

        assert!(validate_movement_quantity(0).is_err());
        assert!(validate_movement_quantity(-5).is_err());
        assert!(validate_movement_quantity(MAX_MOVEMENT_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_accounts() {
        assert!(validate_username("ana").is_ok());
        assert!(validate_username("an").is_err());
        assert!(validate_username(&"u".repeat(51)).is_err());

        assert!(validate_email("ana@tienda.pe").is_ok());
        assert!(validate_email("ana.tienda.pe").is_err());
        assert!(validate_email("ana@tienda").is_err());
        assert!(validate_email("@tienda.pe").is_err());

        assert!(validate_password("secret").is_ok());
        assert!(validate_password("12345").is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  gloria ").unwrap(), "gloria");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }
}
