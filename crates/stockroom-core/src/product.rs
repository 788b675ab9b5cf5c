//! # Product Lifecycle Rules
//!
//! Creation drafts, partial updates, SKU uniqueness and stock status.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ProductDraft ──validate()──► into_product(id, now) ──► Product         │
//! │                                      ▲                                  │
//! │                   ensure_sku_available(existing, sku, None)             │
//! │                                                                         │
//! │  Product + ProductPatch ──apply(now)──► Product (re-validated)          │
//! │                   │                                                     │
//! │                   └─ changes_sku()? ──► ensure_sku_available(.., id)    │
//! │                                                                         │
//! │  Product ──StockStatus::of()──► out_of_stock | low | high | normal      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::Product;
use crate::validation::{
    validate_non_negative, validate_price_cents, validate_required, validate_sku,
    validate_stock_levels, ValidationResult,
};

// =============================================================================
// Draft (create)
// =============================================================================

/// Fields for a new product. Everything but id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub sku: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub min_stock: i64,
    pub max_stock: i64,
    #[serde(default)]
    pub supplier_id: String,
    pub unit: String,
    pub location: String,
}

impl ProductDraft {
    /// Checks every creation rule except SKU uniqueness, which needs the
    /// existing product set.
    ///
    /// ## Rules
    /// - name, sku, category, unit, location, supplierId: required
    /// - price > 0
    /// - stock >= 0, minStock >= 0
    /// - maxStock > minStock
    pub fn validate(&self) -> CoreResult<()> {
        check_fields(
            &self.name,
            &self.sku,
            &self.category,
            &self.unit,
            &self.location,
            &self.supplier_id,
            self.price_cents,
            self.stock,
            self.min_stock,
            self.max_stock,
        )?;
        Ok(())
    }

    /// Validates and builds the product with trimmed text fields.
    pub fn into_product(self, id: String, now: DateTime<Utc>) -> CoreResult<Product> {
        self.validate()?;

        Ok(Product {
            id,
            name: self.name.trim().to_string(),
            sku: self.sku.trim().to_string(),
            category: self.category.trim().to_string(),
            description: normalize_optional(self.description),
            price_cents: self.price_cents,
            stock: self.stock,
            min_stock: self.min_stock,
            max_stock: self.max_stock,
            supplier_id: self.supplier_id.trim().to_string(),
            unit: self.unit.trim().to_string(),
            location: self.location.trim().to_string(),
            created_at: now,
            updated_at: now,
        })
    }
}

// =============================================================================
// Patch (update)
// =============================================================================

/// Partial update. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub min_stock: Option<i64>,
    pub max_stock: Option<i64>,
    pub supplier_id: Option<String>,
    pub unit: Option<String>,
    pub location: Option<String>,
}

impl ProductPatch {
    /// Merges into `existing`, re-validates the merged record and refreshes
    /// `updated_at`. `id` and `created_at` never change.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let patch = ProductPatch { stock: Some(40), ..Default::default() };
    /// let updated = patch.apply(&product, Utc::now())?;
    /// ```
    pub fn apply(&self, existing: &Product, now: DateTime<Utc>) -> CoreResult<Product> {
        let mut merged = existing.clone();

        if let Some(name) = &self.name {
            merged.name = name.trim().to_string();
        }
        if let Some(sku) = &self.sku {
            merged.sku = sku.trim().to_string();
        }
        if let Some(category) = &self.category {
            merged.category = category.trim().to_string();
        }
        if let Some(description) = &self.description {
            merged.description = normalize_optional(Some(description.clone()));
        }
        if let Some(price) = self.price_cents {
            merged.price_cents = price;
        }
        if let Some(stock) = self.stock {
            merged.stock = stock;
        }
        if let Some(min) = self.min_stock {
            merged.min_stock = min;
        }
        if let Some(max) = self.max_stock {
            merged.max_stock = max;
        }
        if let Some(supplier_id) = &self.supplier_id {
            merged.supplier_id = supplier_id.trim().to_string();
        }
        if let Some(unit) = &self.unit {
            merged.unit = unit.trim().to_string();
        }
        if let Some(location) = &self.location {
            merged.location = location.trim().to_string();
        }

        check_fields(
            &merged.name,
            &merged.sku,
            &merged.category,
            &merged.unit,
            &merged.location,
            &merged.supplier_id,
            merged.price_cents,
            merged.stock,
            merged.min_stock,
            merged.max_stock,
        )?;

        merged.updated_at = now;
        Ok(merged)
    }

    /// True when the patch sets a SKU different from the current one.
    pub fn changes_sku(&self, existing: &Product) -> bool {
        self.sku
            .as_deref()
            .map(|sku| sku.trim() != existing.sku)
            .unwrap_or(false)
    }

    /// True when the patch points the product at a different supplier.
    pub fn changes_supplier(&self, existing: &Product) -> bool {
        self.supplier_id
            .as_deref()
            .map(|id| id.trim() != existing.supplier_id)
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        *self == ProductPatch::default()
    }
}

// =============================================================================
// SKU Uniqueness
// =============================================================================

/// Fails with [`CoreError::DuplicateSku`] if any product other than
/// `except_id` already uses `sku`. Comparison ignores case and surrounding
/// whitespace.
///
/// ## Example
/// ```rust,ignore
/// // creating
/// ensure_sku_available(&products, &draft.sku, None)?;
/// // renaming product `id`
/// ensure_sku_available(&products, new_sku, Some(&id))?;
/// ```
pub fn ensure_sku_available(
    products: &[Product],
    sku: &str,
    except_id: Option<&str>,
) -> CoreResult<()> {
    let wanted = sku.trim();

    let taken = products.iter().any(|p| {
        Some(p.id.as_str()) != except_id && p.sku.trim().eq_ignore_ascii_case(wanted)
    });

    if taken {
        return Err(CoreError::DuplicateSku(wanted.to_string()));
    }
    Ok(())
}

// =============================================================================
// Stock Status
// =============================================================================

/// Where a product's stock sits relative to its band.
///
/// ```text
///   0          min_stock                 max_stock
///   │──────────────│─────────────────────────│──────────►
///   out_of_stock   low        normal          high
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    Low,
    Normal,
    High,
}

impl StockStatus {
    /// Classifies a product. Zero wins over low; low wins over high when
    /// the band is degenerate.
    pub fn of(product: &Product) -> Self {
        if product.stock == 0 {
            StockStatus::OutOfStock
        } else if product.stock <= product.min_stock {
            StockStatus::Low
        } else if product.stock >= product.max_stock {
            StockStatus::High
        } else {
            StockStatus::Normal
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "out_of_stock",
            StockStatus::Low => "low",
            StockStatus::Normal => "normal",
            StockStatus::High => "high",
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

#[allow(clippy::too_many_arguments)]
fn check_fields(
    name: &str,
    sku: &str,
    category: &str,
    unit: &str,
    location: &str,
    supplier_id: &str,
    price_cents: i64,
    stock: i64,
    min_stock: i64,
    max_stock: i64,
) -> ValidationResult<()> {
    validate_required("name", name)?;
    validate_sku(sku)?;
    validate_required("category", category)?;
    validate_required("unit", unit)?;
    validate_required("location", location)?;
    if supplier_id.trim().is_empty() {
        return Err(ValidationError::required("supplierId"));
    }
    validate_price_cents(price_cents)?;
    validate_non_negative("stock", stock)?;
    validate_non_negative("minStock", min_stock)?;
    validate_stock_levels(min_stock, max_stock)?;
    Ok(())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Leche Gloria 1L".into(),
            sku: "LECHE-GLORIA-1L".into(),
            category: "Lacteos".into(),
            description: Some("  ".into()),
            price_cents: 450,
            stock: 5,
            min_stock: 10,
            max_stock: 100,
            supplier_id: "s-1".into(),
            unit: "unidad".into(),
            location: "Pasillo 1".into(),
        }
    }

    fn product(id: &str, sku: &str) -> Product {
        let mut d = draft();
        d.sku = sku.into();
        d.into_product(id.into(), Utc::now()).unwrap()
    }

    #[test]
    fn test_into_product_assigns_timestamps() {
        let now = Utc::now();
        let p = draft().into_product("p-1".into(), now).unwrap();
        assert_eq!(p.id, "p-1");
        assert_eq!(p.created_at, now);
        assert_eq!(p.updated_at, now);
        assert_eq!(p.description, None);
    }

    #[test]
    fn test_draft_rejects_bad_fields() {
        let mut d = draft();
        d.category = " ".into();
        assert!(d.validate().is_err());

        let mut d = draft();
        d.price_cents = 0;
        assert!(d.validate().is_err());

        let mut d = draft();
        d.max_stock = d.min_stock;
        let err = d.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let mut d = draft();
        d.supplier_id = String::new();
        assert!(matches!(
            d.validate(),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let mut d = draft();
        d.stock = -1;
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_patch_merges_and_refreshes_updated_at() {
        let original = product("p-1", "A-1");
        let later = original.updated_at + chrono::Duration::seconds(30);
        let patch = ProductPatch {
            stock: Some(40),
            location: Some("Pasillo 9".into()),
            ..Default::default()
        };

        let updated = patch.apply(&original, later).unwrap();
        assert_eq!(updated.stock, 40);
        assert_eq!(updated.location, "Pasillo 9");
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.updated_at, later);
    }

    #[test]
    fn test_patch_revalidates_merged_band() {
        let original = product("p-1", "A-1");
        let patch = ProductPatch {
            min_stock: Some(200),
            ..Default::default()
        };
        assert!(patch.apply(&original, Utc::now()).is_err());
    }

    #[test]
    fn test_changes_sku() {
        let original = product("p-1", "A-1");
        assert!(!ProductPatch::default().changes_sku(&original));
        let same = ProductPatch {
            sku: Some(" A-1 ".into()),
            ..Default::default()
        };
        assert!(!same.changes_sku(&original));
        let other = ProductPatch {
            sku: Some("B-2".into()),
            ..Default::default()
        };
        assert!(other.changes_sku(&original));
    }

    #[test]
    fn test_ensure_sku_available() {
        let products = vec![product("p-1", "A-1"), product("p-2", "B-2")];

        assert!(ensure_sku_available(&products, "C-3", None).is_ok());

        let err = ensure_sku_available(&products, "a-1", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        // a product keeping its own SKU is fine
        assert!(ensure_sku_available(&products, "A-1", Some("p-1")).is_ok());
        // but cannot take another product's
        assert!(ensure_sku_available(&products, "B-2", Some("p-1")).is_err());
    }

    #[test]
    fn test_stock_status() {
        let mut p = product("p-1", "A-1");
        p.stock = 0;
        assert_eq!(StockStatus::of(&p), StockStatus::OutOfStock);
        p.stock = 10;
        assert_eq!(StockStatus::of(&p), StockStatus::Low);
        p.stock = 50;
        assert_eq!(StockStatus::of(&p), StockStatus::Normal);
        p.stock = 100;
        assert_eq!(StockStatus::of(&p), StockStatus::High);
    }
}
