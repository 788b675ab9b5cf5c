//! # Reports
//!
//! Date-range movement reports, inventory summary and the CSV export.
//!
//! ## Date Ranges
//! Ranges are calendar dates, inclusive on both ends, evaluated on the UTC
//! date of `created_at`:
//! ```text
//!   ReportRange::parse("2024-01-01", "2024-01-31")
//!
//!   2023-12-31T23:59:59Z   ✗
//!   2024-01-01T00:00:00Z   ✓
//!   2024-01-31T23:59:59Z   ✓
//!   2024-02-01T00:00:00Z   ✗
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::movement::MovementTotals;
use crate::product::StockStatus;
use crate::types::{Movement, Product};

const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Date Range
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportRange {
    /// Fails with `InvalidArgument` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if start > end {
            return Err(ValidationError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            }
            .into());
        }
        Ok(ReportRange { start, end })
    }

    /// Parses two `YYYY-MM-DD` dates.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::report::ReportRange;
    ///
    /// assert!(ReportRange::parse("2024-01-01", "2024-01-31").is_ok());
    /// assert!(ReportRange::parse("2024-01-31", "2024-01-01").is_err());
    /// assert!(ReportRange::parse("yesterday", "2024-01-01").is_err());
    /// ```
    pub fn parse(start: &str, end: &str) -> CoreResult<Self> {
        let start = parse_date("start", start)?;
        let end = parse_date("end", end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        day >= self.start && day <= self.end
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

/// Movements created inside `range`, in input order.
pub fn movements_in_range(movements: &[Movement], range: &ReportRange) -> Vec<Movement> {
    movements
        .iter()
        .filter(|m| range.contains(m.created_at))
        .cloned()
        .collect()
}

// =============================================================================
// Summary
// =============================================================================

/// Dashboard figures over the current product set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub product_count: usize,
    pub total_units: i64,
    pub inventory_value_cents: i64,
    /// Products with `0 < stock <= min_stock`.
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
}

impl InventorySummary {
    pub fn from_products(products: &[Product]) -> Self {
        let mut summary = InventorySummary {
            product_count: products.len(),
            ..Default::default()
        };
        let mut value = Money::zero();

        for p in products {
            summary.total_units += p.stock;
            value += p.inventory_value();
            match StockStatus::of(p) {
                StockStatus::OutOfStock => summary.out_of_stock_count += 1,
                StockStatus::Low => summary.low_stock_count += 1,
                StockStatus::Normal | StockStatus::High => {}
            }
        }

        summary.inventory_value_cents = value.cents();
        summary
    }
}

/// Body of `GET /reports/summary`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportSummary {
    pub inventory: InventorySummary,
    pub movements: MovementTotals,
}

// =============================================================================
// CSV Export
// =============================================================================

pub const PRODUCTS_CSV_HEADER: &str =
    "sku,name,category,stock,minStock,maxStock,price,unit,location,status";

/// Renders the product export table, one row per product in input order.
///
/// ## Example
/// ```rust,ignore
/// let csv = products_csv(&products);
/// // sku,name,category,stock,minStock,maxStock,price,unit,location,status
/// // LECHE-1L,Leche Gloria 1L,Lacteos,5,10,100,4.50,unidad,Pasillo 1,low
/// ```
pub fn products_csv(products: &[Product]) -> String {
    let mut out = String::with_capacity(64 * (products.len() + 1));
    out.push_str(PRODUCTS_CSV_HEADER);
    out.push('\n');

    for p in products {
        let row = [
            csv_field(&p.sku),
            csv_field(&p.name),
            csv_field(&p.category),
            p.stock.to_string(),
            p.min_stock.to_string(),
            p.max_stock.to_string(),
            p.price().to_string(),
            csv_field(&p.unit),
            csv_field(&p.location),
            StockStatus::of(p).as_str().to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Quotes a field containing a comma, quote or line break; inner quotes
/// are doubled.
fn csv_field(value: &str) -> String {
    if value.contains(|c| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::MovementType;
    use chrono::TimeZone;

    fn movement(id: &str, at: DateTime<Utc>) -> Movement {
        Movement {
            id: id.into(),
            product_id: "p-1".into(),
            movement_type: MovementType::Entry,
            quantity: 1,
            reason: "compra".into(),
            reference: None,
            cost_cents: None,
            created_at: at,
        }
    }

    fn product(sku: &str, name: &str, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: sku.into(),
            name: name.into(),
            sku: sku.into(),
            category: "Lacteos".into(),
            description: None,
            price_cents: 450,
            stock,
            min_stock: 10,
            max_stock: 100,
            supplier_id: "s-1".into(),
            unit: "unidad".into(),
            location: "Pasillo 1".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = ReportRange::parse("2024-01-01", "2024-01-31").unwrap();
        let movements = vec![
            movement("before", Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()),
            movement("first", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            movement("mid", Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()),
            movement("last", Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()),
            movement("after", Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
        ];

        let ids: Vec<String> = movements_in_range(&movements, &range)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["first", "mid", "last"]);
    }

    #[test]
    fn test_single_day_range() {
        let range = ReportRange::parse("2024-03-05", "2024-03-05").unwrap();
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 3, 6, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_bad_ranges() {
        let err = ReportRange::parse("2024-02-01", "2024-01-01").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(ReportRange::parse("2024-13-01", "2024-12-31").is_err());
        assert!(ReportRange::parse("", "2024-12-31").is_err());
    }

    #[test]
    fn test_summary() {
        let products = vec![
            product("A", "Leche", 0),
            product("B", "Yogurt", 5),
            product("C", "Queso", 50),
        ];
        let summary = InventorySummary::from_products(&products);
        assert_eq!(summary.product_count, 3);
        assert_eq!(summary.total_units, 55);
        assert_eq!(summary.inventory_value_cents, 55 * 450);
        assert_eq!(summary.out_of_stock_count, 1);
        assert_eq!(summary.low_stock_count, 1);
    }

    #[test]
    fn test_products_csv() {
        let products = vec![
            product("LECHE-1L", "Leche Gloria 1L", 5),
            product("QUESO", "Queso \"fresco\", 500g", 50),
        ];
        let csv = products_csv(&products);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], PRODUCTS_CSV_HEADER);
        assert_eq!(
            lines[1],
            "LECHE-1L,Leche Gloria 1L,Lacteos,5,10,100,4.50,unidad,Pasillo 1,low"
        );
        assert_eq!(
            lines[2],
            "QUESO,\"Queso \"\"fresco\"\", 500g\",Lacteos,50,10,100,4.50,unidad,Pasillo 1,normal"
        );
    }

    #[test]
    fn test_empty_csv_has_header_only() {
        assert_eq!(products_csv(&[]), format!("{PRODUCTS_CSV_HEADER}\n"));
    }
}
