//! # Alert Deriver
//!
//! Recomputes stock alerts from the current product set.
//!
//! ## Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each product with stock <= min_stock:                              │
//! │                                                                         │
//! │     stock == 0 ──► out_of_stock / high                                  │
//! │     otherwise  ──► low_stock    / medium                                │
//! │                                                                         │
//! │     unread alert with same (product_id, type) exists? ──► skip          │
//! │                                                                         │
//! │  Running it twice on the same snapshot yields nothing the second time.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A product that drops from low to zero keeps its unread `low_stock` alert
//! and gains an `out_of_stock` one: the two types never merge.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::new_id;
use crate::types::{Alert, AlertSeverity, AlertType, Product};

/// Classifies a product, or `None` when its stock is above the minimum.
pub fn classify(product: &Product) -> Option<(AlertType, AlertSeverity)> {
    if !product.needs_restock() {
        return None;
    }
    if product.stock == 0 {
        Some((AlertType::OutOfStock, AlertSeverity::High))
    } else {
        Some((AlertType::LowStock, AlertSeverity::Medium))
    }
}

/// Returns the alerts that should be created for `products` given the
/// alerts that already exist. Nothing is mutated; the caller persists the
/// result.
///
/// ## Example
/// ```rust,ignore
/// let fresh = derive_alerts(&products, &existing, Utc::now());
/// db.alerts().insert_many(&fresh).await?;
/// ```
pub fn derive_alerts(products: &[Product], existing: &[Alert], now: DateTime<Utc>) -> Vec<Alert> {
    let mut open: HashSet<(&str, AlertType)> = existing
        .iter()
        .filter(|a| !a.is_read)
        .map(|a| (a.product_id.as_str(), a.alert_type))
        .collect();

    let mut fresh = Vec::new();

    for product in products {
        let Some((alert_type, severity)) = classify(product) else {
            continue;
        };
        if !open.insert((product.id.as_str(), alert_type)) {
            continue;
        }

        fresh.push(Alert {
            id: new_id(),
            alert_type,
            product_id: product.id.clone(),
            message: alert_message(product, alert_type),
            severity,
            is_read: false,
            created_at: now,
        });
    }

    fresh
}

fn alert_message(product: &Product, alert_type: AlertType) -> String {
    match alert_type {
        AlertType::OutOfStock => format!("{} ({}) is out of stock", product.name, product.sku),
        AlertType::LowStock => format!(
            "{} ({}) is low on stock: {} {} left, minimum {}",
            product.name, product.sku, product.stock, product.unit, product.min_stock
        ),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
