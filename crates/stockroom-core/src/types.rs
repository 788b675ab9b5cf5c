//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Supplier     │◄──│    Product      │◄──│    Movement     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  sku (business) │   │  product_id     │       │
//! │  │  tax_id         │   │  stock          │   │  type           │       │
//! │  │  is_active      │   │  min / max      │   │  quantity       │       │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘       │
//! │                                 │                                       │
//! │                    ┌────────────┴────────────┐                          │
//! │                    ▼                         ▼                          │
//! │  ┌─────────────────────────┐   ┌──────────────────────────────┐        │
//! │  │         Alert           │   │    ReplenishmentRequest      │        │
//! │  │  low_stock / out_of_... │   │  pending → approved → ...    │        │
//! │  └─────────────────────────┘   └──────────────────────────────┘        │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │      User       │   │      Role       │                              │
//! │  │  password_hash  │   │  admin/manager/ │                              │
//! │  │  (never sent)   │   │  employee       │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Products have both:
//! - `id`: UUID v4, immutable, used by movements, alerts and requests
//! - `sku`: human-readable, unique, editable
//!
//! Movements keep their `product_id` after the product is deleted, so
//! readers must treat a missing product as "deleted product".

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Supplier
// =============================================================================

/// A company products are bought from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A stocked item.
///
/// `stock` is only ever changed two ways: a direct product edit, or a
/// movement applied through [`crate::movement::plan_movement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, e.g. "Leche Gloria 1L".
    pub name: String,

    /// Stock Keeping Unit - unique business identifier.
    pub sku: String,

    pub category: String,

    pub description: Option<String>,

    /// Price in minor units. Always positive.
    pub price_cents: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// At or below this level the product raises an alert.
    pub min_stock: i64,

    /// Upper target level. Always greater than `min_stock`.
    pub max_stock: i64,

    /// Supplier this product is bought from.
    pub supplier_id: String,

    /// Unit of measure ("unidad", "kg", "caja", ...).
    pub unit: String,

    /// Storage location ("Pasillo 3 - Estante B").
    pub location: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Value of the units on hand (`price × stock`).
    #[inline]
    pub fn inventory_value(&self) -> Money {
        self.price().multiply_quantity(self.stock)
    }

    /// True when the product should have an outstanding stock alert.
    #[inline]
    pub fn needs_restock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

// =============================================================================
// Movement Type
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Inbound: goods received.
    Entry,
    /// Outbound: goods shipped, sold or written off.
    Exit,
}

impl MovementType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MovementType::Entry => "entry",
            MovementType::Exit => "exit",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = ValidationError;

    /// Parses the wire value. Unknown strings are a validation failure,
    /// never a default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entry" => Ok(MovementType::Entry),
            "exit" => Ok(MovementType::Exit),
            _ => Err(ValidationError::NotAllowed {
                field: "type".to_string(),
                allowed: vec!["entry".to_string(), "exit".to_string()],
            }),
        }
    }
}

// =============================================================================
// Movement
// =============================================================================

/// A single recorded stock change. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: String,

    /// May point at a deleted product.
    pub product_id: String,

    #[serde(rename = "type")]
    pub movement_type: MovementType,

    /// Always positive. Direction comes from `movement_type`.
    pub quantity: i64,

    pub reason: String,

    /// Invoice, delivery note, order number...
    pub reference: Option<String>,

    /// Purchase cost of the movement in minor units, if recorded.
    pub cost_cents: Option<i64>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Movement {
    /// Quantity with sign: positive for entries, negative for exits.
    pub fn signed_quantity(&self) -> i64 {
        match self.movement_type {
            MovementType::Entry => self.quantity,
            MovementType::Exit => -self.quantity,
        }
    }
}

// =============================================================================
// Alerts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    /// `0 < stock <= min_stock`
    LowStock,
    /// `stock == 0`
    OutOfStock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Medium,
    High,
}

/// A stock notification produced by [`crate::alerts::derive_alerts`].
///
/// Alerts are never deleted. The only mutation is [`Alert::mark_read`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub product_id: String,
    pub message: String,
    pub severity: AlertSeverity,
    pub is_read: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Marks the alert read. Calling it again is a no-op; there is no way
    /// back to unread.
    pub fn mark_read(&mut self) {
        self.is_read = true;
    }
}

// =============================================================================
// Replenishment Requests
// =============================================================================

/// Workflow state of a replenishment request.
///
/// ```text
///   pending ──► approved ──► fulfilled
///      │
///      └──────► rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Fulfilled,
}

impl Default for RequestStatus {
    fn default() -> Self {
        RequestStatus::Pending
    }
}

impl RequestStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Fulfilled => "fulfilled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request from floor staff to restock a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReplenishmentRequest {
    pub id: String,
    pub product_id: String,
    /// User id of the requester.
    pub requested_by: String,
    pub quantity: i64,
    pub reason: String,
    pub status: RequestStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Users
// =============================================================================

/// Staff role. Capabilities per role live in [`crate::access`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Default for Role {
    fn default() -> Self {
        Role::Employee
    }
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "employee" => Ok(Role::Employee),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec![
                    "admin".to_string(),
                    "manager".to_string(),
                    "employee".to_string(),
                ],
            }),
        }
    }
}

/// A stored account.
///
/// The password hash is skipped on serialization so a `User` can never
/// leak it through a JSON response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,
    pub role: Role,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// The public face of a user, returned by login and registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".into(),
            name: "Leche Gloria 1L".into(),
            sku: "LECHE-GLORIA-1L".into(),
            category: "Lacteos".into(),
            description: None,
            price_cents: 450,
            stock: 12,
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
    fn test_movement_type_parse() {
        assert_eq!("entry".parse::<MovementType>().unwrap(), MovementType::Entry);
        assert_eq!(" EXIT ".parse::<MovementType>().unwrap(), MovementType::Exit);
        assert!("transfer".parse::<MovementType>().is_err());
    }

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("Manager".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_inventory_value() {
        let product = sample_product();
        assert_eq!(product.inventory_value().cents(), 5400);
        assert!(!product.needs_restock());
    }

    #[test]
    fn test_movement_serializes_type_field() {
        let movement = Movement {
            id: "m-1".into(),
            product_id: "p-1".into(),
            movement_type: MovementType::Exit,
            quantity: 3,
            reason: "venta".into(),
            reference: None,
            cost_cents: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&movement).unwrap();
        assert_eq!(json["type"], "exit");
        assert_eq!(json["productId"], "p-1");
        assert_eq!(movement.signed_quantity(), -3);
    }

    #[test]
    fn test_user_hides_password_hash() {
        let user = User {
            id: "u-1".into(),
            username: "ana".into(),
            email: "ana@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::Employee,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("passwordHash"));
    }

    #[test]
    fn test_alert_mark_read_is_monotonic() {
        let mut alert = Alert {
            id: "a-1".into(),
            alert_type: AlertType::LowStock,
            product_id: "p-1".into(),
            message: "low".into(),
            severity: AlertSeverity::Medium,
            is_read: false,
            created_at: Utc::now(),
        };
        alert.mark_read();
        alert.mark_read();
        assert!(alert.is_read);
    }
}
