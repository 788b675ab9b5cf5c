//! # Stock Movements
//!
//! The rule that turns a movement request into a new stock level.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Applying a Movement                                  │
//! │                                                                         │
//! │  POST /movements {productId, type, quantity, reason, ...}              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  MovementRequest::validate()                                           │
//! │       ├── type not entry/exit  → InvalidArgument                       │
//! │       ├── quantity <= 0        → InvalidArgument                       │
//! │       └── reason empty         → InvalidArgument                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  plan_movement(product, request) ← pure, THIS MODULE                   │
//! │       │                                                                 │
//! │       ├── Movement record (new id, now)                                │
//! │       └── new_stock = next_stock(stock, type, qty)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stockroom-db writes both in ONE transaction                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Clamping
//! An exit larger than the stock on hand leaves the product at zero rather
//! than negative. [`MovementPlan::clamped`] reports when that happened so the
//! caller can log the shortfall.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::types::{Movement, MovementType, Product};
use crate::validation::{validate_cost_cents, validate_movement_quantity, validate_required};

// =============================================================================
// The Rule
// =============================================================================

/// Computes the stock after a movement.
///
/// - entry: `current + quantity`
/// - exit: `max(0, current - quantity)`
///
/// ## Example
/// ```rust
/// use stockroom_core::movement::next_stock;
/// use stockroom_core::MovementType;
///
/// assert_eq!(next_stock(10, MovementType::Entry, 5), 15);
/// assert_eq!(next_stock(10, MovementType::Exit, 4), 6);
/// assert_eq!(next_stock(3, MovementType::Exit, 4), 0);
/// ```
#[inline]
pub fn next_stock(current: i64, movement_type: MovementType, quantity: i64) -> i64 {
    match movement_type {
        MovementType::Entry => current.saturating_add(quantity),
        MovementType::Exit => current.saturating_sub(quantity).max(0),
    }
}

// =============================================================================
// Request
// =============================================================================

/// A movement as submitted by a client, before validation.
///
/// `movement_type` stays a string here so an unknown value surfaces as a
/// validation error instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MovementRequest {
    pub product_id: String,
    #[serde(rename = "type")]
    pub movement_type: String,
    pub quantity: i64,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub cost_cents: Option<i64>,
}

impl MovementRequest {
    /// Validates the request and returns the parsed movement type.
    pub fn validate(&self) -> CoreResult<MovementType> {
        if self.product_id.trim().is_empty() {
            return Err(ValidationError::required("productId").into());
        }
        let movement_type: MovementType = self.movement_type.parse()?;
        validate_movement_quantity(self.quantity)?;
        validate_required("reason", &self.reason)?;
        validate_cost_cents(self.cost_cents)?;
        Ok(movement_type)
    }
}

// =============================================================================
// Plan
// =============================================================================

/// Everything the store must write for one movement.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementPlan {
    pub movement: Movement,
    /// Stock the plan was computed from. The store uses it as a
    /// compare-and-swap guard.
    pub previous_stock: i64,
    pub new_stock: i64,
    /// True when an exit asked for more than was on hand.
    pub clamped: bool,
}

impl MovementPlan {
    /// Units requested but not available (0 unless clamped).
    pub fn shortfall(&self) -> i64 {
        if self.clamped {
            self.movement.quantity - self.previous_stock
        } else {
            0
        }
    }
}

/// Plans a movement against the current product state.
///
/// Pure: the caller supplies the id and clock so tests are deterministic.
///
/// ## Errors
/// `InvalidArgument` for any request that fails [`MovementRequest::validate`].
pub fn plan_movement(
    product: &Product,
    request: &MovementRequest,
    id: String,
    now: DateTime<Utc>,
) -> CoreResult<MovementPlan> {
    let movement_type = request.validate()?;

    let new_stock = next_stock(product.stock, movement_type, request.quantity);
    let clamped = movement_type == MovementType::Exit && request.quantity > product.stock;

    let movement = Movement {
        id,
        product_id: product.id.clone(),
        movement_type,
        quantity: request.quantity,
        reason: request.reason.trim().to_string(),
        reference: request
            .reference
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string),
        cost_cents: request.cost_cents,
        created_at: now,
    };

    Ok(MovementPlan {
        movement,
        previous_stock: product.stock,
        new_stock,
        clamped,
    })
}

// =============================================================================
// Totals
// =============================================================================

/// Summary cards shown above the movement list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MovementTotals {
    pub count: usize,
    /// Units received.
    pub entries: i64,
    /// Units shipped out.
    pub exits: i64,
    /// `entries - exits`
    pub net: i64,
}

impl MovementTotals {
    pub fn from_movements(movements: &[Movement]) -> Self {
        let mut totals = MovementTotals::default();
        for m in movements {
            totals.count += 1;
            match m.movement_type {
                MovementType::Entry => totals.entries += m.quantity,
                MovementType::Exit => totals.exits += m.quantity,
            }
        }
        totals.net = totals.entries - totals.exits;
        totals
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
