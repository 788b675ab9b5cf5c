//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! This crate holds every inventory rule as pure functions with zero I/O
//! dependencies. The database and HTTP layers call into it; it never calls out.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Browser front-end / stockroom-client               │   │
//! │  │    Product list ──► Product form ──► Movements ──► Alerts       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stockroom-api (axum)                         │   │
//! │  │    /products, /movements, /alerts, /reports, /auth              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌───────┐ │   │
//! │  │  │  types   │ │ movement │ │  alerts  │ │  report  │ │ access│ │   │
//! │  │  │ Product  │ │next_stock│ │ derive   │ │ range    │ │ Role  │ │   │
//! │  │  │ Movement │ │  plan    │ │ dedupe   │ │ csv      │ │ caps  │ │   │
//! │  │  └──────────┘ └──────────┘ └──────────┘ └──────────┘ └───────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Supplier, Movement, Alert, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types and the error taxonomy
//! - [`validation`] - Field-level validation
//! - [`product`] - Product drafts, patches, SKU uniqueness, stock status
//! - [`movement`] - The stock movement rule
//! - [`alerts`] - Low-stock alert derivation
//! - [`search`] - Product search
//! - [`supplier`] - Supplier drafts
//! - [`report`] - Date-range reports, summaries, CSV export
//! - [`access`] - Roles and capabilities
//! - [`account`] - Registration and login bodies
//! - [`request`] - Replenishment request workflow
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::movement::next_stock;
//! use stockroom_core::MovementType;
//!
//! // Entries add stock
//! assert_eq!(next_stock(5, MovementType::Entry, 3), 8);
//!
//! // Exits never drive stock below zero
//! assert_eq!(next_stock(5, MovementType::Exit, 8), 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod account;
pub mod alerts;
pub mod error;
pub mod money;
pub mod movement;
pub mod product;
pub mod report;
pub mod request;
pub mod search;
pub mod supplier;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use access::Capability;
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest quantity a single movement may carry.
///
/// ## Business Reason
/// Catches typos like an extra three zeros on a pallet count before they hit
/// the stock ledger. Real warehouse receipts stay well below this.
pub const MAX_MOVEMENT_QUANTITY: i64 = 1_000_000;

/// Maximum length of a search query.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

/// Generates a new entity ID (UUID v4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
