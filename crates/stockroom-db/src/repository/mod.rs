//! # Repository Module
//!
//! Database repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  axum handler / service                                                 │
//! │       │                                                                 │
//! │       │  db.movements().apply(&request)                                 │
//! │       ▼                                                                 │
//! │  MovementRepository                                                     │
//! │  ├── list(&self)                                                        │
//! │  ├── list_for_product(&self, id)                                        │
//! │  └── apply(&self, request)  ← one transaction                           │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Repositories hold a pool clone and no other state. Rules live in       │
//! │  stockroom-core; SQL lives here.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD
//! - [`SupplierRepository`](supplier::SupplierRepository) - Suppliers
//! - [`MovementRepository`](movement::MovementRepository) - Movement log and atomic apply
//! - [`AlertRepository`](alert::AlertRepository) - Alerts
//! - [`RequestRepository`](request::RequestRepository) - Replenishment requests
//! - [`UserRepository`](user::UserRepository) - Accounts

pub mod alert;
pub mod movement;
pub mod product;
pub mod request;
pub mod supplier;
pub mod user;
