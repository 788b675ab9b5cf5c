//! # stockroom-db: Database Layer for Stockroom
//!
//! SQLite persistence for products, suppliers, movements, alerts,
//! replenishment requests and users, via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (POST /movements)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockroom-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │   │   │
//! │  │   │               │    │ ProductRepo    │   │              │   │   │
//! │  │   │ SqlitePool    │◄───│ MovementRepo   │   │ 001_initial  │   │   │
//! │  │   │ WAL, FKs on   │    │ AlertRepo ...  │   │  _schema.sql │   │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                  $DATABASE_PATH (stockroom.db)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("stockroom.db")).await?;
//!
//! let products = db.products().list().await?;
//! let applied = db.movements().apply(&request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::alert::AlertRepository;
pub use repository::movement::{AppliedMovement, MovementRepository};
pub use repository::product::ProductRepository;
pub use repository::request::RequestRepository;
pub use repository::supplier::SupplierRepository;
pub use repository::user::UserRepository;

// =============================================================================
// Test Fixtures
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};
    use stockroom_core::{Product, Role, Supplier, User};

    use crate::{Database, DbConfig};

    /// Whole-second timestamp so rows compare equal after a round trip.
    pub fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
    }

    pub fn sample_supplier(id: &str, name: &str) -> Supplier {
        Supplier {
            id: id.into(),
            name: name.into(),
            contact_person: Some("Rosa Quispe".into()),
            email: Some("ventas@example.pe".into()),
            phone: None,
            address: None,
            tax_id: Some("20100190797".into()),
            is_active: true,
            created_at: fixed_time(),
        }
    }

    pub fn sample_product(id: &str, sku: &str, supplier_id: &str) -> Product {
        Product {
            id: id.into(),
            name: format!("Producto {sku}"),
            sku: sku.into(),
            category: "Abarrotes".into(),
            description: None,
            price_cents: 450,
            stock: 20,
            min_stock: 5,
            max_stock: 100,
            supplier_id: supplier_id.into(),
            unit: "unidad".into(),
            location: "Pasillo 1".into(),
            created_at: fixed_time(),
            updated_at: fixed_time(),
        }
    }

    pub fn sample_user(id: &str, username: &str, role: Role) -> User {
        User {
            id: id.into(),
            username: username.into(),
            email: format!("{}@example.pe", username.to_lowercase()),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
            role,
            created_at: fixed_time(),
        }
    }

    /// Fresh in-memory database with one supplier already inserted.
    pub async fn seeded_db() -> (Database, Supplier) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let supplier = sample_supplier("s-1", "Gloria S.A.");
        db.suppliers().insert(&supplier).await.unwrap();
        (db, supplier)
    }
}
