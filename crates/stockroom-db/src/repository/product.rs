//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Listing in insertion order (search is done in core over this list)
//! - Lookup by id and by SKU (case-insensitive, via `COLLATE NOCASE`)
//! - Insert / edit / hard delete
//!
//! Stock changes coming from movements do NOT go through [`ProductRepository::update`];
//! they are written by [`crate::MovementRepository::apply`] inside its transaction.
//! An edit only touches `stock` when it sets it explicitly, guarded by the
//! level it was read at.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::Product;

pub(crate) const PRODUCT_COLUMNS: &str = "id, name, sku, category, description, price_cents, \
     stock, min_stock, max_stock, supplier_id, unit, location, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let all = repo.list().await?;
/// let milk = repo.get_by_sku("leche-gloria-1l").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by SKU, ignoring case.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1"
        ))
        .bind(sku.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// The caller has already validated the product and checked its SKU;
    /// the unique index still catches a racing duplicate.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, sku = %product.sku, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, sku, category, description, price_cents,
                stock, min_stock, max_stock, supplier_id, unit, location,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(product.max_stock)
        .bind(&product.supplier_id)
        .bind(&product.unit)
        .bind(&product.location)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| with_sku(e.into(), &product.sku))?;

        Ok(())
    }

    /// Writes an edited product back.
    ///
    /// `stock` is only written when `expected_stock` is given, and then only
    /// if the row still holds that level. Edits that leave stock alone can
    /// never undo a movement committed after the product was read.
    ///
    /// ## Errors
    /// - `NotFound` when no row has this id
    /// - `ConcurrentUpdate` when stock moved since `expected_stock` was read
    pub async fn update(&self, product: &Product, expected_stock: Option<i64>) -> DbResult<()> {
        debug!(id = %product.id, stock_edit = expected_stock.is_some(), "Updating product");

        let stock_clause = if expected_stock.is_some() {
            ", stock = ?13 WHERE id = ?1 AND stock = ?14"
        } else {
            " WHERE id = ?1"
        };
        let sql = format!(
            "UPDATE products SET \
                name = ?2, sku = ?3, category = ?4, description = ?5, \
                price_cents = ?6, min_stock = ?7, max_stock = ?8, \
                supplier_id = ?9, unit = ?10, location = ?11, updated_at = ?12\
             {stock_clause}"
        );

        let mut query = sqlx::query(&sql)
            .bind(&product.id)
            .bind(&product.name)
            .bind(&product.sku)
            .bind(&product.category)
            .bind(&product.description)
            .bind(product.price_cents)
            .bind(product.min_stock)
            .bind(product.max_stock)
            .bind(&product.supplier_id)
            .bind(&product.unit)
            .bind(&product.location)
            .bind(product.updated_at);
        if let Some(previous) = expected_stock {
            query = query.bind(product.stock).bind(previous);
        }

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| with_sku(e.into(), &product.sku))?;

        if result.rows_affected() == 0 {
            if expected_stock.is_some() && self.get_by_id(&product.id).await?.is_some() {
                return Err(DbError::ConcurrentUpdate {
                    product_id: product.id.clone(),
                    attempts: 1,
                });
            }
            return Err(DbError::not_found("Product", &product.id));
        }
        Ok(())
    }

    /// Hard-deletes a product. Movements, alerts and requests that point at
    /// it are left alone.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        debug!(id = %id, "Deleted product");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Fills in the offending value, which SQLite's message leaves out.
fn with_sku(err: DbError, sku: &str) -> DbError {
    match err {
        DbError::UniqueViolation { field, .. } if field == "sku" => DbError::duplicate(field, sku),
        other => other,
    }
}

// =============================================================================
// Tests
// =============================================================================
