//! Products, suppliers, movements, alerts and reports.
//!
//! ## Alert upkeep
//! Every product create/update and every movement is followed by a pass of
//! the alert deriver. That pass is best effort: a failure is logged and the
//! mutation that triggered it still succeeds. `POST /alerts/refresh` runs
//! the same pass and does propagate errors.

use chrono::Utc;
use tracing::{info, warn};

use stockroom_core::alerts::derive_alerts;
use stockroom_core::movement::{MovementRequest, MovementTotals};
use stockroom_core::product::{ensure_sku_available, ProductDraft, ProductPatch};
use stockroom_core::report::{
    movements_in_range, products_csv, InventorySummary, ReportRange, ReportSummary,
};
use stockroom_core::search::search_products;
use stockroom_core::supplier::SupplierDraft;
use stockroom_core::validation::validate_search_query;
use stockroom_core::{new_id, Alert, CoreError, Movement, Product, Supplier, ValidationError};
use stockroom_db::{Database, DbError};

use crate::error::ApiResult;

#[derive(Debug, Clone)]
pub struct InventoryService {
    db: Database,
}

impl InventoryService {
    pub fn new(db: Database) -> Self {
        InventoryService { db }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// All products in insertion order, or those matching `query`.
    pub async fn list_products(&self, query: Option<&str>) -> ApiResult<Vec<Product>> {
        let products = self.db.products().list().await?;

        match query {
            Some(raw) => {
                let query = validate_search_query(raw)?;
                Ok(search_products(&products, &query)
                    .into_iter()
                    .cloned()
                    .collect())
            }
            None => Ok(products),
        }
    }

    pub async fn get_product(&self, id: &str) -> ApiResult<Product> {
        self.db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()).into())
    }

    pub async fn create_product(&self, draft: ProductDraft) -> ApiResult<Product> {
        draft.validate()?;
        self.ensure_supplier_exists(&draft.supplier_id).await?;

        let holder = self.db.products().get_by_sku(draft.sku.trim()).await?;
        ensure_sku_available(holder.as_slice(), &draft.sku, None)?;

        let product = draft.into_product(new_id(), Utc::now())?;
        self.db.products().insert(&product).await?;
        info!(id = %product.id, sku = %product.sku, stock = product.stock, "Product created");

        self.sync_alerts().await;
        Ok(product)
    }

    pub async fn update_product(&self, id: &str, patch: ProductPatch) -> ApiResult<Product> {
        let existing = self.get_product(id).await?;
        if patch.is_empty() {
            return Ok(existing);
        }

        let updated = patch.apply(&existing, Utc::now())?;

        if patch.changes_sku(&existing) {
            let holder = self.db.products().get_by_sku(&updated.sku).await?;
            ensure_sku_available(holder.as_slice(), &updated.sku, Some(id))?;
        }
        if patch.changes_supplier(&existing) {
            self.ensure_supplier_exists(&updated.supplier_id).await?;
        }

        // stock is only written when the patch sets it, and only if no
        // movement landed since `existing` was read
        let expected_stock = patch.stock.map(|_| existing.stock);
        self.db.products().update(&updated, expected_stock).await?;
        info!(id = %updated.id, sku = %updated.sku, "Product updated");

        self.sync_alerts().await;
        self.get_product(id).await
    }

    /// Hard delete. Past movements keep their product id.
    pub async fn delete_product(&self, id: &str) -> ApiResult<()> {
        match self.db.products().delete(id).await {
            Ok(()) => {
                info!(id = %id, "Product deleted");
                Ok(())
            }
            Err(DbError::NotFound { .. }) => {
                Err(CoreError::ProductNotFound(id.to_string()).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_supplier_exists(&self, supplier_id: &str) -> ApiResult<()> {
        let supplier_id = supplier_id.trim();
        if self.db.suppliers().get_by_id(supplier_id).await?.is_some() {
            return Ok(());
        }
        Err(ValidationError::InvalidFormat {
            field: "supplierId".to_string(),
            reason: format!("no supplier with id '{}'", supplier_id),
        }
        .into())
    }

    // =========================================================================
    // Suppliers
    // =========================================================================

    pub async fn list_suppliers(&self) -> ApiResult<Vec<Supplier>> {
        Ok(self.db.suppliers().list().await?)
    }

    pub async fn get_supplier(&self, id: &str) -> ApiResult<Supplier> {
        self.db
            .suppliers()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::SupplierNotFound(id.to_string()).into())
    }

    pub async fn create_supplier(&self, draft: SupplierDraft) -> ApiResult<Supplier> {
        let supplier = draft.into_supplier(new_id(), Utc::now())?;
        self.db.suppliers().insert(&supplier).await?;
        info!(id = %supplier.id, name = %supplier.name, "Supplier created");
        Ok(supplier)
    }

    // =========================================================================
    // Movements
    // =========================================================================

    pub async fn list_movements(&self, product_id: Option<&str>) -> ApiResult<Vec<Movement>> {
        let movements = match product_id {
            Some(id) => self.db.movements().list_for_product(id).await?,
            None => self.db.movements().list().await?,
        };
        Ok(movements)
    }

    /// Records the movement and moves stock in one transaction.
    pub async fn record_movement(&self, request: MovementRequest) -> ApiResult<Movement> {
        let applied = self.db.movements().apply(&request).await?;

        if applied.clamped {
            warn!(
                product_id = %applied.product.id,
                requested = applied.movement.quantity,
                shortfall = applied.shortfall,
                "Exit exceeded stock on hand; stock clamped to zero"
            );
        }

        self.sync_alerts().await;
        Ok(applied.movement)
    }

    // =========================================================================
    // Alerts
    // =========================================================================

    pub async fn list_alerts(&self, unread_only: bool) -> ApiResult<Vec<Alert>> {
        let alerts = if unread_only {
            self.db.alerts().list_unread().await?
        } else {
            self.db.alerts().list().await?
        };
        Ok(alerts)
    }

    /// Runs the alert deriver over the current products and stores the
    /// alerts it produces. Returns only the new ones.
    pub async fn refresh_alerts(&self) -> ApiResult<Vec<Alert>> {
        let products = self.db.products().list().await?;
        let existing = self.db.alerts().list().await?;

        let fresh = derive_alerts(&products, &existing, Utc::now());
        if !fresh.is_empty() {
            self.db.alerts().insert_many(&fresh).await?;
            info!(count = fresh.len(), "Stock alerts raised");
        }
        Ok(fresh)
    }

    async fn sync_alerts(&self) {
        if let Err(e) = self.refresh_alerts().await {
            warn!(error = %e, "Alert refresh failed after inventory change");
        }
    }

    pub async fn mark_alert_read(&self, id: &str) -> ApiResult<Alert> {
        match self.db.alerts().mark_read(id).await {
            Ok(alert) => Ok(alert),
            Err(DbError::NotFound { .. }) => {
                Err(CoreError::AlertNotFound(id.to_string()).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Movements created within `range`, in store order.
    pub async fn movement_report(&self, range: &ReportRange) -> ApiResult<Vec<Movement>> {
        let movements = self.db.movements().list().await?;
        Ok(movements_in_range(&movements, range))
    }

    /// Inventory figures plus movement totals, over `range` when given.
    pub async fn summary(&self, range: Option<&ReportRange>) -> ApiResult<ReportSummary> {
        let products = self.db.products().list().await?;
        let mut movements = self.db.movements().list().await?;
        if let Some(range) = range {
            movements = movements_in_range(&movements, range);
        }

        Ok(ReportSummary {
            inventory: InventorySummary::from_products(&products),
            movements: MovementTotals::from_movements(&movements),
        })
    }

    pub async fn products_csv(&self) -> ApiResult<String> {
        let products = self.db.products().list().await?;
        Ok(products_csv(&products))
    }
}
