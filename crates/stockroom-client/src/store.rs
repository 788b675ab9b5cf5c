//! # Inventory Store
//!
//! The client's copy of server state.
//!
//! ## Thread Safety
//! The snapshot sits behind a `Mutex` that is only held for the duration of
//! a closure or a local patch, never across an `.await`.
//!
//! ## Mutations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation            Server call            Snapshot change            │
//! │  ─────────            ───────────            ───────────────            │
//! │  load_all ──────────► GET x5 ──────────────► replace everything         │
//! │  add_product ───────► POST /products ──────► refetch products, alerts   │
//! │  update_product ────► PUT /products/:id ───► refetch products, alerts   │
//! │  remove_product ────► DELETE ──────────────► refetch products           │
//! │  add_supplier ──────► POST /suppliers ─────► refetch suppliers          │
//! │  apply_movement ──┬─► (local stock patch first)                         │
//! │                   └─► POST /movements ─────► append movement,           │
//! │                                              reconcile product, alerts  │
//! │                          on failure ───────► restore previous stock     │
//! │  mark_alert_read ───► POST /alerts/:id/read► local is_read = true       │
//! │  submit_request ────► POST /requests ──────► refetch requests           │
//! │  review_request ────► PUT .../status ──────► refetch requests           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use stockroom_core::movement::{next_stock, MovementRequest};
use stockroom_core::product::{ProductDraft, ProductPatch};
use stockroom_core::request::NewRequest;
use stockroom_core::search::search_products;
use stockroom_core::supplier::SupplierDraft;
use stockroom_core::{
    Alert, Movement, Product, ReplenishmentRequest, RequestStatus, Supplier,
};

use crate::error::ClientResult;
use crate::http::ApiClient;

/// Everything the UI renders from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySnapshot {
    pub products: Vec<Product>,
    pub suppliers: Vec<Supplier>,
    pub movements: Vec<Movement>,
    pub alerts: Vec<Alert>,
    pub requests: Vec<ReplenishmentRequest>,
}

impl InventorySnapshot {
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn unread_alerts(&self) -> usize {
        self.alerts.iter().filter(|a| !a.is_read).count()
    }

    /// Sets a product's stock, returning the previous value.
    fn set_stock(&mut self, product_id: &str, stock: i64) -> Option<i64> {
        let product = self.products.iter_mut().find(|p| p.id == product_id)?;
        Some(std::mem::replace(&mut product.stock, stock))
    }

    /// Replaces a product in place, or appends it if unknown.
    fn upsert_product(&mut self, product: Product) {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => *slot = product,
            None => self.products.push(product),
        }
    }
}

/// Client-side state container.
#[derive(Debug)]
pub struct InventoryStore {
    client: ApiClient,
    snapshot: Mutex<InventorySnapshot>,
}

impl InventoryStore {
    pub fn new(client: ApiClient) -> Self {
        InventoryStore {
            client,
            snapshot: Mutex::new(InventorySnapshot::default()),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn lock(&self) -> MutexGuard<'_, InventorySnapshot> {
        // a panic mid-patch leaves plain data behind; keep using it
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the snapshot.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let count = store.with_snapshot(|s| s.products.len());
    /// ```
    pub fn with_snapshot<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&InventorySnapshot) -> R,
    {
        let snapshot = self.lock();
        f(&snapshot)
    }

    /// A clone of the whole snapshot.
    pub fn snapshot(&self) -> InventorySnapshot {
        self.lock().clone()
    }

    // =========================================================================
    // Refetch
    // =========================================================================

    /// Fetches every collection and swaps them in together. On any failure
    /// the previous snapshot stays.
    pub async fn load_all(&self) -> ClientResult<()> {
        let fetched = async {
            Ok::<_, crate::ClientError>(InventorySnapshot {
                products: self.client.list_products(None).await?,
                suppliers: self.client.list_suppliers().await?,
                movements: self.client.list_movements(None).await?,
                alerts: self.client.list_alerts(false).await?,
                requests: self.client.list_requests().await?,
            })
        }
        .await;

        match fetched {
            Ok(snapshot) => {
                debug!(
                    products = snapshot.products.len(),
                    movements = snapshot.movements.len(),
                    "Inventory loaded"
                );
                *self.lock() = snapshot;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load inventory");
                Err(e)
            }
        }
    }

    pub async fn refresh_products(&self) -> ClientResult<()> {
        let products = logged(self.client.list_products(None).await, "refresh products")?;
        self.lock().products = products;
        Ok(())
    }

    pub async fn refresh_suppliers(&self) -> ClientResult<()> {
        let suppliers = logged(self.client.list_suppliers().await, "refresh suppliers")?;
        self.lock().suppliers = suppliers;
        Ok(())
    }

    pub async fn refresh_movements(&self) -> ClientResult<()> {
        let movements = logged(self.client.list_movements(None).await, "refresh movements")?;
        self.lock().movements = movements;
        Ok(())
    }

    pub async fn refresh_alerts(&self) -> ClientResult<()> {
        let alerts = logged(self.client.list_alerts(false).await, "refresh alerts")?;
        self.lock().alerts = alerts;
        Ok(())
    }

    pub async fn refresh_requests(&self) -> ClientResult<()> {
        let requests = logged(self.client.list_requests().await, "refresh requests")?;
        self.lock().requests = requests;
        Ok(())
    }

    /// Alerts are raised server-side after stock changes; a stale alert
    /// list is not worth failing the mutation over.
    async fn refresh_alerts_quietly(&self) {
        let _ = self.refresh_alerts().await;
    }

    // =========================================================================
    // Products & suppliers
    // =========================================================================

    pub async fn add_product(&self, draft: &ProductDraft) -> ClientResult<Product> {
        let product = logged(self.client.create_product(draft).await, "create product")?;
        self.refresh_products().await?;
        self.refresh_alerts_quietly().await;
        Ok(product)
    }

    pub async fn update_product(&self, id: &str, patch: &ProductPatch) -> ClientResult<Product> {
        let product = logged(
            self.client.update_product(id, patch).await,
            "update product",
        )?;
        self.refresh_products().await?;
        self.refresh_alerts_quietly().await;
        Ok(product)
    }

    pub async fn remove_product(&self, id: &str) -> ClientResult<()> {
        logged(self.client.delete_product(id).await, "delete product")?;
        self.refresh_products().await
    }

    pub async fn add_supplier(&self, draft: &SupplierDraft) -> ClientResult<Supplier> {
        let supplier = logged(self.client.create_supplier(draft).await, "create supplier")?;
        self.refresh_suppliers().await?;
        Ok(supplier)
    }

    // =========================================================================
    // Movements
    // =========================================================================

    /// Applies a movement.
    ///
    /// The product's stock is patched locally before the server answers.
    /// On success the movement is appended and the product re-read from the
    /// server; on failure the previous stock is put back and the error is
    /// returned.
    pub async fn apply_movement(&self, request: &MovementRequest) -> ClientResult<Movement> {
        let movement_type = logged(request.validate().map_err(Into::into), "apply movement")?;

        let previous = {
            let mut snapshot = self.lock();
            let current = snapshot.product(&request.product_id).map(|p| p.stock);
            current.and_then(|stock| {
                let optimistic = next_stock(stock, movement_type, request.quantity);
                snapshot.set_stock(&request.product_id, optimistic)
            })
        };

        let movement = match self.client.create_movement(request).await {
            Ok(movement) => movement,
            Err(e) => {
                warn!(error = %e, product_id = %request.product_id, "Movement rejected; restoring stock");
                if let Some(stock) = previous {
                    self.lock().set_stock(&request.product_id, stock);
                }
                return Err(e);
            }
        };

        self.lock().movements.push(movement.clone());

        match self.client.get_product(&movement.product_id).await {
            Ok(product) => self.lock().upsert_product(product),
            Err(e) => {
                warn!(error = %e, product_id = %movement.product_id, "Could not reconcile product after movement")
            }
        }
        self.refresh_alerts_quietly().await;

        Ok(movement)
    }

    // =========================================================================
    // Alerts & requests
    // =========================================================================

    pub async fn mark_alert_read(&self, id: &str) -> ClientResult<()> {
        logged(self.client.mark_alert_read(id).await, "mark alert read")?;
        if let Some(alert) = self.lock().alerts.iter_mut().find(|a| a.id == id) {
            alert.mark_read();
        }
        Ok(())
    }

    pub async fn submit_request(&self, body: &NewRequest) -> ClientResult<ReplenishmentRequest> {
        let request = logged(self.client.submit_request(body).await, "submit request")?;
        self.refresh_requests().await?;
        Ok(request)
    }

    pub async fn review_request(
        &self,
        id: &str,
        status: RequestStatus,
    ) -> ClientResult<ReplenishmentRequest> {
        let request = logged(
            self.client.review_request(id, status).await,
            "review request",
        )?;
        self.refresh_requests().await?;
        Ok(request)
    }

    // =========================================================================
    // Local queries
    // =========================================================================

    /// Searches the loaded products without a round trip. Empty query
    /// returns every product in order.
    pub fn search(&self, query: &str) -> Vec<Product> {
        self.with_snapshot(|s| {
            search_products(&s.products, query)
                .into_iter()
                .cloned()
                .collect()
        })
    }
}

fn logged<T>(result: ClientResult<T>, action: &str) -> ClientResult<T> {
    if let Err(e) = &result {
        warn!(error = %e, action, "Inventory store operation failed");
    }
    result
}
