//! # stockroom-client: Client State Store
//!
//! The front-end's view of the inventory, kept as an explicit container
//! that only changes through named operations.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  UI action ──► InventoryStore::add_product / apply_movement / ...       │
//! │                    │                                                    │
//! │                    │ 1. (apply_movement only) optimistic stock patch    │
//! │                    ▼                                                    │
//! │                ApiClient ──── HTTP/JSON ────► stockroom-api              │
//! │                    │                                                    │
//! │                    │ 2. refetch or reconcile from the server            │
//! │                    ▼                                                    │
//! │             InventorySnapshot { products, suppliers, movements,         │
//! │                                 alerts, requests }                      │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  render ◄── with_snapshot(|s| ...)                                      │
//! │                                                                         │
//! │  On failure: logged, returned, snapshot left as it was.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let mut client = ApiClient::new("http://localhost:4000");
//! client.login("admin", "secreto123").await?;
//!
//! let store = InventoryStore::new(client);
//! store.load_all().await?;
//! let low = store.with_snapshot(|s| s.products.iter().filter(|p| p.needs_restock()).count());
//! ```

pub mod error;
pub mod http;
pub mod store;

pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use store::{InventorySnapshot, InventoryStore};
