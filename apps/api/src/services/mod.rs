//! Service layer.
//!
//! Handlers stay thin: they authenticate, check the capability and hand a
//! typed body to a service. Services combine `stockroom-core` rules with
//! `stockroom-db` repositories and return [`ApiResult`](crate::error::ApiResult).
//!
//! ```text
//! ┌────────────────┐  ┌────────────────┐  ┌────────────────┐
//! │InventoryService│  │ RequestService │  │ AccountService │
//! │ • products     │  │ • submit       │  │ • register     │
//! │ • suppliers    │  │ • review       │  │ • login        │
//! │ • movements    │  └────────────────┘  └────────────────┘
//! │ • alerts       │
//! │ • reports      │
//! └────────────────┘
//! ```

pub mod accounts;
pub mod inventory;
pub mod requests;

pub use accounts::AccountService;
pub use inventory::InventoryService;
pub use requests::RequestService;
