//! # Access Control
//!
//! Which role may do what. The API checks a capability on every call
//! before touching the store; the browser hiding a button is not enough.
//!
//! ```text
//! ┌──────────────────────┬───────┬─────────┬──────────┐
//! │ Capability           │ admin │ manager │ employee │
//! ├──────────────────────┼───────┼─────────┼──────────┤
//! │ view_inventory       │   ✓   │    ✓    │    ✓     │
//! │ manage_products      │   ✓   │    ✓    │          │
//! │ manage_suppliers     │   ✓   │    ✓    │          │
//! │ record_movements     │   ✓   │    ✓    │          │
//! │ manage_alerts        │   ✓   │    ✓    │    ✓     │
//! │ submit_requests      │   ✓   │    ✓    │    ✓     │
//! │ review_requests      │   ✓   │    ✓    │          │
//! │ manage_users         │   ✓   │         │          │
//! └──────────────────────┴───────┴─────────┴──────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::types::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewInventory,
    ManageProducts,
    ManageSuppliers,
    RecordMovements,
    ManageAlerts,
    SubmitRequests,
    ReviewRequests,
    ManageUsers,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::ViewInventory,
        Capability::ManageProducts,
        Capability::ManageSuppliers,
        Capability::RecordMovements,
        Capability::ManageAlerts,
        Capability::SubmitRequests,
        Capability::ReviewRequests,
        Capability::ManageUsers,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewInventory => "view_inventory",
            Capability::ManageProducts => "manage_products",
            Capability::ManageSuppliers => "manage_suppliers",
            Capability::RecordMovements => "record_movements",
            Capability::ManageAlerts => "manage_alerts",
            Capability::SubmitRequests => "submit_requests",
            Capability::ReviewRequests => "review_requests",
            Capability::ManageUsers => "manage_users",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Role {
    /// True when this role holds `capability`.
    pub fn can(&self, capability: Capability) -> bool {
        match self {
            Role::Admin => true,
            Role::Manager => capability != Capability::ManageUsers,
            Role::Employee => matches!(
                capability,
                Capability::ViewInventory
                    | Capability::ManageAlerts
                    | Capability::SubmitRequests
            ),
        }
    }

    /// All capabilities this role holds, in table order.
    pub fn capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.can(*c))
            .collect()
    }
}
