//! Supplier creation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::types::Supplier;
use crate::validation::{validate_email, validate_required};

/// Body of `POST /suppliers`. Only the name is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplierDraft {
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
}

impl SupplierDraft {
    pub fn validate(&self) -> CoreResult<()> {
        validate_required("name", &self.name)?;
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            validate_email(email)?;
        }
        Ok(())
    }

    /// New suppliers start active.
    pub fn into_supplier(self, id: String, now: DateTime<Utc>) -> CoreResult<Supplier> {
        self.validate()?;
        Ok(Supplier {
            id,
            name: self.name.trim().to_string(),
            contact_person: optional(self.contact_person),
            email: optional(self.email),
            phone: optional(self.phone),
            address: optional(self.address),
            tax_id: optional(self.tax_id),
            is_active: true,
            created_at: now,
        })
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
