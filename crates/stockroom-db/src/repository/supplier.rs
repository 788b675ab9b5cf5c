//! # Supplier Repository

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::Supplier;

const SUPPLIER_COLUMNS: &str =
    "id, name, contact_person, email, phone, address, tax_id, is_active, created_at";

#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists suppliers in insertion order, inactive ones included.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    pub async fn insert(&self, supplier: &Supplier) -> DbResult<()> {
        debug!(id = %supplier.id, name = %supplier.name, "Inserting supplier");

        sqlx::query(
            r#"
            INSERT INTO suppliers (
                id, name, contact_person, email, phone, address, tax_id, is_active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.contact_person)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .bind(&supplier.tax_id)
        .bind(supplier.is_active)
        .bind(supplier.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{sample_supplier, seeded_db};

    #[tokio::test]
    async fn test_insert_list_get() {
        let (db, first) = seeded_db().await;
        let repo = db.suppliers();

        let second = sample_supplier("s-2", "Alicorp");
        repo.insert(&second).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec![first.name.clone(), "Alicorp".to_string()]);

        assert_eq!(repo.get_by_id("s-2").await.unwrap(), Some(second));
        assert!(repo.get_by_id("nope").await.unwrap().is_none());
    }
}
