//! # Product Search
//!
//! Case-insensitive substring match over name, SKU and category.
//! No ranking: matches come back in the order they were given.

use crate::types::Product;

/// Returns the products matching `query`.
///
/// An empty or whitespace-only query returns every product, in order.
///
/// ## Example
/// ```rust,ignore
/// let hits = search_products(&products, "gloria");
/// assert_eq!(hits[0].name, "Leche Gloria 1L");
/// ```
pub fn search_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();

    if needle.is_empty() {
        return products.iter().collect();
    }

    products
        .iter()
        .filter(|p| matches(p, &needle))
        .collect()
}

/// `needle` must already be lowercased.
fn matches(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.sku.to_lowercase().contains(needle)
        || product.category.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(name: &str, sku: &str, category: &str) -> Product {
        let now = Utc::now();
        Product {
            id: sku.to_lowercase(),
            name: name.into(),
            sku: sku.into(),
            category: category.into(),
            description: Some("gloria in the description does not count".into()),
            price_cents: 100,
            stock: 1,
            min_stock: 0,
            max_stock: 10,
            supplier_id: "s-1".into(),
            unit: "unidad".into(),
            location: "A".into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("Arroz Costeño 5kg", "ARROZ-5KG", "Abarrotes"),
            product("Leche Gloria 1L", "LECHE-GL-1L", "Lacteos"),
            product("Yogurt Fresa", "YOG-FRESA", "Lacteos"),
        ]
    }

    #[test]
    fn test_matches_name_case_insensitive() {
        let products = catalog();
        let hits = search_products(&products, "gloria");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Leche Gloria 1L");
    }

    #[test]
    fn test_matches_sku_and_category() {
        let products = catalog();
        assert_eq!(search_products(&products, "arroz-5").len(), 1);

        let dairy: Vec<&str> = search_products(&products, " LACTEOS ")
            .iter()
            .map(|p| p.sku.as_str())
            .collect();
        assert_eq!(dairy, vec!["LECHE-GL-1L", "YOG-FRESA"]);
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let products = catalog();
        let all = search_products(&products, "   ");
        assert_eq!(all.len(), 3);
        assert!(all.iter().zip(products.iter()).all(|(a, b)| a.id == b.id));
    }

    #[test]
    fn test_no_match() {
        assert!(search_products(&catalog(), "cerveza").is_empty());
    }
}
