//! # Seed Data Generator
//!
//! Populates a development database with suppliers and products.
//!
//! ## Usage
//! ```bash
//! # Default database path (./stockroom_dev.db), 200 products
//! cargo run -p stockroom-db --bin seed
//!
//! # Custom amount and path
//! cargo run -p stockroom-db --bin seed -- --count 1000 --db ./data/stockroom.db
//! ```
//!
//! ## Generated Data
//! - One supplier per category
//! - Products named `{item} {size}` with SKU `{CAT}-{ITEM}-{NNN}`
//! - Stock spread so that some products start low or out of stock
//! - Alerts derived for those products, as the API would

use chrono::Utc;
use std::env;
use stockroom_core::alerts::derive_alerts;
use stockroom_core::supplier::SupplierDraft;
use stockroom_core::{new_id, Product, Supplier};
use stockroom_db::{Database, DbConfig};

/// (code, category, supplier, items)
const CATALOG: &[(&str, &str, &str, &[&str])] = &[
    (
        "LAC",
        "Lacteos",
        "Gloria S.A.",
        &["Leche Gloria", "Yogurt Fresa", "Queso Fresco", "Mantequilla", "Leche Evaporada"],
    ),
    (
        "ABA",
        "Abarrotes",
        "Alicorp S.A.A.",
        &["Arroz Costeño", "Azucar Rubia", "Aceite Primor", "Fideos Don Vittorio", "Avena"],
    ),
    (
        "BEB",
        "Bebidas",
        "Corporacion Lindley",
        &["Inca Kola", "Agua San Luis", "Coca-Cola", "Chicha Morada", "Jugo Frugos"],
    ),
    (
        "LIM",
        "Limpieza",
        "Intradevco",
        &["Detergente Opal", "Lejia Clorox", "Jabon Bolivar", "Lavavajilla Sapolio"],
    ),
];

/// (label, price addon in cents, unit)
const SIZES: &[(&str, i64, &str)] = &[
    ("500g", 0, "unidad"),
    ("1kg", 250, "unidad"),
    ("5kg", 1800, "bolsa"),
    ("Pack x6", 900, "paquete"),
    ("Caja x12", 2200, "caja"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./stockroom_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./stockroom_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Stockroom Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0;
    let mut products = Vec::with_capacity(count);

    'catalog: for (category_idx, (code, category, supplier_name, items)) in
        CATALOG.iter().enumerate()
    {
        let supplier = make_supplier(supplier_name)?;
        db.suppliers().insert(&supplier).await?;
        println!("  + supplier {}", supplier.name);

        // cycle through the catalog until `count` is reached
        for round in 0.. {
            for (item_idx, item) in items.iter().enumerate() {
                for (size_idx, size) in SIZES.iter().enumerate() {
                    if generated >= count {
                        break 'catalog;
                    }
                    let seed = category_idx * 10_000 + round * 1_000 + item_idx * 20 + size_idx;
                    let product = make_product(code, category, item, size, &supplier.id, seed);

                    if let Err(e) = db.products().insert(&product).await {
                        eprintln!("Failed to insert {}: {}", product.sku, e);
                        continue;
                    }
                    products.push(product);
                    generated += 1;
                }
            }
            // spread products evenly across categories
            if generated >= (category_idx + 1) * count / CATALOG.len() {
                break;
            }
        }
    }

    let alerts = derive_alerts(&products, &[], Utc::now());
    db.alerts().insert_many(&alerts).await?;

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);
    println!("✓ Derived {} stock alerts", alerts.len());
    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

fn make_supplier(name: &str) -> Result<Supplier, Box<dyn std::error::Error>> {
    let slug: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    let draft = SupplierDraft {
        name: name.to_string(),
        contact_person: Some("Ventas".to_string()),
        email: Some(format!("ventas@{slug}.pe")),
        phone: Some("+51 1 555 0100".to_string()),
        address: Some("Lima, Peru".to_string()),
        tax_id: None,
    };
    Ok(draft.into_supplier(new_id(), Utc::now())?)
}

fn make_product(
    code: &str,
    category: &str,
    item: &str,
    size: &(&str, i64, &str),
    supplier_id: &str,
    seed: usize,
) -> Product {
    let now = Utc::now();
    let (size_label, price_addon, unit) = *size;

    let item_code: String = item
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(4)
        .collect::<String>()
        .to_uppercase();
    let sku = format!("{code}-{item_code}-{seed:05}");

    // 1.50 - 9.49 base, plus size
    let price_cents = 150 + ((seed * 37) % 800) as i64 + price_addon;

    let min_stock = 5 + (seed % 4) as i64 * 5;
    let max_stock = min_stock * 10;
    // every seventh product starts empty, every fifth starts low
    let stock = match seed % 35 {
        s if s % 7 == 0 => 0,
        s if s % 5 == 0 => min_stock - 1,
        s => min_stock + 3 * s as i64,
    };

    Product {
        id: new_id(),
        name: format!("{item} {size_label}"),
        sku,
        category: category.to_string(),
        description: None,
        price_cents,
        stock: stock.max(0),
        min_stock,
        max_stock,
        supplier_id: supplier_id.to_string(),
        unit: unit.to_string(),
        location: format!("Pasillo {}", 1 + seed % 12),
        created_at: now,
        updated_at: now,
    }
}
