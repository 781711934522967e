//! # Seed Data Generator
//!
//! Fills a warehouse database with demo products for local development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p warehouse-db --bin seed
//!
//! # Generate custom amount into a specific file
//! cargo run -p warehouse-db --bin seed -- --count 1000 --db ./data/warehouse.db
//!
//! # Assign every product to an owner
//! cargo run -p warehouse-db --bin seed -- --owner a@x.com
//! ```
//!
//! Each product gets a name, category, supplier, price, opening stock, and
//! a couple of free-form attributes (`sku`, `binLocation`) so the document
//! side of the store is exercised too.
//!
//! The catalogue has 200 name/size variants. Larger counts cycle through it
//! again, and every pass after the first is labelled as a further lot
//! (`Hex Bolt M (lot 2)`).

use anyhow::Context;
use serde_json::json;
use std::env;
use warehouse_core::NewProduct;
use warehouse_db::{Database, DbConfig, ProductStore};

/// Category label and the item names stocked under it.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Fasteners",
        &[
            "Hex Bolt",
            "Carriage Bolt",
            "Wood Screw",
            "Machine Screw",
            "Lock Washer",
            "Flat Washer",
            "Wing Nut",
            "Anchor Plug",
        ],
    ),
    (
        "Tools",
        &[
            "Claw Hammer",
            "Adjustable Wrench",
            "Socket Set",
            "Utility Knife",
            "Tape Measure",
            "Spirit Level",
            "Hacksaw",
            "Cordless Drill",
        ],
    ),
    (
        "Electrical",
        &[
            "Wire Nut",
            "Junction Box",
            "Light Switch",
            "Outlet Cover",
            "Extension Cord",
            "Cable Tie",
            "Circuit Breaker",
            "LED Bulb",
        ],
    ),
    (
        "Plumbing",
        &[
            "PVC Elbow",
            "Ball Valve",
            "Pipe Clamp",
            "Teflon Tape",
            "Hose Clamp",
            "Compression Fitting",
            "Drain Trap",
            "Shutoff Valve",
        ],
    ),
    (
        "Safety",
        &[
            "Work Gloves",
            "Safety Glasses",
            "Ear Plugs",
            "Dust Mask",
            "Hard Hat",
            "Hi-Vis Vest",
            "First Aid Kit",
            "Knee Pads",
        ],
    ),
];

/// Size variants
const SIZES: &[&str] = &["S", "M", "L", "XL", "Bulk"];

/// Suppliers rotated across generated products
const SUPPLIERS: &[&str] = &["Acme Supply", "Northwind Hardware", "Harbor Industrial"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./warehouse.db");
    let mut owner: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1]
                        .parse()
                        .with_context(|| format!("invalid --count value '{}'", args[i + 1]))?;
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--owner" | "-o" => {
                if i + 1 < args.len() {
                    owner = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Warehouse Inventory Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>      Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>      Database file path (default: ./warehouse.db)");
                println!("  -o, --owner <EMAIL>  Assign generated products to this owner");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument '{}'", other);
            }
        }
        i += 1;
    }

    println!("Warehouse Inventory Seed Data Generator");
    println!("=======================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("failed to open database at {}", db_path))?;
    let store = db.products();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = store.count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        db.close().await;
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    let variants: Vec<(&str, &str, &str)> = CATEGORIES
        .iter()
        .flat_map(|(category, names)| {
            names
                .iter()
                .flat_map(move |name| SIZES.iter().map(move |size| (*category, *name, *size)))
        })
        .collect();

    for (seed, (category, name, size)) in variants.iter().cycle().take(count).enumerate() {
        let lot = seed / variants.len() + 1;
        let mut product = generate_product(category, name, size, lot, seed);
        product.email = owner.clone();

        if let Err(e) = store.insert(product).await {
            eprintln!("Failed to insert {} {}: {}", name, size, e);
            continue;
        }

        generated += 1;
        if generated % 50 == 0 {
            println!("  Generated {} products...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    if let Some(owner) = &owner {
        let owned = store
            .find_all(&warehouse_db::ProductFilter::owned_by(owner.as_str()))
            .await?;
        println!("  Owned by {}: {}", owner, owned.len());
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with deterministic demo values.
fn generate_product(
    category: &str,
    name: &str,
    size: &str,
    lot: usize,
    seed: usize,
) -> NewProduct {
    // $0.49 - $49.99
    let price_cents = 49 + ((seed * 37) % 4950) as i64;

    let label = match lot {
        1 => format!("{} {}", name, size),
        n => format!("{} {} (lot {})", name, size, n),
    };

    let mut product = NewProduct::named(label, (seed % 101) as i64);
    product.category = Some(category.to_string());
    product.supplier = Some(SUPPLIERS[seed % SUPPLIERS.len()].to_string());
    product.description = Some(format!("{} ({}), {} aisle", name, size, category));
    product.price = Some(price_cents as f64 / 100.0);

    let prefix: String = category.chars().take(3).collect();
    product.attributes.insert(
        "sku".into(),
        json!(format!("{}-{:04}", prefix.to_uppercase(), seed)),
    );
    product.attributes.insert(
        "binLocation".into(),
        json!(format!("{}{:02}", (b'A' + (seed % 6) as u8) as char, seed % 40)),
    );

    product
}
