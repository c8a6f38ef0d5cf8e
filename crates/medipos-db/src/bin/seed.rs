//! # Seed Data Generator
//!
//! Populates the database with a development pharmacy formulary.
//!
//! ## Usage
//! ```bash
//! # Generate the default formulary
//! cargo run -p medipos-db --bin seed
//!
//! # Generate a custom amount
//! cargo run -p medipos-db --bin seed -- --count 500
//!
//! # Specify database path
//! cargo run -p medipos-db --bin seed -- --db ./data/medipos.db
//! ```
//!
//! ## Generated Products
//! Creates realistic formulary data across groups (analgesics, antibiotics,
//! antihistamines, gastro, chronic care, consumables). Each product has:
//! - Realistic name + strength/pack variant
//! - Price derived deterministically from its position
//! - Stock 0-120 with a reorder level of 5-20

use chrono::Utc;
use std::env;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use medipos_core::Product;
use medipos_db::{Database, DbConfig};

/// Formulary groups for realistic test data
const FORMULARY: &[(&str, &[&str])] = &[
    (
        "Analgesics",
        &[
            "Paracetamol",
            "Ibuprofen",
            "Diclofenac",
            "Naproxen",
            "Tramadol",
            "Aspirin",
            "Mefenamic Acid",
            "Ketorolac",
        ],
    ),
    (
        "Antibiotics",
        &[
            "Amoxicillin",
            "Azithromycin",
            "Ciprofloxacin",
            "Doxycycline",
            "Cephalexin",
            "Metronidazole",
            "Clarithromycin",
            "Co-amoxiclav",
        ],
    ),
    (
        "Antihistamines",
        &[
            "Cetirizine",
            "Loratadine",
            "Fexofenadine",
            "Chlorphenamine",
            "Desloratadine",
            "Promethazine",
        ],
    ),
    (
        "Gastro",
        &[
            "Omeprazole",
            "Pantoprazole",
            "Ranitidine",
            "Domperidone",
            "Ondansetron",
            "Loperamide",
            "Oral Rehydration Salts",
        ],
    ),
    (
        "Chronic Care",
        &[
            "Metformin",
            "Amlodipine",
            "Losartan",
            "Atorvastatin",
            "Levothyroxine",
            "Salbutamol Inhaler",
            "Insulin Glargine",
            "Enalapril",
        ],
    ),
    (
        "Consumables",
        &[
            "Surgical Gloves",
            "Gauze Roll",
            "Adhesive Bandage",
            "Syringe 5ml",
            "IV Cannula",
            "Antiseptic Solution",
            "Face Mask",
        ],
    ),
];

/// Strength / pack variants
const VARIANTS: &[(&str, i64)] = &[
    ("250mg", 0),
    ("500mg", 150),
    ("10 pack", 300),
    ("30 pack", 700),
    ("100ml", 250),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./medipos_dev.db");

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
                println!("MediPOS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./medipos_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("MediPOS Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Generate products
    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (group_idx, (_group, names)) in FORMULARY.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            for (variant_idx, (variant, price_addon)) in VARIANTS.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let product = generate_product(
                    name,
                    variant,
                    *price_addon,
                    group_idx * 1000 + name_idx * 10 + variant_idx,
                );

                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }

                generated += 1;

                if generated % 50 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    // Show the reorder worklist the engine's reminders feed
    let low = db.products().list_below_reorder(10).await?;
    println!();
    println!("Products already at/below reorder level: {}", low.len());
    for product in low {
        println!(
            "  {:<40} stock {:>3}  reorder at {:>3}",
            product.name, product.stock_on_hand, product.reorder_level
        );
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with realistic data.
fn generate_product(name: &str, variant: &str, price_addon: i64, seed: usize) -> Product {
    let now = Utc::now();

    // Price: base $0.99-$8.99 + variant addon
    let base_price = 99 + ((seed * 17) % 800) as i64;
    let unit_price_cents = base_price + price_addon;

    // Stock 0-120, reorder level 5-20
    let stock_on_hand = (seed % 121) as i64;
    let reorder_level = 5 + (seed % 16) as i64;

    Product {
        id: Uuid::new_v4().to_string(),
        name: format!("{} {}", name, variant),
        unit_price_cents,
        stock_on_hand,
        reorder_level,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}
