//! # Seed Data Generator
//!
//! Populates the database with a demo owner, categories, shops and products
//! for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./catalog.db (or $CATALOG_DATABASE_PATH)
//! cargo run -p catalog-db --bin seed
//!
//! # Specify database path and products per shop
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db --per-shop 40
//! ```
//!
//! ## Generated Data
//! - One owner: `demo-owner`
//! - Categories: Coffee, Tea, Bakery, Equipment
//! - Three shops, each stocked from every category
//! - Price, stock and rating derived from the product index

use std::env;
use std::time::Instant;

use catalog_core::{
    CreateCategoryRequest, CreateProductRequest, CreateShopRequest, ListProductsRequest,
    ListShopsRequest, Money, PageRequest,
};
use catalog_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

const DEMO_OWNER: &str = "demo-owner";

const SHOPS: &[(&str, &str)] = &[
    ("Morning Roast", "Single origin beans, roasted weekly"),
    ("Leaf & Kettle", "Loose leaf teas and brewing gear"),
    ("Corner Bakery", "Bread and pastries, baked before dawn"),
];

/// Category name, brand, product names.
const CATALOG: &[(&str, &str, &[&str])] = &[
    (
        "Coffee",
        "Highland",
        &[
            "Ethiopia Yirgacheffe",
            "Colombia Supremo",
            "Sumatra Mandheling",
            "House Espresso",
            "Decaf Blend",
        ],
    ),
    (
        "Tea",
        "Leafwise",
        &["Sencha", "Earl Grey", "Assam Breakfast", "Jasmine Pearls", "Rooibos"],
    ),
    (
        "Bakery",
        "Crumb & Co",
        &["Sourdough Loaf", "Butter Croissant", "Cinnamon Roll", "Rye Bread"],
    ),
    (
        "Equipment",
        "Brewline",
        &["Pour Over Dripper", "Burr Grinder", "Gooseneck Kettle", "Tea Infuser"],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut config = DbConfig::from_env()?;
    let mut per_shop: usize = 12;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--per-shop" | "-n" => {
                if i + 1 < args.len() {
                    per_shop = args[i + 1].parse().unwrap_or(12);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>        Database file path (default: $CATALOG_DATABASE_PATH or ./catalog.db)");
                println!("  -n, --per-shop <N>     Products per shop (default: 12)");
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Catalog Seed Data Generator");
    println!("==============================");
    println!("Database: {}", config.database_path.display());
    println!("Products per shop: {}", per_shop);
    println!();

    let db = Database::new(config).await?;
    if !db.health_check().await {
        return Err("database is not responding".into());
    }

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.shops().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} shops", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = Instant::now();

    let mut categories = Vec::with_capacity(CATALOG.len());
    for (name, brand, products) in CATALOG {
        let category = db
            .categories()
            .create(&CreateCategoryRequest {
                user_id: DEMO_OWNER.to_string(),
                name: name.to_string(),
            })
            .await?;
        categories.push((category.id, *brand, *products));
    }
    println!("✓ Created {} categories", categories.len());

    let mut generated = 0usize;
    for (shop_idx, (name, description)) in SHOPS.iter().enumerate() {
        let shop = db
            .shops()
            .create(&CreateShopRequest {
                user_id: DEMO_OWNER.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                terms: "Returns accepted within 14 days".to_string(),
            })
            .await?;

        for n in 0..per_shop {
            let seed = shop_idx * 100 + n;
            let (category_id, brand, names) = &categories[seed % categories.len()];
            let name = names[(seed / categories.len()) % names.len()];

            let req = CreateProductRequest {
                user_id: DEMO_OWNER.to_string(),
                shop_id: shop.id.clone(),
                category_id: category_id.clone(),
                name: name.to_string(),
                description: format!("{} from {}", name, brand),
                // $3.99 - $27.99
                price: Money::from_cents(399 + ((seed * 37) % 25) as i64 * 100),
                stock: (seed % 50) as i32,
                rating: (seed % 5) as i32 + 1,
                brand: brand.to_string(),
                image_url: None,
            };

            if let Err(e) = db.products().create(&req).await {
                eprintln!("Failed to insert {}: {}", req.name, e);
                continue;
            }
            generated += 1;
        }
    }

    println!(
        "✓ Generated {} shops, {} products in {:?}",
        SHOPS.len(),
        generated,
        start.elapsed()
    );

    println!();
    println!("Verifying listings...");

    let shops = db
        .shops()
        .list(&ListShopsRequest {
            user_id: DEMO_OWNER.to_string(),
            page: PageRequest::new(1, 2),
        })
        .await?;
    println!(
        "  Shops page 1/{}: {} of {} shops",
        shops.meta.total_page,
        shops.items.len(),
        shops.meta.total_data
    );
    for shop in &shops.items {
        println!("    {} ({} products)", shop.name, shop.products.len());
    }

    let tea = db
        .products()
        .list(&ListProductsRequest {
            category: Some("tea".to_string()),
            ..Default::default()
        })
        .await?;
    println!(
        "  Category 'tea': {} results ({} pages)",
        tea.meta.total_data, tea.meta.total_page
    );
    for item in tea.items.iter().take(3) {
        println!("    {} - ${} [{}★]", item.name, item.price(), item.rating);
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
