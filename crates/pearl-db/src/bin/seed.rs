//! # Seed Data Generator
//!
//! Populates the database with a development menu, staff, inventory, and a
//! day of sales so the reports have something to show.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p pearl-db --bin seed
//!
//! # Specify database path
//! cargo run -p pearl-db --bin seed -- --db ./data/pearl.db
//!
//! # Control how many sale headers are generated for today
//! cargo run -p pearl-db --bin seed -- --sales 200
//! ```
//!
//! ## Generated Data
//! - Menu: drinks, toppings, and seasonal items with realistic prices
//! - Employees: a small cashier/manager roster
//! - Inventory: one row per menu item with randomized stock
//! - Sales: headers spread across today's opening hours, each with line
//!   items submitted through the real recorder path (so ids come from the
//!   allocator, exactly like production traffic)

use std::env;

use pearl_core::{SaleLine, SaleSubmission};
use pearl_db::{Database, DbConfig};

/// (name, item_type, price in cents)
const MENU: &[(&str, &str, i64)] = &[
    ("Classic Milk Tea", "Drink", 575),
    ("Taro Milk Tea", "Drink", 625),
    ("Thai Milk Tea", "Drink", 600),
    ("Matcha Latte", "Drink", 650),
    ("Brown Sugar Boba", "Drink", 675),
    ("Jasmine Green Tea", "Drink", 500),
    ("Oolong Tea", "Drink", 500),
    ("Mango Green Tea", "Drink", 575),
    ("Strawberry Lemonade", "Drink", 550),
    ("Passion Fruit Tea", "Drink", 575),
    ("Tapioca Pearls", "Topping", 75),
    ("Popping Boba", "Topping", 75),
    ("Grass Jelly", "Topping", 75),
    ("Pudding", "Topping", 100),
    ("Red Bean", "Topping", 75),
    ("Pumpkin Spice Tea", "Seasonal", 650),
    ("Peppermint Mocha Tea", "Seasonal", 675),
];

/// (name, role)
const STAFF: &[(&str, &str)] = &[
    ("Mei Lin", "Cashier"),
    ("Jordan Reyes", "Cashier"),
    ("Priya Patel", "Manager"),
];

const PAYMENT_METHODS: &[&str] = &["Cash", "Card", "Mobile"];

/// Deterministic pseudo-random stream, xorshift64*.
///
/// Good enough to vary seed data; keeps the binary free of an RNG crate.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut sale_count: usize = 120;
    let mut db_path = String::from("./pearl_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sale_count = args[i + 1].parse().unwrap_or(120);
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
                println!("Pearl POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --sales <N>    Sale headers to generate for today (default: 120)");
                println!("  -d, --db <PATH>    Database file path (default: ./pearl_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Pearl POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Sales:    {}", sale_count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Refuse to double-seed
    let existing = db.catalog().list_available(None).await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} menu items", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut rng = Rng(0x9E3779B97F4A7C15);

    // --- Menu ---
    let mut item_ids = Vec::with_capacity(MENU.len());
    for (name, item_type, price_cents) in MENU {
        let item = db.catalog().add_item(name, item_type, *price_cents).await?;
        item_ids.push((item.item_id, *price_cents));
    }
    println!("✓ Seeded {} menu items", item_ids.len());

    // --- Staff ---
    let mut employee_ids = Vec::with_capacity(STAFF.len());
    for (name, role) in STAFF {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO employee (employeename, employeepassword, employeetype) \
             VALUES (?1, 'changeme', ?2) RETURNING employeeid",
        )
        .bind(name)
        .bind(role)
        .fetch_one(db.pool())
        .await?;
        employee_ids.push(id);
    }
    println!("✓ Seeded {} employees", employee_ids.len());

    // --- Inventory ---
    for (item_id, _) in &item_ids {
        db.inventory()
            .adjust(*item_id, 20 + rng.below(80) as i64)
            .await?;
    }
    println!("✓ Seeded inventory for every item");

    // --- Today's sales ---
    println!();
    println!("Generating sales...");

    let start = std::time::Instant::now();
    let mut lines_recorded = 0usize;

    for n in 0..sale_count {
        let line_count = 1 + rng.below(3) as usize;
        let payment = PAYMENT_METHODS[rng.below(PAYMENT_METHODS.len() as u64) as usize];

        let mut items = Vec::with_capacity(line_count);
        let mut total_cents = 0;
        for _ in 0..line_count {
            let (item_id, price_cents) = item_ids[rng.below(item_ids.len() as u64) as usize];
            total_cents += price_cents;
            items.push(SaleLine { item_id, price_cents });
        }

        let receipt = db
            .transactions()
            .submit_sale(&SaleSubmission {
                customer_name: format!("Guest {}", n + 1),
                payer_id: 0,
                items,
                payment_method: payment.to_string(),
            })
            .await?;
        lines_recorded += receipt.recorded_lines;

        // Matching sale header spread across opening hours (09:00-21:00),
        // so the hourly reports have buckets to show
        let hour = 9 + rng.below(13) as i64;
        let employee = employee_ids[rng.below(employee_ids.len() as u64) as usize];
        let rewards = if rng.below(10) == 0 { 100 } else { 0 };
        sqlx::query(
            "INSERT INTO sales (sales_timestamp, total_amount_cents, peak_day_flag, user_id, rewards_cents) \
             VALUES (datetime('now', 'start of day', printf('+%d hours', ?1), printf('+%d minutes', ?2)), ?3, ?4, ?5, ?6)",
        )
        .bind(hour)
        .bind(rng.below(60) as i64)
        .bind(total_cents)
        .bind(rng.below(7) == 0)
        .bind(employee)
        .bind(rewards)
        .execute(db.pool())
        .await?;

        if (n + 1) % 50 == 0 {
            println!("  Generated {} sales...", n + 1);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} sales ({} line items) in {:?}",
        sale_count, lines_recorded, elapsed
    );

    // Quick sanity read so a broken seed is obvious immediately
    println!();
    println!("Verifying reports...");
    let buckets = db.reports().hourly_x(0, 23).await?;
    println!("✓ X-report returns {} hourly buckets", buckets.len());

    db.close().await;
    println!();
    println!("Done.");

    Ok(())
}
