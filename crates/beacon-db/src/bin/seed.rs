//! # Seed Data Loader
//!
//! Fills a database with the sample user directory and unit prices.
//!
//! ## Usage
//! ```bash
//! # Seed ./beacon_dev.db with the built-in fixtures
//! cargo run -p beacon-db --bin seed
//!
//! # Specify database path
//! cargo run -p beacon-db --bin seed -- --db ./data/beacon.db
//!
//! # Load users from a JSON array instead of the fixtures
//! cargo run -p beacon-db --bin seed -- --users ./users.json
//! ```
//!
//! Users are only written into an empty directory. Prices are upserted, so
//! re-running the seed resets them to the sample values.

use std::env;
use std::fs;

use beacon_core::fixtures::{sample_prices, sample_users};
use beacon_core::validation::{normalize_country_id, validate_user};
use beacon_core::User;
use beacon_db::{Database, DbConfig, InitializeOutcome};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./beacon_dev.db");
    let mut users_file: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--users" | "-u" => {
                if i + 1 < args.len() {
                    users_file = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Beacon Orders Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>      Database file path (default: ./beacon_dev.db)");
                println!("  -u, --users <FILE>   JSON array of users (default: built-in sample users)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut users: Vec<User> = match &users_file {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => sample_users(),
    };
    for user in &mut users {
        validate_user(user)?;
        user.country_id = normalize_country_id(&user.country_id);
    }

    println!("🌱 Beacon Orders Seed Data Loader");
    println!("=================================");
    println!("Database: {}", db_path);
    println!("Users:    {}", users_file.as_deref().unwrap_or("built-in samples"));
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    match db.users().initialize(&users).await? {
        InitializeOutcome::Seeded { inserted } => {
            println!("✓ Inserted {} users", inserted);
        }
        InitializeOutcome::AlreadyPopulated { existing } => {
            println!("⚠ Database already has {} users", existing);
            println!("  Skipping users to avoid duplicates.");
        }
    }

    let prices = sample_prices();
    for price in &prices {
        db.prices().upsert(price).await?;
    }
    println!("✓ Upserted {} country prices", prices.len());

    db.close().await;

    println!();
    println!("🎉 Seed complete!");

    Ok(())
}
