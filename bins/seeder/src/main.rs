//! Database seeder for Cambio development and testing.
//!
//! Seeds the currency catalog and pairwise conversion rates for local
//! development. Seeding is skipped when currencies already exist.
//!
//! Usage: cargo run --bin seeder

use cambio_db::repositories::{ConversionRateRepository, CurrencyRepository, UpsertRateInput};

/// Seed currencies: (code, name).
const CURRENCIES: &[(&str, &str)] = &[
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("JPY", "Japanese Yen"),
    ("GBP", "British Pound"),
    ("CHF", "Swiss Franc"),
    ("CAD", "Canadian Dollar"),
];

/// Seed rates: (base, target, rate).
const RATES: &[(&str, &str, f64)] = &[
    // USD rates
    ("USD", "EUR", 0.9465),
    ("USD", "JPY", 155.51),
    ("USD", "GBP", 0.7851),
    ("USD", "CHF", 0.886),
    ("USD", "CAD", 1.4),
    // EUR rates
    ("EUR", "USD", 1.0566),
    ("EUR", "JPY", 164.52),
    ("EUR", "GBP", 0.8329),
    ("EUR", "CHF", 0.937),
    ("EUR", "CAD", 1.4807),
    // JPY rates
    ("JPY", "USD", 0.0064),
    ("JPY", "EUR", 0.0061),
    ("JPY", "GBP", 0.0051),
    ("JPY", "CHF", 0.0057),
    ("JPY", "CAD", 0.009),
    // GBP rates
    ("GBP", "USD", 1.2743),
    ("GBP", "EUR", 1.2006),
    ("GBP", "JPY", 197.32),
    ("GBP", "CHF", 1.1245),
    ("GBP", "CAD", 1.7777),
    // CHF rates
    ("CHF", "USD", 1.1287),
    ("CHF", "EUR", 1.0672),
    ("CHF", "JPY", 175.57),
    ("CHF", "GBP", 0.8889),
    ("CHF", "CAD", 1.5802),
    // CAD rates
    ("CAD", "USD", 0.7143),
    ("CAD", "EUR", 0.6753),
    ("CAD", "JPY", 111.1),
    ("CAD", "GBP", 0.5625),
    ("CAD", "CHF", 0.6328),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = cambio_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let currency_repo = CurrencyRepository::new(db.clone());

    let existing = currency_repo
        .list()
        .await
        .expect("Failed to list currencies");
    if !existing.is_empty() {
        println!("Data already exists. Skipping seeding.");
        return;
    }

    println!("Seeding currencies...");
    for (code, name) in CURRENCIES {
        currency_repo
            .create(code, name)
            .await
            .expect("Failed to seed currency");
    }

    println!("Seeding conversion rates...");
    let rate_repo = ConversionRateRepository::new(db.clone());
    for (base, target, rate) in RATES {
        rate_repo
            .upsert_rate(UpsertRateInput {
                base_code: (*base).to_string(),
                target_code: (*target).to_string(),
                rate: *rate,
            })
            .await
            .expect("Failed to seed conversion rate");
    }

    println!("Seeding complete!");
}
