//! # Seed Data
//!
//! A small deterministic demo catalog for development.
//!
//! Every category is represented, prices span every histogram bucket and a
//! few products are out of stock. Ids are fixed so links stay stable across
//! restarts; creation times are spread over the 60 days before `now`.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use catalog_core::{Category, Money, Product};

/// (name, description, price in cents, category, in stock)
const SEED: &[(&str, &str, i64, Category, bool)] = &[
    ("Wireless Mouse", "Ergonomic 2.4GHz mouse with silent clicks", 2999, Category::Electronics, true),
    ("Mechanical Keyboard", "Tenkeyless keyboard with hot-swappable switches", 8999, Category::Electronics, true),
    ("4K Monitor", "27-inch IPS display with USB-C power delivery", 44999, Category::Electronics, false),
    ("Chef's Knife", "20cm forged stainless steel blade", 5999, Category::Kitchen, true),
    ("Espresso Machine", "15-bar pump with steam wand", 129900, Category::Kitchen, true),
    ("Cotton T-Shirt", "Organic cotton crew neck tee", 1999, Category::Clothing, true),
    ("Rain Jacket", "Packable waterproof shell", 11999, Category::Clothing, false),
    ("Rust in Action", "Systems programming concepts explained with Rust", 3999, Category::Books, true),
    ("The Pragmatic Programmer", "Classic guide to software craftsmanship", 4499, Category::Books, true),
    ("Yoga Mat", "6mm non-slip exercise mat", 2499, Category::Sports, true),
    ("Road Bike Helmet", "Lightweight helmet with MIPS protection", 14999, Category::Sports, true),
    ("Building Blocks Set", "500-piece creative construction set", 3499, Category::Toys, true),
    ("Remote Control Car", "1:16 scale off-road racer", 6999, Category::Toys, false),
    ("Gift Card", "Store credit redeemable on any product", 5000, Category::Other, true),
    ("Desk Plant", "Low-maintenance succulent in ceramic pot", 1599, Category::Other, true),
];

/// Base of the fixed seed ids.
const SEED_ID_BASE: u128 = 0x0190_0000_0000_4000_8000_0000_0000_0000;

/// The demo catalog, timestamped relative to `now`.
pub fn sample_products(now: DateTime<Utc>) -> Vec<Product> {
    let count = SEED.len() as i64;

    SEED.iter()
        .enumerate()
        .map(|(i, &(name, description, cents, category, in_stock))| {
            // Oldest first, roughly four days apart.
            let created_at = now - Duration::days((count - i as i64) * 4);
            Product {
                id: Uuid::from_u128(SEED_ID_BASE + i as u128 + 1).to_string(),
                name: name.to_string(),
                description: description.to_string(),
                price: Money::from_cents(cents),
                category,
                in_stock,
                created_at,
                updated_at: created_at,
            }
        })
        .collect()
}
