//! Integration tests for Nexus POS.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p nexus-pos-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_engine` - Cart operations, totals and change notification
//! - `persistence` - Save, restore and factory reset through a store
//! - `checkout` - Payment flow and receipts
//!
//! Shared fixtures live here so every test file starts from the same catalog.

use nexus_pos_core::{Catalog, Category, Product, ProductId};
use rust_decimal::Decimal;

/// The four-item demo menu used across the tests.
#[must_use]
pub fn demo_catalog() -> Catalog {
    Catalog::new(vec![
        product(1, "Neon Burger", Decimal::new(1250, 2), "Food"),
        product(2, "Cyber Fries", Decimal::new(550, 2), "Food"),
        product(3, "Quantum Cola", Decimal::new(350, 2), "Drinks"),
        product(4, "Plasma Shake", Decimal::new(600, 2), "Drinks"),
    ])
}

/// Build a product with the given fields.
#[must_use]
pub fn product(id: i64, name: &str, price: Decimal, category: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price,
        category: Category::new(category),
    }
}
