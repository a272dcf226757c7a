//! Product listing and the admin "add product" form.
//!
//! # Usage
//!
//! ```bash
//! # List every product
//! nexus-cli products
//!
//! # List one category
//! nexus-cli products --category Drinks
//!
//! # Add a product
//! nexus-cli product add --name "Cyber Cake" --price 6.00 --category Dessert
//! ```

use std::io::Write;

use nexus_pos_core::{CartEngine, Category, CategoryFilter, NewProduct, Price};
use rust_decimal::Decimal;

use super::CommandError;

/// Print the products passing `filter`.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn list(engine: &mut CartEngine, filter: &str, out: &mut dyn Write) -> Result<(), CommandError> {
    engine.set_category_filter(CategoryFilter::from(filter));
    let currency = engine.settings().currency;

    let categories: Vec<String> = engine
        .catalog()
        .categories()
        .iter()
        .map(ToString::to_string)
        .collect();
    writeln!(
        out,
        "Category: {} (available: All{}{})",
        engine.active_category(),
        if categories.is_empty() { "" } else { ", " },
        categories.join(", ")
    )?;

    let products = engine.visible_products();
    if products.is_empty() {
        writeln!(out, "No products")?;
        return Ok(());
    }
    for product in products {
        writeln!(
            out,
            "{:>14}  {:<28} {:<10} {:>10}",
            product.id.as_i64(),
            product.name,
            product.category.as_str(),
            Price::new(product.price, currency).to_string()
        )?;
    }
    Ok(())
}

/// Add a product to the catalog.
///
/// # Errors
///
/// Returns an error if the name is blank, the price is not positive, or
/// writing to `out` fails.
pub fn add(
    engine: &mut CartEngine,
    name: String,
    price: Decimal,
    category: &str,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let id = engine.add_product(NewProduct {
        name,
        price,
        category: Category::new(category),
    })?;
    writeln!(out, "Added product {id}")?;
    Ok(())
}
