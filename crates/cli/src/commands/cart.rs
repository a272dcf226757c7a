//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! nexus-cli cart                 # show the cart
//! nexus-cli cart add 1           # one more Neon Burger
//! nexus-cli cart dec 1           # one fewer
//! nexus-cli cart qty 1 -- -2     # arbitrary change
//! nexus-cli cart clear
//! ```

use std::io::Write;

use nexus_pos_core::{CartEngine, Price, ProductId, QuantityChange};
use rust_decimal::Decimal;

use super::CommandError;

/// Print the cart lines and totals.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn show(engine: &CartEngine, out: &mut dyn Write) -> Result<(), CommandError> {
    let currency = engine.settings().currency;
    let items = engine.line_items();

    if items.is_empty() {
        writeln!(out, "Cart Empty")?;
    }
    for item in &items {
        writeln!(
            out,
            "{:>14}  {:<28} {} x {:<4} {:>10}",
            item.product.id.as_i64(),
            item.product.name,
            Price::new(item.product.price, currency),
            item.quantity,
            Price::new(item.line_total, currency).to_string()
        )?;
    }

    let totals = engine.display_totals();
    let tax_percent = (engine.tax_rate() * Decimal::ONE_HUNDRED).normalize();
    writeln!(out, "Subtotal: {}", totals.subtotal)?;
    writeln!(out, "Tax ({tax_percent}%): {}", totals.tax)?;
    writeln!(out, "Total: {}", totals.total)?;
    Ok(())
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns [`CommandError::Cart`] if the product does not exist.
pub fn add(
    engine: &mut CartEngine,
    product_id: ProductId,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let quantity = engine.add_to_cart(product_id)?;
    writeln!(out, "Product {product_id}: quantity {quantity}")?;
    show(engine, out)
}

/// Change a line's quantity by `delta`.
///
/// # Errors
///
/// Returns [`CommandError::Cart`] if `delta` is zero or out of range.
pub fn change(
    engine: &mut CartEngine,
    product_id: ProductId,
    delta: i64,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    match engine.change_quantity(product_id, delta)? {
        QuantityChange::Updated(quantity) => {
            writeln!(out, "Product {product_id}: quantity {quantity}")?;
        }
        QuantityChange::Removed => writeln!(out, "Product {product_id}: removed")?,
        QuantityChange::Unchanged => writeln!(out, "Product {product_id} is not in the cart")?,
    }
    show(engine, out)
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn clear(engine: &mut CartEngine, out: &mut dyn Write) -> Result<(), CommandError> {
    engine.clear_cart();
    show(engine, out)
}
