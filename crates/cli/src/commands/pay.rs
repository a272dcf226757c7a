//! Payment confirmation.
//!
//! # Usage
//!
//! ```bash
//! nexus-cli pay --table 4
//! ```

use std::io::Write;

use nexus_pos_core::{CartEngine, Price};

use super::CommandError;
use crate::receipt;

/// Process payment for `table` and print the receipt.
///
/// # Errors
///
/// Returns [`CommandError::Checkout`] if the cart is empty or the table is
/// missing or unknown; the cart is left unchanged in that case.
pub fn run(engine: &mut CartEngine, table: u32, out: &mut dyn Write) -> Result<(), CommandError> {
    let receipt = engine.checkout(table)?;
    let total = Price::new(receipt.totals.total, receipt.currency);

    writeln!(out, "Processed {total} for Table {table}. Order sent to Kitchen.")?;
    writeln!(out)?;
    write!(out, "{}", receipt::render(&receipt))?;
    Ok(())
}
