//! Payment confirmation.
//!
//! Paying snapshots the cart into a [`Receipt`] and empties the cart, ready
//! for the next order. Payment itself is simulated; there is no processor.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::cart::Totals;
use crate::engine::CartEngine;
use crate::types::{CurrencyCode, ProductId};

/// Errors that prevent a payment from being processed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// There is nothing to pay for.
    #[error("cart is empty")]
    EmptyCart,
    /// No table was selected.
    #[error("select a table")]
    TableRequired,
    /// The table number is beyond the configured table count.
    #[error("table {table} does not exist (tables 1-{table_count})")]
    UnknownTable { table: u32, table_count: u32 },
}

/// One purchased product on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Immutable record of a paid order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub store_name: String,
    pub table: u32,
    pub issued_at: DateTime<Utc>,
    pub currency: CurrencyCode,
    pub lines: Vec<ReceiptLine>,
    pub totals: Totals,
}

impl CartEngine {
    /// Process payment for `table` now.
    ///
    /// # Errors
    ///
    /// See [`CartEngine::checkout_at`].
    pub fn checkout(&mut self, table: u32) -> Result<Receipt, CheckoutError> {
        self.checkout_at(table, Utc::now())
    }

    /// Process payment for `table`, stamping the receipt with `issued_at`.
    ///
    /// On success the cart is cleared. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] when the cart has no lines,
    /// [`CheckoutError::TableRequired`] for table 0, and
    /// [`CheckoutError::UnknownTable`] for a table past the configured count.
    pub fn checkout_at(
        &mut self,
        table: u32,
        issued_at: DateTime<Utc>,
    ) -> Result<Receipt, CheckoutError> {
        if self.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if table == 0 {
            return Err(CheckoutError::TableRequired);
        }
        let table_count = self.settings().table_count;
        if table > table_count {
            return Err(CheckoutError::UnknownTable { table, table_count });
        }

        let lines = self
            .line_items()
            .into_iter()
            .map(|item| ReceiptLine {
                product_id: item.product.id,
                name: item.product.name.clone(),
                unit_price: item.product.price,
                quantity: item.quantity,
                line_total: item.line_total,
            })
            .collect();
        let receipt = Receipt {
            store_name: self.settings().store_name.clone(),
            table,
            issued_at,
            currency: self.settings().currency,
            lines,
            totals: self.compute_totals(),
        };

        self.take_cart();
        tracing::info!(
            table,
            total = %receipt.totals.total,
            "Payment processed, order sent to kitchen"
        );
        Ok(receipt)
    }
}
