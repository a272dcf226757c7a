//! The active order and its totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::types::{CurrencyCode, Price, ProductId};

/// Proportional tax applied to every subtotal (5%).
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Errors that can occur when mutating the cart.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The referenced product is not in the catalog.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),
    /// A quantity change of zero, or one that overflows the line quantity.
    #[error("quantity delta must be a nonzero amount within range")]
    InvalidQuantityDelta,
    /// The change would make the cart totals too large to represent.
    #[error("cart total is too large")]
    AmountOverflow,
}

/// One product in the cart with its quantity.
///
/// A line only exists while its quantity is at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Outcome of a quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now has this quantity.
    Updated(u32),
    /// The quantity dropped to zero or below and the line was removed.
    Removed,
    /// There was no line for the product.
    Unchanged,
}

/// Lines in the order products were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity of `product_id` in the cart, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.line(product_id).map_or(0, |line| line.quantity)
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    /// Add one unit, appending a new line if the product is not yet in the cart.
    ///
    /// Returns the line's new quantity. Callers are responsible for checking
    /// that the product exists.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantityDelta`] if the line is already at
    /// the largest representable quantity; the cart is left unchanged.
    pub fn increment(&mut self, product_id: ProductId) -> Result<u32, CartError> {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity = line
                .quantity
                .checked_add(1)
                .ok_or(CartError::InvalidQuantityDelta)?;
            Ok(line.quantity)
        } else {
            self.lines.push(CartLine {
                product_id,
                quantity: 1,
            });
            Ok(1)
        }
    }

    /// Add `delta` to a line's quantity, removing the line if it drops to zero
    /// or below.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantityDelta`] if `delta` is zero or the
    /// new quantity would not fit in a `u32`.
    pub fn change_quantity(
        &mut self,
        product_id: ProductId,
        delta: i64,
    ) -> Result<QuantityChange, CartError> {
        if delta == 0 {
            return Err(CartError::InvalidQuantityDelta);
        }
        let Some(position) = self
            .lines
            .iter()
            .position(|line| line.product_id == product_id)
        else {
            return Ok(QuantityChange::Unchanged);
        };

        let current = self
            .lines
            .get(position)
            .map_or(0, |line| i64::from(line.quantity));
        let updated = current.saturating_add(delta);
        if updated <= 0 {
            self.lines.remove(position);
            return Ok(QuantityChange::Removed);
        }

        let quantity = u32::try_from(updated).map_err(|_| CartError::InvalidQuantityDelta)?;
        if let Some(line) = self.lines.get_mut(position) {
            line.quantity = quantity;
        }
        Ok(QuantityChange::Updated(quantity))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Drop lines whose product is not in `catalog`, returning how many were
    /// dropped.
    pub fn retain_known(&mut self, catalog: &Catalog) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| catalog.contains(line.product_id));
        before - self.lines.len()
    }

    /// Compute totals from scratch against `catalog`.
    ///
    /// Lines whose product is missing from the catalog contribute nothing.
    /// Amounts past the representable range saturate; the engine rejects any
    /// change that would get there, see [`Cart::checked_totals`].
    #[must_use]
    pub fn totals(&self, catalog: &Catalog, tax_rate: Decimal) -> Totals {
        self.checked_totals(catalog, tax_rate).unwrap_or_else(|_| {
            tracing::warn!("Cart totals overflowed, saturating");
            let subtotal = self
                .priced_lines(catalog)
                .fold(Decimal::ZERO, |sum, (price, quantity)| {
                    sum.saturating_add(price.saturating_mul(quantity))
                });
            Totals::saturating_from_subtotal(subtotal, tax_rate)
        })
    }

    /// Compute totals, failing instead of overflowing.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AmountOverflow`] if a line total, the subtotal,
    /// the tax or the total does not fit in a `Decimal`.
    pub fn checked_totals(
        &self,
        catalog: &Catalog,
        tax_rate: Decimal,
    ) -> Result<Totals, CartError> {
        let mut subtotal = Decimal::ZERO;
        for (price, quantity) in self.priced_lines(catalog) {
            subtotal = price
                .checked_mul(quantity)
                .and_then(|line_total| subtotal.checked_add(line_total))
                .ok_or(CartError::AmountOverflow)?;
        }
        Totals::checked_from_subtotal(subtotal, tax_rate).ok_or(CartError::AmountOverflow)
    }

    fn priced_lines<'a>(
        &'a self,
        catalog: &'a Catalog,
    ) -> impl Iterator<Item = (Decimal, Decimal)> + 'a {
        self.lines.iter().filter_map(|line| {
            catalog
                .get(line.product_id)
                .map(|product| (product.price, Decimal::from(line.quantity)))
        })
    }
}

impl From<Vec<CartLine>> for Cart {
    /// Merge duplicate product lines and drop zero-quantity lines so restored
    /// carts hold the same invariants as live ones.
    fn from(raw: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in raw.into_iter().filter(|line| line.quantity > 0) {
            if let Some(existing) = cart
                .lines
                .iter_mut()
                .find(|existing| existing.product_id == line.product_id)
            {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            } else {
                cart.lines.push(line);
            }
        }
        cart
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

/// Subtotal, tax and total at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// Derive tax and total from a subtotal, saturating on overflow.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal, tax_rate: Decimal) -> Self {
        Self::checked_from_subtotal(subtotal, tax_rate)
            .unwrap_or_else(|| Self::saturating_from_subtotal(subtotal, tax_rate))
    }

    /// Derive tax and total from a subtotal, or `None` if either overflows.
    #[must_use]
    pub fn checked_from_subtotal(subtotal: Decimal, tax_rate: Decimal) -> Option<Self> {
        let tax = subtotal.checked_mul(tax_rate)?;
        Some(Self {
            subtotal,
            tax,
            total: subtotal.checked_add(tax)?,
        })
    }

    fn saturating_from_subtotal(subtotal: Decimal, tax_rate: Decimal) -> Self {
        let tax = subtotal.saturating_mul(tax_rate);
        Self {
            subtotal,
            tax,
            total: subtotal.saturating_add(tax),
        }
    }

    /// Totals as displayable prices in `currency`.
    #[must_use]
    pub const fn in_currency(&self, currency: CurrencyCode) -> DisplayTotals {
        DisplayTotals {
            subtotal: Price::new(self.subtotal, currency),
            tax: Price::new(self.tax, currency),
            total: Price::new(self.total, currency),
        }
    }
}

/// Totals ready for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTotals {
    pub subtotal: Price,
    pub tax: Price,
    pub total: Price,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::types::Category;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Product {
                id: ProductId::new(1),
                name: "Neon Burger".to_string(),
                price: Decimal::new(1250, 2),
                category: Category::new("Food"),
            },
            Product {
                id: ProductId::new(3),
                name: "Quantum Cola".to_string(),
                price: Decimal::new(350, 2),
                category: Category::new("Drinks"),
            },
        ])
    }

    #[test]
    fn test_increment_appends_then_aggregates() {
        let mut cart = Cart::new();
        assert_eq!(cart.increment(ProductId::new(1)), Ok(1));
        assert_eq!(cart.increment(ProductId::new(3)), Ok(1));
        assert_eq!(cart.increment(ProductId::new(1)), Ok(2));
        assert_eq!(
            cart.lines(),
            &[
                CartLine {
                    product_id: ProductId::new(1),
                    quantity: 2
                },
                CartLine {
                    product_id: ProductId::new(3),
                    quantity: 1
                },
            ]
        );
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_change_quantity_removes_at_zero() {
        let mut cart = Cart::new();
        cart.increment(ProductId::new(1)).unwrap();
        cart.increment(ProductId::new(1)).unwrap();
        assert_eq!(
            cart.change_quantity(ProductId::new(1), -2).unwrap(),
            QuantityChange::Removed
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_removes_below_zero() {
        let mut cart = Cart::new();
        cart.increment(ProductId::new(1)).unwrap();
        assert_eq!(
            cart.change_quantity(ProductId::new(1), -10).unwrap(),
            QuantityChange::Removed
        );
        assert_eq!(cart.quantity_of(ProductId::new(1)), 0);
    }

    #[test]
    fn test_change_quantity_large_delta() {
        let mut cart = Cart::new();
        cart.increment(ProductId::new(1)).unwrap();
        assert_eq!(
            cart.change_quantity(ProductId::new(1), 41).unwrap(),
            QuantityChange::Updated(42)
        );
        assert_eq!(cart.quantity_of(ProductId::new(1)), 42);
    }

    #[test]
    fn test_change_quantity_missing_line_is_noop() {
        let mut cart = Cart::new();
        cart.increment(ProductId::new(3)).unwrap();
        assert_eq!(
            cart.change_quantity(ProductId::new(1), 1).unwrap(),
            QuantityChange::Unchanged
        );
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_change_quantity_zero_delta_rejected() {
        let mut cart = Cart::new();
        cart.increment(ProductId::new(1)).unwrap();
        assert!(matches!(
            cart.change_quantity(ProductId::new(1), 0),
            Err(CartError::InvalidQuantityDelta)
        ));
        assert_eq!(cart.quantity_of(ProductId::new(1)), 1);
    }

    #[test]
    fn test_change_quantity_overflow_rejected() {
        let mut cart = Cart::new();
        cart.increment(ProductId::new(1)).unwrap();
        assert!(matches!(
            cart.change_quantity(ProductId::new(1), i64::from(u32::MAX)),
            Err(CartError::InvalidQuantityDelta)
        ));
        assert_eq!(cart.quantity_of(ProductId::new(1)), 1);
    }

    #[test]
    fn test_totals_scenario() {
        let mut cart = Cart::new();
        cart.increment(ProductId::new(1)).unwrap();
        cart.increment(ProductId::new(1)).unwrap();
        cart.increment(ProductId::new(3)).unwrap();

        let totals = cart.totals(&catalog(), TAX_RATE);
        assert_eq!(totals.subtotal, Decimal::new(2850, 2));
        assert_eq!(totals.tax, Decimal::new(1425, 3));
        assert_eq!(totals.total, Decimal::new(29925, 3));
    }

    #[test]
    fn test_totals_empty_cart_is_zero() {
        let totals = Cart::new().totals(&catalog(), TAX_RATE);
        assert_eq!(totals, Totals::default());
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_display_totals_round_at_boundary() {
        let totals = Totals::from_subtotal(Decimal::new(2850, 2), TAX_RATE);
        let display = totals.in_currency(CurrencyCode::USD);
        assert_eq!(display.subtotal.to_string(), "$28.50");
        assert_eq!(display.tax.to_string(), "$1.43");
        assert_eq!(display.total.to_string(), "$29.93");
        assert_eq!(totals.tax, Decimal::new(1425, 3));
    }

    #[test]
    fn test_increment_full_line_rejected() {
        let mut cart = Cart::from(vec![CartLine {
            product_id: ProductId::new(1),
            quantity: u32::MAX,
        }]);
        assert_eq!(
            cart.increment(ProductId::new(1)),
            Err(CartError::InvalidQuantityDelta)
        );
        assert_eq!(cart.quantity_of(ProductId::new(1)), u32::MAX);
    }

    #[test]
    fn test_checked_totals_overflow() {
        let catalog = Catalog::new(vec![Product {
            id: ProductId::new(9),
            name: "Orbital Banquet".to_string(),
            price: Decimal::MAX,
            category: Category::new("Food"),
        }]);
        let mut cart = Cart::new();
        cart.increment(ProductId::new(9)).unwrap();
        cart.increment(ProductId::new(9)).unwrap();

        assert_eq!(
            cart.checked_totals(&catalog, TAX_RATE),
            Err(CartError::AmountOverflow)
        );
        // The infallible path saturates instead of panicking.
        assert_eq!(cart.totals(&catalog, TAX_RATE).total, Decimal::MAX);
    }

    #[test]
    fn test_retain_known_drops_orphans() {
        let mut cart = Cart::new();
        cart.increment(ProductId::new(1)).unwrap();
        cart.increment(ProductId::new(999)).unwrap();
        assert_eq!(cart.retain_known(&catalog()), 1);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_deserialize_merges_duplicates_and_drops_zero() {
        let cart: Cart = serde_json::from_str(
            r#"[{"productId": 1, "quantity": 2}, {"productId": 3, "quantity": 0}, {"productId": 1, "quantity": 1}]"#,
        )
        .unwrap();
        assert_eq!(
            cart.lines(),
            &[CartLine {
                product_id: ProductId::new(1),
                quantity: 3
            }]
        );
    }
}
