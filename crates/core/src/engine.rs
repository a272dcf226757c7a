//! The cart engine.
//!
//! [`CartEngine`] owns the catalog, the open cart, the category filter and the
//! settings of one terminal. It performs no I/O: the presentation layer calls
//! its commands, registers a [`CartObserver`] to hear about changes, and
//! queries it to render.
//!
//! # Example
//!
//! ```rust
//! use nexus_pos_core::{CartEngine, Catalog, Category, Product, ProductId, Settings};
//! use rust_decimal::Decimal;
//!
//! let catalog = Catalog::new(vec![Product {
//!     id: ProductId::new(1),
//!     name: "Neon Burger".to_string(),
//!     price: Decimal::new(1250, 2),
//!     category: Category::new("Food"),
//! }]);
//! let mut engine = CartEngine::new(catalog, Settings::default());
//!
//! engine.add_to_cart(ProductId::new(1))?;
//! assert_eq!(engine.compute_totals().subtotal, Decimal::new(1250, 2));
//! # Ok::<(), nexus_pos_core::CartError>(())
//! ```

use core::fmt;

use rust_decimal::Decimal;

use crate::cart::{Cart, CartError, DisplayTotals, QuantityChange, TAX_RATE, Totals};
use crate::catalog::{Catalog, CatalogError, NewProduct, Product};
use crate::settings::{Settings, SetupError, SetupForm};
use crate::storage::{self, KeyValueStore, PersistedState, StorageError};
use crate::types::{CategoryFilter, ProductId};

/// A state change the presentation layer may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A product was added; `quantity` is the line's new quantity.
    ItemAdded {
        product_id: ProductId,
        quantity: u32,
    },
    /// A line's quantity changed but the line is still present.
    QuantityChanged {
        product_id: ProductId,
        quantity: u32,
    },
    /// A line dropped to zero and was removed.
    LineRemoved { product_id: ProductId },
    /// The cart was emptied.
    CartCleared,
    /// The category filter was replaced.
    FilterChanged(CategoryFilter),
    /// The admin form added a product to the catalog.
    ProductAdded(ProductId),
    /// The setup wizard replaced the settings.
    SettingsChanged,
}

/// Receives [`CartEvent`]s after each successful mutation.
pub trait CartObserver {
    fn on_change(&mut self, event: &CartEvent);
}

impl<F> CartObserver for F
where
    F: FnMut(&CartEvent),
{
    fn on_change(&mut self, event: &CartEvent) {
        self(event);
    }
}

/// A cart line joined with its product, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem<'a> {
    pub product: &'a Product,
    pub quantity: u32,
    /// `price × quantity` at full precision.
    pub line_total: Decimal,
}

/// One terminal's catalog, cart and settings.
pub struct CartEngine {
    catalog: Catalog,
    cart: Cart,
    settings: Settings,
    active_category: CategoryFilter,
    tax_rate: Decimal,
    observers: Vec<Box<dyn CartObserver>>,
}

impl fmt::Debug for CartEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartEngine")
            .field("catalog", &self.catalog)
            .field("cart", &self.cart)
            .field("settings", &self.settings)
            .field("active_category", &self.active_category)
            .field("tax_rate", &self.tax_rate)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CartEngine {
    /// Create an engine with an empty cart and the "All" filter.
    #[must_use]
    pub fn new(catalog: Catalog, settings: Settings) -> Self {
        Self {
            catalog,
            cart: Cart::new(),
            settings,
            active_category: CategoryFilter::All,
            tax_rate: TAX_RATE,
            observers: Vec::new(),
        }
    }

    /// Restore an engine from persisted state.
    ///
    /// `catalog` is used when the stored state has none (for example a catalog
    /// just fetched from the remote listing). Cart lines referring to products
    /// that are not in the catalog are dropped.
    #[must_use]
    pub fn restore(state: PersistedState, catalog: Catalog) -> Self {
        let catalog = state.catalog.unwrap_or(catalog);
        let mut cart = state.cart;
        let dropped = cart.retain_known(&catalog);
        if dropped > 0 {
            tracing::warn!(dropped, "Dropped cart lines for products no longer in the catalog");
        }

        let mut engine = Self::new(catalog, state.settings);
        engine.cart = cart;
        engine
    }

    /// Override the tax rate.
    #[must_use]
    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Register an observer for state changes.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, event: &CartEvent) {
        for observer in &mut self.observers {
            observer.on_change(event);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub const fn active_category(&self) -> &CategoryFilter {
        &self.active_category
    }

    #[must_use]
    pub const fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Products passing `filter`, in catalog order.
    #[must_use]
    pub fn list_products(&self, filter: &CategoryFilter) -> Vec<&Product> {
        self.catalog.list(filter)
    }

    /// Products passing the active category filter.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        self.catalog.list(&self.active_category)
    }

    /// Cart lines joined with their products, in cart order.
    #[must_use]
    pub fn line_items(&self) -> Vec<LineItem<'_>> {
        self.cart
            .lines()
            .iter()
            .filter_map(|line| {
                self.catalog.get(line.product_id).map(|product| LineItem {
                    product,
                    quantity: line.quantity,
                    line_total: product.price.saturating_mul(Decimal::from(line.quantity)),
                })
            })
            .collect()
    }

    /// Subtotal, tax and total, recomputed from the cart on every call.
    #[must_use]
    pub fn compute_totals(&self) -> Totals {
        self.cart.totals(&self.catalog, self.tax_rate)
    }

    /// Totals in the configured currency, for display.
    #[must_use]
    pub fn display_totals(&self) -> DisplayTotals {
        self.compute_totals().in_currency(self.settings.currency)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Add one unit of a product to the cart.
    ///
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ProductNotFound`] if the product is not in the
    /// catalog, [`CartError::InvalidQuantityDelta`] if the line is full, or
    /// [`CartError::AmountOverflow`] if the totals would no longer be
    /// representable. The cart is left unchanged on error.
    pub fn add_to_cart(&mut self, product_id: ProductId) -> Result<u32, CartError> {
        if !self.catalog.contains(product_id) {
            return Err(CartError::ProductNotFound(product_id));
        }
        let mut cart = self.cart.clone();
        let quantity = cart.increment(product_id)?;
        self.replace_cart(cart)?;
        tracing::debug!(%product_id, quantity, "Added to cart");
        self.emit(&CartEvent::ItemAdded {
            product_id,
            quantity,
        });
        Ok(quantity)
    }

    /// Add `delta` to a line's quantity; the line is removed when the result is
    /// zero or below. A product with no line is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantityDelta`] if `delta` is zero or the
    /// quantity would overflow, and [`CartError::AmountOverflow`] if an
    /// increase would make the totals unrepresentable. The cart is left
    /// unchanged on error.
    pub fn change_quantity(
        &mut self,
        product_id: ProductId,
        delta: i64,
    ) -> Result<QuantityChange, CartError> {
        let mut cart = self.cart.clone();
        let change = cart.change_quantity(product_id, delta)?;
        if delta > 0 {
            self.replace_cart(cart)?;
        } else {
            self.cart = cart;
        }
        tracing::debug!(%product_id, delta, ?change, "Changed quantity");
        match change {
            QuantityChange::Updated(quantity) => self.emit(&CartEvent::QuantityChanged {
                product_id,
                quantity,
            }),
            QuantityChange::Removed => self.emit(&CartEvent::LineRemoved { product_id }),
            QuantityChange::Unchanged => {}
        }
        Ok(change)
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        tracing::debug!("Cleared cart");
        self.emit(&CartEvent::CartCleared);
    }

    /// Replace the active category filter. The cart is not touched.
    pub fn set_category_filter(&mut self, filter: impl Into<CategoryFilter>) {
        self.active_category = filter.into();
        let event = CartEvent::FilterChanged(self.active_category.clone());
        self.emit(&event);
    }

    /// Add a product to the catalog from the admin form.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidProduct`] if the name is blank or the
    /// price is not positive.
    pub fn add_product(&mut self, new: NewProduct) -> Result<ProductId, CatalogError> {
        let now_millis = chrono::Utc::now().timestamp_millis();
        let id = self.catalog.add(new, now_millis)?;
        tracing::info!(product_id = %id, "Added product to catalog");
        self.emit(&CartEvent::ProductAdded(id));
        Ok(id)
    }

    /// Apply the setup wizard.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::IncompleteSetup`] if required fields are missing.
    pub fn complete_setup(&mut self, form: SetupForm) -> Result<(), SetupError> {
        self.settings.complete_setup(form)?;
        tracing::info!(store_name = %self.settings.store_name, "Setup complete");
        self.emit(&CartEvent::SettingsChanged);
        Ok(())
    }

    /// Save catalog, settings and the open cart.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        storage::save_catalog_and_settings(store, &self.catalog, &self.settings)?;
        storage::save_cart(store, &self.cart)
    }

    /// Install `cart` if its totals are representable.
    fn replace_cart(&mut self, cart: Cart) -> Result<(), CartError> {
        cart.checked_totals(&self.catalog, self.tax_rate)?;
        self.cart = cart;
        Ok(())
    }

    pub(crate) fn take_cart(&mut self) -> Cart {
        let cart = std::mem::take(&mut self.cart);
        self.emit(&CartEvent::CartCleared);
        cart
    }
}
