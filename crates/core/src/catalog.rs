//! Product catalog.
//!
//! The catalog is append-only: products are seeded from storage or the remote
//! listing, and the admin form can add new ones. Nothing edits or removes a
//! product short of a factory reset.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Category, CategoryFilter, ProductId};

/// Largest price the admin form accepts.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Errors that can occur when mutating the catalog.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The admin form was submitted with a missing name or an unusable price.
    #[error("invalid product: {0}")]
    InvalidProduct(String),
}

/// A sellable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Stored as a JSON number so existing saved catalogs keep loading.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub category: Category,
}

/// Input of the admin "add product" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub category: Category,
}

/// The ordered set of products offered by a terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Product>", into = "Vec<Product>")]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, keeping the first product seen for each ID and
    /// dropping products with a negative price.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let mut seen = HashSet::with_capacity(products.len());
        let products = products
            .into_iter()
            .filter(|product| {
                if product.price < Decimal::ZERO {
                    tracing::warn!(
                        product_id = %product.id,
                        price = %product.price,
                        "Dropping product with negative price"
                    );
                    return false;
                }
                let fresh = seen.insert(product.id);
                if !fresh {
                    tracing::warn!(product_id = %product.id, "Dropping duplicate product id");
                }
                fresh
            })
            .collect();
        Self { products }
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Whether a product with this ID exists.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Products passing `filter`, in catalog order.
    ///
    /// A filter naming a category no product has yields an empty list.
    #[must_use]
    pub fn list(&self, filter: &CategoryFilter) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| filter.matches(&product.category))
            .collect()
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&Category> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|product| &product.category)
            .filter(|category| seen.insert(*category))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Append a product from the admin form.
    ///
    /// The new ID is `now_millis` (Unix time in milliseconds), bumped past the
    /// largest existing ID when the clock would collide.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidProduct`] if the name is blank, or the
    /// price is not positive, exceeds [`MAX_PRICE`] or has more than two
    /// decimal places. Prices within those bounds survive being saved as JSON
    /// numbers unchanged.
    pub fn add(&mut self, new: NewProduct, now_millis: i64) -> Result<ProductId, CatalogError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidProduct("name is required".to_string()));
        }
        if new.price <= Decimal::ZERO {
            return Err(CatalogError::InvalidProduct(format!(
                "price must be greater than zero (got {})",
                new.price
            )));
        }
        if new.price > MAX_PRICE {
            return Err(CatalogError::InvalidProduct(format!(
                "price must be at most {MAX_PRICE} (got {})",
                new.price
            )));
        }
        if new.price.normalize().scale() > 2 {
            return Err(CatalogError::InvalidProduct(format!(
                "price must have at most two decimal places (got {})",
                new.price
            )));
        }

        let next_free = self
            .products
            .iter()
            .map(|product| product.id.as_i64())
            .max()
            .map_or(i64::MIN, |max| max.saturating_add(1));
        let id = ProductId::new(now_millis.max(next_free));

        self.products.push(Product {
            id,
            name: name.to_string(),
            price: new.price,
            category: new.category,
        });
        Ok(id)
    }
}

impl From<Vec<Product>> for Catalog {
    fn from(products: Vec<Product>) -> Self {
        Self::new(products)
    }
}

impl From<Catalog> for Vec<Product> {
    fn from(catalog: Catalog) -> Self {
        catalog.products
    }
}

// =============================================================================
// Remote Listing
// =============================================================================

/// Response body of the demo product listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteListing {
    pub products: Vec<RemoteProduct>,
}

/// One entry of the remote listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteProduct {
    pub id: i64,
    pub title: String,
    pub price: Decimal,
    pub category: String,
}

/// Maps remote category strings onto the terminal's categories.
///
/// The default reproduces the demo source: anything whose category contains
/// `groceries` is `Food`, everything else is `Drinks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    /// Substring searched for in the remote category.
    pub keyword: String,
    /// Category assigned when the keyword is present.
    pub matched: Category,
    /// Category assigned otherwise.
    pub fallback: Category,
}

impl Default for CategoryRule {
    fn default() -> Self {
        Self {
            keyword: "groceries".to_string(),
            matched: Category::new("Food"),
            fallback: Category::new("Drinks"),
        }
    }
}

impl CategoryRule {
    /// Classify a remote category string.
    #[must_use]
    pub fn classify(&self, remote_category: &str) -> Category {
        if remote_category.contains(self.keyword.as_str()) {
            self.matched.clone()
        } else {
            self.fallback.clone()
        }
    }
}

impl Catalog {
    /// Build a catalog from the remote listing.
    #[must_use]
    pub fn from_remote(listing: RemoteListing, rule: &CategoryRule) -> Self {
        let products = listing
            .products
            .into_iter()
            .map(|item| Product {
                id: ProductId::new(item.id),
                category: rule.classify(&item.category),
                name: item.title,
                price: item.price,
            })
            .collect();
        Self::new(products)
    }
}
