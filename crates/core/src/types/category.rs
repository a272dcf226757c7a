//! Product categories and the category filter.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A product category label such as `Food`, `Drinks` or `Dessert`.
///
/// Labels are compared exactly; `"drinks"` and `"Drinks"` are different
/// categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create a category from its label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Restricts the listed products to one category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// No restriction.
    #[default]
    All,
    /// Only products whose category equals this one.
    Only(Category),
}

impl CategoryFilter {
    /// Label of the unfiltered sentinel.
    pub const ALL: &'static str = "All";

    /// Whether a product in `category` passes this filter.
    #[must_use]
    pub fn matches(&self, category: &Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL),
            Self::Only(category) => category.fmt(f),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(label: &str) -> Self {
        if label == Self::ALL {
            Self::All
        } else {
            Self::Only(Category::new(label))
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        Self::Only(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sentinel_parses_to_all() {
        assert_eq!(CategoryFilter::from("All"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from("Drinks"),
            CategoryFilter::Only(Category::new("Drinks"))
        );
    }

    #[test]
    fn test_filter_matches_exactly() {
        let filter = CategoryFilter::from("Drinks");
        assert!(filter.matches(&Category::new("Drinks")));
        assert!(!filter.matches(&Category::new("drinks")));
        assert!(!filter.matches(&Category::new("Drink")));
        assert!(CategoryFilter::All.matches(&Category::new("anything")));
    }

    #[test]
    fn test_display() {
        assert_eq!(CategoryFilter::All.to_string(), "All");
        assert_eq!(CategoryFilter::from("Food").to_string(), "Food");
    }
}
