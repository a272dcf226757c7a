//! Terminal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `NEXUS_DATA_DIR` - Directory holding the stored JSON documents (default: `.nexus`)
//! - `NEXUS_CATALOG_URL` - Product listing used to seed an empty catalog
//!   (default: `https://dummyjson.com/products?limit=15`)
//! - `NEXUS_CATEGORY_KEYWORD` - Remote category substring mapped to the matched category (default: `groceries`)
//! - `NEXUS_CATEGORY_MATCH` - Category for listings containing the keyword (default: `Food`)
//! - `NEXUS_CATEGORY_FALLBACK` - Category for everything else (default: `Drinks`)

use std::path::PathBuf;

use nexus_pos_core::{Category, CategoryRule};
use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".nexus";
const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products?limit=15";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Terminal configuration.
#[derive(Debug, Clone)]
pub struct PosConfig {
    /// Directory of the file-backed store
    pub data_dir: PathBuf,
    /// Remote product listing
    pub catalog_url: Url,
    /// How remote categories map onto terminal categories
    pub category_rule: CategoryRule,
}

impl PosConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let data_dir = PathBuf::from(get_or_default("NEXUS_DATA_DIR", DEFAULT_DATA_DIR));

        let catalog_url = Url::parse(&get_or_default("NEXUS_CATALOG_URL", DEFAULT_CATALOG_URL))
            .map_err(|e| {
                ConfigError::InvalidEnvVar("NEXUS_CATALOG_URL".to_string(), e.to_string())
            })?;
        if !matches!(catalog_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "NEXUS_CATALOG_URL".to_string(),
                format!("unsupported scheme: {}", catalog_url.scheme()),
            ));
        }

        let defaults = CategoryRule::default();
        let keyword = get_or_default("NEXUS_CATEGORY_KEYWORD", &defaults.keyword);
        if keyword.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "NEXUS_CATEGORY_KEYWORD".to_string(),
                "must not be empty".to_string(),
            ));
        }
        let category_rule = CategoryRule {
            keyword,
            matched: Category::new(get_or_default(
                "NEXUS_CATEGORY_MATCH",
                defaults.matched.as_str(),
            )),
            fallback: Category::new(get_or_default(
                "NEXUS_CATEGORY_FALLBACK",
                defaults.fallback.as_str(),
            )),
        };

        Ok(Self {
            data_dir,
            catalog_url,
            category_rule,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<PosConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        PosConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".nexus"));
        assert_eq!(config.catalog_url.as_str(), DEFAULT_CATALOG_URL);
        assert_eq!(config.category_rule, CategoryRule::default());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("NEXUS_DATA_DIR", "/var/lib/nexus"),
            ("NEXUS_CATALOG_URL", "http://localhost:8080/products"),
            ("NEXUS_CATEGORY_KEYWORD", "bakery"),
            ("NEXUS_CATEGORY_MATCH", "Dessert"),
            ("NEXUS_CATEGORY_FALLBACK", "Food"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/nexus"));
        assert_eq!(config.catalog_url.port(), Some(8080));
        assert_eq!(config.category_rule.classify("bakery"), Category::new("Dessert"));
        assert_eq!(config.category_rule.classify("beauty"), Category::new("Food"));
    }

    #[test]
    fn test_invalid_url() {
        let result = load(&[("NEXUS_CATALOG_URL", "not a url")]);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(ref key, _)) if key == "NEXUS_CATALOG_URL"));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let result = load(&[("NEXUS_CATALOG_URL", "file:///etc/products.json")]);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let result = load(&[("NEXUS_CATEGORY_KEYWORD", "")]);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }
}
