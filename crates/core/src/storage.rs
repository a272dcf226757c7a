//! Persistence adapter.
//!
//! The terminal keeps its state as JSON documents under fixed keys in a
//! key-value store. The engine only talks to the [`KeyValueStore`] trait; the
//! CLI supplies a file-backed implementation and tests use [`MemoryStore`].
//!
//! Reading is forgiving: a missing key is absent, and a document that fails to
//! parse is logged and treated as absent, never as a fatal error.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::settings::Settings;

/// Key of the catalog document.
pub const PRODUCTS_KEY: &str = "nexus_products";
/// Key of the settings document.
pub const SETTINGS_KEY: &str = "nexus_settings";
/// Key of the open cart, so a cart survives between CLI invocations.
pub const CART_KEY: &str = "nexus_cart";

/// Errors raised by a store or while decoding its documents.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The underlying store failed.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored document is not valid JSON or has the wrong shape.
    #[error("malformed persisted state under {key}: {source}")]
    MalformedPersistedState {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded.
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value storage, in the manner of browser local storage.
pub trait KeyValueStore {
    /// Read the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove every key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the store cannot be cleared.
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        Ok(())
    }
}

// =============================================================================
// Typed Documents
// =============================================================================

/// Read and decode the document under `key`.
///
/// # Errors
///
/// Returns [`StorageError::MalformedPersistedState`] if the document does not
/// decode, or the store's own error.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::MalformedPersistedState {
            key: key.to_string(),
            source,
        })
}

/// Encode `value` and store it under `key`.
///
/// # Errors
///
/// Returns [`StorageError::Encode`] if encoding fails, or the store's own error.
pub fn write_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

/// Read the document under `key`, treating any failure as absent.
pub fn read_or_absent<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match read_json(store, key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring unreadable persisted state");
            None
        }
    }
}

/// Everything a terminal restores at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    /// `None` when no usable catalog is stored, which tells the caller to seed
    /// one from the remote listing.
    pub catalog: Option<Catalog>,
    pub settings: Settings,
    pub cart: Cart,
}

impl PersistedState {
    /// Restore state, substituting defaults for anything missing or malformed.
    #[must_use]
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            catalog: read_or_absent(store, PRODUCTS_KEY),
            settings: read_or_absent(store, SETTINGS_KEY).unwrap_or_default(),
            cart: read_or_absent(store, CART_KEY).unwrap_or_default(),
        }
    }
}

/// Save the catalog and settings.
///
/// # Errors
///
/// Returns the first storage error encountered.
pub fn save_catalog_and_settings(
    store: &mut dyn KeyValueStore,
    catalog: &Catalog,
    settings: &Settings,
) -> Result<(), StorageError> {
    write_json(store, PRODUCTS_KEY, catalog)?;
    write_json(store, SETTINGS_KEY, settings)
}

/// Save the open cart.
///
/// # Errors
///
/// Returns the storage error if the write fails.
pub fn save_cart(store: &mut dyn KeyValueStore, cart: &Cart) -> Result<(), StorageError> {
    write_json(store, CART_KEY, cart)
}

/// Wipe all stored state.
///
/// # Errors
///
/// Returns the storage error if the store cannot be cleared.
pub fn factory_reset(store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
    tracing::info!("Factory reset: clearing all stored state");
    store.clear()
}
