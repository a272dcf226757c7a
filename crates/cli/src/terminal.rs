//! Terminal session bootstrap.
//!
//! A [`Terminal`] restores the engine from the store, seeds the catalog from
//! the remote listing when none is stored, and writes the state back once a
//! command has changed it.

use std::cell::Cell;
use std::rc::Rc;

use nexus_pos_core::{CartEngine, CartEvent, Catalog, KeyValueStore, PersistedState, StorageError};

use crate::fetch::CatalogClient;

/// One engine bound to its store.
#[derive(Debug)]
pub struct Terminal<S> {
    engine: CartEngine,
    store: S,
    dirty: Rc<Cell<bool>>,
}

impl<S: KeyValueStore> Terminal<S> {
    /// Restore the terminal from `store`.
    ///
    /// When no catalog is stored, the remote listing is fetched once. A fetched
    /// catalog is saved immediately; if the fetch fails the terminal starts
    /// with an empty catalog and nothing is saved.
    ///
    /// # Errors
    ///
    /// Returns a storage error if saving a freshly fetched catalog fails.
    pub async fn open(mut store: S, source: &CatalogClient) -> Result<Self, StorageError> {
        let state = PersistedState::load(&store);

        let mut seeded = false;
        let fallback = if state.catalog.is_some() {
            Catalog::default()
        } else {
            tracing::info!("No stored catalog, fetching from remote source");
            match source.fetch().await {
                Ok(catalog) => {
                    seeded = true;
                    catalog
                }
                Err(e) => {
                    tracing::error!(error = %e, "Catalog fetch failed, starting with an empty catalog");
                    Catalog::default()
                }
            }
        };

        let mut engine = CartEngine::restore(state, fallback);
        if seeded {
            engine.save(&mut store)?;
        }

        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        engine.subscribe(move |event: &CartEvent| {
            tracing::debug!(?event, "State changed");
            if !matches!(event, CartEvent::FilterChanged(_)) {
                flag.set(true);
            }
        });

        Ok(Self {
            engine,
            store,
            dirty,
        })
    }

    pub const fn engine_mut(&mut self) -> &mut CartEngine {
        &mut self.engine
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Whether any command changed persisted state since opening.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Save catalog, settings and cart if anything changed.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the write fails.
    pub fn save_if_changed(&mut self) -> Result<(), StorageError> {
        if !self.dirty.get() {
            return Ok(());
        }
        self.engine.save(&mut self.store)?;
        self.dirty.set(false);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nexus_pos_core::storage::{CART_KEY, PRODUCTS_KEY};
    use nexus_pos_core::{MemoryStore, ProductId};

    use super::*;
    use crate::fetch::tests::{LISTING, client, dead_url, serve_once};

    #[tokio::test]
    async fn test_open_seeds_and_saves_fetched_catalog() {
        let source = client(serve_once("200 OK", LISTING).await);
        let mut terminal = Terminal::open(MemoryStore::new(), &source).await.unwrap();

        assert_eq!(terminal.engine_mut().catalog().len(), 2);
        assert!(terminal.store().get(PRODUCTS_KEY).unwrap().is_some());
        assert!(!terminal.is_dirty());
    }

    #[tokio::test]
    async fn test_open_failed_fetch_leaves_catalog_empty() {
        let source = client(dead_url().await);
        let mut terminal = Terminal::open(MemoryStore::new(), &source).await.unwrap();

        assert!(terminal.engine_mut().catalog().is_empty());
        assert!(terminal.store().get(PRODUCTS_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_prefers_stored_catalog() {
        let mut store = MemoryStore::new();
        store
            .set(
                PRODUCTS_KEY,
                r#"[{"id":1,"name":"Neon Burger","price":12.5,"category":"Food"}]"#,
            )
            .unwrap();

        // Unreachable source: a stored catalog must not trigger a fetch.
        let source = client(dead_url().await);
        let mut terminal = Terminal::open(store, &source).await.unwrap();
        assert_eq!(terminal.engine_mut().catalog().len(), 1);
    }

    #[tokio::test]
    async fn test_save_if_changed() {
        let source = client(serve_once("200 OK", LISTING).await);
        let mut terminal = Terminal::open(MemoryStore::new(), &source).await.unwrap();

        terminal.engine_mut().set_category_filter("Food");
        assert!(!terminal.is_dirty());

        terminal.engine_mut().add_to_cart(ProductId::new(16)).unwrap();
        assert!(terminal.is_dirty());
        terminal.save_if_changed().unwrap();
        assert!(!terminal.is_dirty());
        assert_eq!(
            terminal.store().get(CART_KEY).unwrap().as_deref(),
            Some(r#"[{"productId":16,"quantity":1}]"#)
        );
    }
}
