//! Nexus POS Core - Cart and pricing engine.
//!
//! This crate provides the business core of a Nexus POS terminal:
//! - the product catalog and category filtering
//! - the cart, its totals and the fixed 5% tax
//! - settings and the first-run setup wizard
//! - checkout into an immutable receipt
//! - a key-value persistence adapter
//!
//! # Architecture
//!
//! The core crate contains no network or filesystem I/O. Presentation layers
//! (such as `nexus-cli`) own a [`CartEngine`], drive it through its commands,
//! and supply a [`KeyValueStore`] for persistence.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and categories
//! - [`catalog`] - Products and the remote listing mapping
//! - [`cart`] - Cart lines and totals
//! - [`engine`] - The cart engine and change notifications
//! - [`checkout`] - Payment and receipts
//! - [`settings`] - Store settings
//! - [`storage`] - Persistence adapter

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod engine;
pub mod settings;
pub mod storage;
pub mod types;

pub use cart::{Cart, CartError, CartLine, DisplayTotals, QuantityChange, TAX_RATE, Totals};
pub use catalog::{
    Catalog, CatalogError, CategoryRule, MAX_PRICE, NewProduct, Product, RemoteListing,
    RemoteProduct,
};
pub use checkout::{CheckoutError, Receipt, ReceiptLine};
pub use engine::{CartEngine, CartEvent, CartObserver, LineItem};
pub use settings::{Settings, SetupError, SetupForm};
pub use storage::{KeyValueStore, MemoryStore, PersistedState, StorageError};
pub use types::*;
