//! Subcommand implementations.
//!
//! Each command drives the [`CartEngine`](nexus_pos_core::CartEngine) and
//! writes what the operator sees to `out`; diagnostics go through `tracing`.

use nexus_pos_core::{CartError, CatalogError, CheckoutError, SetupError, StorageError};
use thiserror::Error;

pub mod cart;
pub mod catalog;
pub mod pay;
pub mod settings;

/// Errors surfaced to the operator by a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Cannot process payment: {0}")]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// A destructive command was invoked without confirmation.
    #[error("{0}")]
    NotConfirmed(&'static str),
}
