//! Core types for Nexus POS.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;

pub use category::{Category, CategoryFilter};
pub use id::*;
pub use price::{CurrencyCode, Price, round_to_cents};
