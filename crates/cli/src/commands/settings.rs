//! Settings, setup wizard and factory reset.
//!
//! # Usage
//!
//! ```bash
//! nexus-cli settings
//! nexus-cli setup --store-name "Cyber Diner" --tables 8 --currency PHP
//! nexus-cli reset --yes
//! ```

use std::io::Write;

use nexus_pos_core::storage;
use nexus_pos_core::{CartEngine, CurrencyCode, KeyValueStore, SetupForm};

use super::CommandError;

/// Print the current settings.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn show(engine: &CartEngine, out: &mut dyn Write) -> Result<(), CommandError> {
    let settings = engine.settings();
    writeln!(out, "Store: {}", settings.store_name)?;
    writeln!(out, "Tables: {}", settings.table_count)?;
    writeln!(out, "Language: {}", settings.language)?;
    writeln!(
        out,
        "Currency: {} ({})",
        settings.currency,
        settings.currency_symbol()
    )?;
    writeln!(
        out,
        "Setup: {}",
        if settings.setup_done { "done" } else { "pending" }
    )?;
    Ok(())
}

/// Run the setup wizard.
///
/// # Errors
///
/// Returns [`CommandError::Setup`] if the store name is blank or the table
/// count is zero.
pub fn setup(
    engine: &mut CartEngine,
    store_name: String,
    table_count: u32,
    language: String,
    currency: CurrencyCode,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    engine.complete_setup(SetupForm {
        store_name,
        table_count,
        language,
        currency,
    })?;
    writeln!(out, "{} SYSTEM ACTIVE", engine.settings().currency)?;
    show(engine, out)
}

/// Wipe all stored state.
///
/// # Errors
///
/// Returns [`CommandError::NotConfirmed`] unless `confirmed`, or the storage
/// error if clearing fails.
pub fn reset(
    store: &mut dyn KeyValueStore,
    confirmed: bool,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    if !confirmed {
        return Err(CommandError::NotConfirmed(
            "Factory reset wipes all data; re-run with --yes to confirm",
        ));
    }
    storage::factory_reset(store)?;
    writeln!(out, "All data wiped")?;
    Ok(())
}
