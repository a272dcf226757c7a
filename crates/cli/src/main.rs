//! Nexus POS CLI - Terminal front end for the cart engine.
//!
//! # Usage
//!
//! ```bash
//! # First run: configure the store
//! nexus-cli setup --store-name "Cyber Diner" --tables 8 --currency USD
//!
//! # Browse the catalog (seeded from the remote listing on first use)
//! nexus-cli products --category Food
//!
//! # Build an order and take payment
//! nexus-cli cart add 1
//! nexus-cli cart inc 1
//! nexus-cli pay --table 3
//! ```
//!
//! # Commands
//!
//! - `products` - List products, optionally by category
//! - `product add` - Add a product to the catalog
//! - `cart` - Show or change the open cart
//! - `pay` - Process payment and print the receipt
//! - `setup` / `settings` - Configure and inspect the store
//! - `reset` - Factory reset

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use nexus_pos_core::{CurrencyCode, ProductId};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod fetch;
mod receipt;
mod store;
mod terminal;

use config::PosConfig;
use fetch::CatalogClient;
use store::FileStore;
use terminal::Terminal;

#[derive(Parser)]
#[command(name = "nexus-cli")]
#[command(author, version, about = "Nexus POS terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Category to show, or "All"
        #[arg(short, long, default_value = "All")]
        category: String,
    },
    /// Manage the catalog
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Show or change the open cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Process payment for a table and print the receipt
    Pay {
        /// Table number (1 to the configured table count)
        #[arg(short, long)]
        table: u32,
    },
    /// Run the setup wizard
    Setup {
        /// Store name shown on receipts
        #[arg(short, long)]
        store_name: String,

        /// Number of tables
        #[arg(short, long)]
        tables: u32,

        /// Interface language
        #[arg(short, long, default_value = "en")]
        language: String,

        /// Currency code (`USD`, `PHP`, `EUR`, `JPY`, `GBP`, `CAD`, `AUD`)
        #[arg(short, long, default_value = "USD")]
        currency: CurrencyCode,
    },
    /// Show current settings
    Settings,
    /// Wipe all stored data
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Add a product to the catalog
    Add {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Unit price
        #[arg(short, long)]
        price: Decimal,

        /// Category label
        #[arg(short, long, default_value = "Food")]
        category: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Increase a line by one
    Inc { product_id: ProductId },
    /// Decrease a line by one, removing it at zero
    Dec { product_id: ProductId },
    /// Change a line by an arbitrary amount
    Qty {
        product_id: ProductId,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = PosConfig::from_env()?;
    let mut out = std::io::stdout();

    // Reset never needs the catalog, so skip opening (and possibly fetching).
    if let Commands::Reset { yes } = cli.command {
        let mut store = FileStore::new(&config.data_dir);
        commands::settings::reset(&mut store, yes, &mut out)?;
        return Ok(());
    }

    let source = CatalogClient::new(config.catalog_url.clone(), config.category_rule.clone());
    let mut terminal = Terminal::open(FileStore::new(&config.data_dir), &source).await?;
    let engine = terminal.engine_mut();

    match cli.command {
        Commands::Products { category } => commands::catalog::list(engine, &category, &mut out)?,
        Commands::Product { action } => match action {
            ProductAction::Add {
                name,
                price,
                category,
            } => commands::catalog::add(engine, name, price, &category, &mut out)?,
        },
        Commands::Cart { action } => match action.unwrap_or(CartAction::Show) {
            CartAction::Show => commands::cart::show(engine, &mut out)?,
            CartAction::Add { product_id } | CartAction::Inc { product_id } => {
                commands::cart::add(engine, product_id, &mut out)?;
            }
            CartAction::Dec { product_id } => {
                commands::cart::change(engine, product_id, -1, &mut out)?;
            }
            CartAction::Qty { product_id, delta } => {
                commands::cart::change(engine, product_id, delta, &mut out)?;
            }
            CartAction::Clear => commands::cart::clear(engine, &mut out)?,
        },
        Commands::Pay { table } => commands::pay::run(engine, table, &mut out)?,
        Commands::Setup {
            store_name,
            tables,
            language,
            currency,
        } => commands::settings::setup(engine, store_name, tables, language, currency, &mut out)?,
        Commands::Settings => commands::settings::show(engine, &mut out)?,
        Commands::Reset { .. } => {}
    }

    if terminal.is_dirty() {
        tracing::debug!(dir = %terminal.store().dir().display(), "Saving terminal state");
    }
    terminal.save_if_changed()?;
    Ok(())
}
