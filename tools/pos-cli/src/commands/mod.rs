//! CLI command implementations.

pub mod checkout;
pub mod config;
pub mod dashboard;
pub mod directory;
pub mod products;
pub mod sales;

use clap::{Args, Subcommand};
use pos_commerce::prelude::{PaymentMethod, ProductId, SaleId};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: Option<ProductsCommand>,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List products, optionally filtered locally.
    List {
        /// Case-insensitive name filter.
        #[arg(short, long)]
        query: Option<String>,

        /// Category filter ("All" for every category).
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one product.
    Show {
        /// Product id.
        id: ProductId,
    },
    /// Search products on the server.
    Search {
        /// Search text.
        query: String,
    },
    /// List products below their reorder threshold.
    LowStock,
    /// Set a product's stock.
    SetStock {
        /// Product id.
        id: ProductId,
        /// New stock level.
        stock: u32,
    },
    /// Delete a product.
    Delete {
        /// Product id.
        id: ProductId,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the customers, staff, suppliers and payments commands.
#[derive(Args)]
pub struct DirectoryArgs {
    #[command(subcommand)]
    pub command: Option<DirectoryCommand>,
}

#[derive(Subcommand)]
pub enum DirectoryCommand {
    /// List all records.
    List,
    /// Show one record.
    Show {
        /// Record id.
        id: String,
    },
    /// Search records on the server.
    Search {
        /// Search text.
        query: String,
    },
    /// Delete a record.
    Delete {
        /// Record id.
        id: String,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Item to sell as ID or IDxQTY (repeatable).
    #[arg(short, long = "item", required = true)]
    pub items: Vec<String>,

    /// Payment method: cash, card or mobile.
    #[arg(short, long, default_value = "cash")]
    pub pay: PaymentMethod,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the sales command.
#[derive(Args)]
pub struct SalesArgs {
    #[command(subcommand)]
    pub command: Option<SalesCommand>,
}

#[derive(Subcommand)]
pub enum SalesCommand {
    /// List recent sales.
    List {
        /// Show only the last N sales.
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Settle a pending sale.
    Pay {
        /// Sale id.
        id: SaleId,
        /// Payment method: cash, card or mobile.
        #[arg(short, long)]
        method: PaymentMethod,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
