//! POS CLI - Command line client for the point-of-sale backend.
//!
//! Commands:
//! - `pos products` - Browse the catalog and adjust stock
//! - `pos customers|staff|suppliers|payments` - Browse directory records
//! - `pos checkout` - Ring up a sale
//! - `pos sales` - Sale history and pending-sale payment
//! - `pos dashboard` - Today's figures
//! - `pos reports` - Revenue, order and customer reports
//! - `pos config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pos_commerce::prelude::{Customer, Payment, Staff, Supplier};
use tracing_subscriber::EnvFilter;

use commands::{CheckoutArgs, ConfigArgs, DirectoryArgs, ProductsArgs, SalesArgs};

/// POS CLI - Sell, browse and report against the point-of-sale backend
#[derive(Parser)]
#[command(name = "pos")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Named environment from the config file
    #[arg(short, long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog and adjust stock
    Products(ProductsArgs),

    /// Browse customers
    Customers(DirectoryArgs),

    /// Browse staff
    Staff(DirectoryArgs),

    /// Browse suppliers
    Suppliers(DirectoryArgs),

    /// Browse payment records
    Payments(DirectoryArgs),

    /// Ring up a sale
    Checkout(CheckoutArgs),

    /// Sale history and pending-sale payment
    Sales(SalesArgs),

    /// Show today's figures
    Dashboard,

    /// Show revenue, order and customer reports
    Reports,

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(level: &str, verbose: bool) {
    let default = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(cli.config.as_deref(), cli.env.as_deref(), output.clone())
    {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    init_tracing(&ctx.config.log.level, ctx.output.is_verbose());

    // Execute command
    let result = match cli.command {
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Customers(args) => commands::directory::run::<Customer>(args, &ctx).await,
        Commands::Staff(args) => commands::directory::run::<Staff>(args, &ctx).await,
        Commands::Suppliers(args) => commands::directory::run::<Supplier>(args, &ctx).await,
        Commands::Payments(args) => commands::directory::run::<Payment>(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Sales(args) => commands::sales::run(args, &ctx).await,
        Commands::Dashboard => commands::dashboard::run_dashboard(&ctx).await,
        Commands::Reports => commands::dashboard::run_reports(&ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_checkout_arguments() {
        let cli = Cli::try_parse_from([
            "pos", "checkout", "--item", "7x2", "-i", "3", "--pay", "mobile", "--yes",
        ])
        .unwrap();
        match cli.command {
            Commands::Checkout(args) => {
                assert_eq!(args.items, vec!["7x2", "3"]);
                assert_eq!(args.pay.as_str(), "mobile");
                assert!(args.yes);
            }
            _ => panic!("expected checkout"),
        }
    }

    #[test]
    fn test_unknown_payment_method_is_rejected() {
        assert!(Cli::try_parse_from(["pos", "checkout", "-i", "1", "--pay", "cheque"]).is_err());
    }
}
