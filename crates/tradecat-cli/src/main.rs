mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tradecat_catalog::ProductOrder;

#[derive(Debug, Parser)]
#[command(name = "tradecat-cli")]
#[command(about = "Trade catalog command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List reconciled products with their availability.
    Products {
        /// Output order: catalog, name or sku.
        #[arg(long, default_value_t = ProductOrder::Catalog)]
        order: ProductOrder,
    },
    /// Build and print the navigation index for a menu.
    Nav { menu_key: String },
    /// Resolve SKUs to commerce merchandise IDs.
    Resolve {
        #[arg(required = true)]
        skus: Vec<String>,
    },
    /// Email a quote. Ctrl-C cancels a dispatch still in flight.
    Quote { quote_number: String, email: String },
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = tradecat_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Products { order } => commands::run_products(&config, order).await,
        Commands::Nav { menu_key } => commands::run_nav(&config, &menu_key).await,
        Commands::Resolve { skus } => commands::run_resolve(&config, &skus).await,
        Commands::Quote {
            quote_number,
            email,
        } => commands::run_quote(&config, &quote_number, &email).await,
        Commands::Config => {
            println!("{config:#?}");
            Ok(())
        }
    }
}
