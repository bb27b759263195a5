mod pipeline;
mod report;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "arbscan")]
#[command(about = "Find Walmart items that resell profitably on Amazon")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Refresh Walmart category ids from the live taxonomy
    Categories {
        /// Write every leaf category with its full path instead of top-level ids
        #[arg(long)]
        leaves: bool,
    },
    /// Fetch special-offer feed items from Walmart
    Feeds {
        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Look up Walmart items by item id
    Lookup {
        /// Walmart item ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Fetch feeds and pair items with Amazon products by UPC
    Match {
        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Fetch, pair, and keep only profitable, popular products
    Analyze {
        #[command(flatten)]
        fetch: FetchArgs,
    },
}

/// Overrides for the Walmart feed walk. Unset values come from configuration.
#[derive(Debug, Clone, Default, Args)]
struct FetchArgs {
    /// Category id to walk (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Special feed to walk, e.g. `clearance` (repeatable)
    #[arg(long = "feed")]
    feeds: Vec<String>,

    /// Only fetch items of this brand
    #[arg(long)]
    brand: Option<String>,

    /// Maximum pages to follow per (feed, category) query
    #[arg(long)]
    max_pages: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = arbscan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Some(Commands::Categories { leaves }) => pipeline::run_categories(&config, leaves).await?,
        Some(Commands::Feeds { fetch }) => pipeline::run_feeds(&config, &fetch).await?,
        Some(Commands::Lookup { ids }) => pipeline::run_lookup(&config, &ids).await?,
        Some(Commands::Match { fetch }) => pipeline::run_match(&config, &fetch).await?,
        Some(Commands::Analyze { fetch }) => pipeline::run_analyze(&config, &fetch).await?,
        None => println!("arbscan: no command given; see --help"),
    }

    Ok(())
}
