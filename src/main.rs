//! vol-crawler - LA volunteer opportunity scraper and map builder
//!
//! Scrapes volunteer.laworks.com search results through a WebDriver session
//! and renders the saved records as a zip-code choropleth map.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use vol_crawler::commands::{MapCommand, ScrapeCommand};
use vol_crawler::config::Config;

#[derive(Parser)]
#[command(
    name = "vol-crawler",
    version,
    about = "LA volunteer opportunity scraper and map builder",
    long_about = "Scrapes volunteer opportunities from volunteer.laworks.com and builds a zip-code choropleth map of where they are."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// WebDriver endpoint (chromedriver)
    #[arg(long, global = true, env = "VOL_WEBDRIVER")]
    webdriver: Option<String>,

    /// Delay between load-more clicks in milliseconds
    #[arg(long, global = true, env = "VOL_DELAY")]
    delay: Option<u64>,

    /// Output directory for records and the map
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Run the browser with a visible window
    #[arg(long, global = true)]
    visible: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the opportunity search results and save them
    #[command(alias = "s")]
    Scrape {
        /// Maximum number of "View More" clicks
        #[arg(long)]
        max_clicks: Option<usize>,
    },

    /// Build the choropleth map from saved records
    #[command(alias = "m")]
    Map {
        /// Records file to read (defaults to <output-dir>/opportunities.json)
        #[arg(long)]
        records: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(webdriver) = cli.webdriver {
        config.webdriver_url = webdriver;
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    if cli.visible {
        config.headless = false;
    }

    match cli.command {
        Commands::Scrape { max_clicks } => {
            if let Some(max) = max_clicks {
                config.max_load_more_clicks = max;
            }

            let cmd = ScrapeCommand::new(config);
            cmd.execute().await?;
        }

        Commands::Map { records } => {
            let cmd = MapCommand::new(config);
            cmd.execute(records.as_deref()).await?;
        }
    }

    Ok(())
}
