//! CLI entry point for portfolio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "portfolio-rs")]
#[command(version)]
#[command(about = "A personal portfolio/blog SPA core with offline cache-rule generation", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a local server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Generate the service worker from the post registry
    Sw {
        /// Print the workbox-style config as JSON instead of writing the worker
        #[arg(long)]
        json: bool,
    },

    /// List the posts in the registry
    List,

    /// Resolve a path against the route table
    Resolve {
        /// Path to resolve, e.g. /blog/thinking-prpl
        path: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "portfolio_rs=debug,info"
    } else {
        "portfolio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let portfolio = portfolio_rs::Portfolio::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            portfolio_rs::server::start(&portfolio, &ip, port).await?;
        }

        Commands::Sw { json } => {
            let portfolio = portfolio_rs::Portfolio::new(&base_dir)?;
            portfolio_rs::commands::sw::run(&portfolio, json)?;
        }

        Commands::List => {
            let portfolio = portfolio_rs::Portfolio::new(&base_dir)?;
            portfolio_rs::commands::list::run(&portfolio)?;
        }

        Commands::Resolve { path } => {
            let portfolio = portfolio_rs::Portfolio::new(&base_dir)?;
            let route = portfolio_rs::router::resolve(&path);
            let view = portfolio_rs::router::compose(&route, &portfolio.registry);
            println!("{:?}", route);
            tracing::debug!("composed view: {:?}", view);
        }

        Commands::Version => {
            println!("portfolio-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
