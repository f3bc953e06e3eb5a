//! hnews CLI
//!
//! Runs the story proxy, or fetches a listing once and prints it.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hnews_api::{ApiConfig, ApiServer, AppState};
use hnews_core::constants::STORY_CACHE_TTL;

/// hnews - caching JSON proxy for Hacker News listings
#[derive(Parser)]
#[command(name = "hnews")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "8080")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Fetch one listing and print it as JSON
    Fetch {
        /// Story type: top, show or ask
        #[arg(default_value = "top")]
        story_type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
        Commands::Fetch { story_type } => cmd_fetch(&story_type).await,
    }
}

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        "hnews=debug,info"
    } else {
        "hnews=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Run the API server
async fn cmd_serve(port: u16, bind: &str) -> Result<()> {
    let config = ApiConfig::from_env();

    println!("{}", "Starting hnews API server...".cyan().bold());
    println!("   {} http://{}:{}/api/stories", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!("   {} {}", "Upstream:".dimmed(), config.hn_api_base_url);
    println!("   {} {}s", "Cache TTL:".dimmed(), STORY_CACHE_TTL.as_secs());
    println!("\n   Press Ctrl+C to stop.\n");

    let server = ApiServer::new(config).context("Failed to build API server")?;

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;
    server.run(addr).await.context("API server stopped")?;

    Ok(())
}

/// Fetch a single listing and print it
async fn cmd_fetch(story_type: &str) -> Result<()> {
    let state = AppState::new(ApiConfig::from_env()).context("Failed to build fetcher")?;

    let start = std::time::Instant::now();
    let stories = state
        .fetcher
        .fetch_stories(story_type)
        .await
        .with_context(|| format!("Failed to fetch {} stories", story_type))?;

    println!("{}", serde_json::to_string_pretty(&stories)?);
    eprintln!(
        "{} {} stories in {:?}",
        "Fetched".green().bold(),
        stories.len(),
        start.elapsed()
    );

    Ok(())
}
