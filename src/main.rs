mod api;
mod cli;
mod config;
mod db;
mod models;
mod services;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "football-quant")]
#[command(about = "Football match forecasts from historical match statistics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },
    /// Import new matches from the results feed
    Refresh {
        /// Read a local CSV instead of downloading the feed
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// List teams available for prediction
    Teams {
        /// Use a local CSV instead of the database
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Forecast a single fixture
    Predict {
        #[arg(long)]
        home: String,
        #[arg(long)]
        away: String,
        /// Use a local CSV instead of the database
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Initialize the database
    InitDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port }) => {
            tracing::info!("Starting Football Quant API server on port {}", port);
            api::serve(port).await?;
        }
        Some(Commands::Refresh { file }) => {
            tracing::info!("Refreshing match data");
            cli::refresh_data(file).await?;
        }
        Some(Commands::Teams { csv }) => {
            cli::list_teams(csv).await?;
        }
        Some(Commands::Predict { home, away, csv }) => {
            tracing::info!("Predicting {} vs {}", home, away);
            cli::predict_match(&home, &away, csv).await?;
        }
        Some(Commands::InitDb) => {
            tracing::info!("Initializing database...");
            db::init_database().await?;
        }
        None => {
            // Default to serving
            tracing::info!("Starting Football Quant API server on port 8000");
            api::serve(8000).await?;
        }
    }

    Ok(())
}
