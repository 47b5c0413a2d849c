//! Activity roster - school activity listings with teacher sessions.
//!
//! Usage:
//!   activity-roster serve [--port 8000] [--teachers-file teachers.json] [--static-dir static]

use activity_roster::config::ServerConfig;
use activity_roster::http_server;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "activity-roster")]
#[command(about = "School activity roster with HTTP API")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve(ServerConfig),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Serve(config) => {
            if let Err(e) = http_server::run_server(config).await {
                error!("Server error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
