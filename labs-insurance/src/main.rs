//! Labs insurance command-line driver.
//!
//! Runs the mod's startup patching and insurance mail resolution over JSON
//! files, standing in for the host server.
//!
//! ```bash
//! cargo run -p labs-insurance -- resolve \
//!     --config config.json --database tables.json --claims claims.json --session pmc
//! ```

mod commands;
mod logging;

use clap::{Parser, Subcommand};
use logging::LogLevel;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "labs-insurance", version, about = "Labs insurance rules for the Fence insurer")]
struct Cli {
    /// Log at debug level regardless of RUST_LOG. Setting `debug` in the mod
    /// config has the same effect once the config is loaded.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load and validate a mod config, then print it with defaults filled in.
    CheckConfig {
        #[arg(long)]
        config: PathBuf,
    },

    /// Apply a mod config to database tables and report what changed.
    Patch {
        #[arg(long)]
        config: PathBuf,

        #[arg(long)]
        database: PathBuf,

        /// Write the patched tables here.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Resolve insurance claims and print the mail that would be sent.
    Resolve {
        #[arg(long)]
        config: PathBuf,

        #[arg(long)]
        database: PathBuf,

        /// JSON array of insurance claims.
        #[arg(long)]
        claims: PathBuf,

        #[arg(long, default_value = "local")]
        session: String,

        /// Seed for template selection, for reproducible runs.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let log = LogLevel::init(cli.verbose);

    match cli.command {
        Command::CheckConfig { config } => commands::check_config(&config, &log).await,
        Command::Patch {
            config,
            database,
            output,
        } => commands::patch(&config, &database, output.as_deref(), &log)
            .await
            .map(drop),
        Command::Resolve {
            config,
            database,
            claims,
            session,
            seed,
        } => commands::resolve(&config, &database, &claims, &session, seed, &log)
            .await
            .map(drop),
    }
}
