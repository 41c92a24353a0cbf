//! `folioctl`: manage the portfolio collection and drive the carousel
//! without a browser.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use folio_config::{ConfigLoader, logging};
use std::path::PathBuf;

use commands::{AddArgs, PlayArgs};

#[derive(Parser)]
#[command(name = "folioctl", about = "Folio portfolio tooling", version)]
struct Cli {
    /// Config file (TOML or JSON); otherwise FOLIO_CONFIG_PATH, FOLIO_CONFIG_JSON, or folio.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Env file loaded before resolving configuration
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every project in the configured store
    List {
        /// Print the projects as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Add a project (requires a signed-in user)
    Add(AddArgs),
    /// Run the carousel headlessly and log its state
    Play(PlayArgs),
    /// Validate configuration and print guard-rail warnings
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = cli.env_file {
        loader = loader.with_env_file(path);
    }
    let load = loader.load()?;
    logging::init(load.config.logging.filter.as_deref());

    match cli.command {
        Command::List { json } => commands::list(&load.config, json).await,
        Command::Add(args) => commands::add(&load.config, args).await,
        Command::Play(args) => commands::play(&load.config, args).await,
        Command::Check => commands::check(&load),
    }
}
