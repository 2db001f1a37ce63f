//! Handlecheck command-line shell
//!
//! This is the thin shell that loads input, starts a run, and prints results.
//! The checking logic lives in the `crates/` directory.

mod check;
mod config_cmd;
mod export;
mod input;

use anyhow::Result;
use clap::{Parser, Subcommand};
use handlecheck_core::AppConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Check which usernames are taken")]
    Check(CheckArgs),
    #[command(about = "Inspect configuration")]
    Config(ConfigArgs),
}

#[derive(Parser)]
pub(crate) struct CheckArgs {
    #[arg(
        long,
        short,
        help = "Account list: a .json array of objects with a \"username\" field, or one username per line"
    )]
    pub(crate) input: Option<PathBuf>,
    #[arg(long = "username", short = 'u', help = "Username to check (repeatable)")]
    pub(crate) usernames: Vec<String>,
    #[arg(long, short, help = "Maximum lookups in flight [default: from config]")]
    pub(crate) concurrency: Option<usize>,
    #[arg(long, short, help = "Directory for the active-accounts export [default: from config]")]
    pub(crate) output: Option<PathBuf>,
    #[arg(long, help = "Skip writing the active-accounts export")]
    pub(crate) no_export: bool,
}

#[derive(Parser)]
pub(crate) struct ConfigArgs {
    #[command(subcommand)]
    pub(crate) command: ConfigCommands,
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    #[command(about = "Print the effective configuration")]
    Show,
    #[command(about = "Print the configuration file location")]
    Path,
    #[command(about = "Write a configuration file with default values")]
    Init(InitArgs),
}

#[derive(Parser)]
pub(crate) struct InitArgs {
    #[arg(long, help = "Maximum lookups in flight")]
    pub(crate) concurrency: Option<usize>,
    #[arg(long, help = "Per-request timeout in seconds")]
    pub(crate) timeout_secs: Option<u64>,
    #[arg(long, help = "Directory for active-accounts exports")]
    pub(crate) output_dir: Option<PathBuf>,
    #[arg(long, help = "Overwrite an existing configuration file")]
    pub(crate) force: bool,
}

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,handlecheck=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Check(args) => {
            info!("Starting handlecheck v{}", env!("CARGO_PKG_VERSION"));
            let config = AppConfig::load_with_env()?;
            check::run(args, &config).await
        }
        Commands::Config(args) => config_cmd::handle_config(args),
    }
}
