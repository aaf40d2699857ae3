use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use piyasa::core::Category;
use piyasa::core::log::init_logging;
use std::net::SocketAddr;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Serve the market snapshot over HTTP
    Serve {
        /// Address to listen on, overrides the configured one
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },
    /// Fetch and display the current market snapshot
    Snapshot {
        /// Only show one category (currency, gold, crypto)
        #[arg(long)]
        category: Option<Category>,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
}

impl From<Commands> for piyasa::AppCommand {
    fn from(cmd: Commands) -> piyasa::AppCommand {
        match cmd {
            Commands::Serve { listen } => piyasa::AppCommand::Serve {
                listen_addr: listen,
            },
            Commands::Snapshot { category, json } => {
                piyasa::AppCommand::Snapshot { category, json }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match (&cli.command, cli.verbose) {
        (_, true) => LevelFilter::DEBUG,
        (Some(Commands::Serve { .. }), false) => LevelFilter::INFO,
        _ => LevelFilter::WARN,
    };
    init_logging(level);

    let result = match cli.command {
        Some(Commands::Setup) => piyasa::cli::setup::setup(),
        Some(cmd) => piyasa::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
