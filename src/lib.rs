pub mod api;
pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::Category;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::net::SocketAddr;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Serve {
        listen_addr: Option<SocketAddr>,
    },
    Snapshot {
        category: Option<Category>,
        json: bool,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("piyasa starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let service = providers::market_service(&config.providers)?;

    match command {
        AppCommand::Serve { listen_addr } => {
            let addr = listen_addr.unwrap_or(config.server.listen_addr);
            api::serve(service, addr).await
        }
        AppCommand::Snapshot { category, json } => {
            cli::snapshot::run(&service, category, json).await
        }
    }
}
