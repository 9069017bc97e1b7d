mod api;
mod cli;
mod config;
mod error;
mod server;
mod services;

use anyhow::Result;
use clap::Parser;
use log::info;
use std::sync::Arc;

use api::ClientManager;
use cli::Cli;
use config::Config;
use server::AppState;
use services::rows::UpdateOptions;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_cli(&cli);
    config.validate()?;

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .default_filter_or(config.api.monitoring.log_level.as_filter()),
    )
    .init();

    match &config.sheets.spreadsheet_id {
        Some(id) => info!("Using spreadsheet {}", id),
        None => info!("No spreadsheet configured; requests will fail until SPREADSHEET_ID is set"),
    }

    let manager = Arc::new(ClientManager::new(
        config.sheets.clone(),
        config.api.clone(),
    ));

    if !cli.skip_auth_check {
        let manager = manager.clone();
        tokio::spawn(async move {
            manager.verify().await;
        });
    }

    let state = AppState::new(
        manager,
        config.sheets.default_range.clone(),
        UpdateOptions {
            last_column: config.sheets.last_column.clone(),
        },
        config.api.monitoring.correlation_ids,
    );
    let app = server::router(state, &config.server.cors_origins);

    server::serve(&config.bind_address(), app).await
}
