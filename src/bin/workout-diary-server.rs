// ABOUTME: Server binary: loads configuration, opens the document store, and serves the REST API
// ABOUTME: Command-line flags override the matching environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Diary Server Binary
//!
//! Starts the workout diary REST API backed by a SQLite document store.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use workout_diary_server::{
    config::ServerConfig, database::Database, logging, resources::ServerResources, server,
};

#[derive(Parser)]
#[command(name = "workout-diary-server")]
#[command(about = "Workout Diary API - exercise, set, and physique tracking over REST")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = database_url;
    }

    info!("Starting Workout Diary Server");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url).await?;
    info!("Database initialized: {}", config.database.url);

    let resources = Arc::new(ServerResources::new(database, config)?);

    if let Err(e) = server::run(resources).await {
        error!("Server error: {e:#}");
        return Err(e);
    }
    Ok(())
}
