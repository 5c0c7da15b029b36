// ABOUTME: Server binary serving the ServiceFlow catalog API
// ABOUTME: Loads configuration, runs migrations, and starts the HTTP listener
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # ServiceFlow Catalog Server Binary
//!
//! Starts the multi-tenant catalog API with user authentication, service
//! tree storage, and saved-configuration management.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use serviceflow_server::{
    config::ServerConfig, database::Database, logging, server, server::ServerResources,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "serviceflow-server")]
#[command(about = "ServiceFlow - multi-tenant service catalog API")]
struct Args {
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

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;

    // Apply CLI overrides
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = serviceflow_server::config::DatabaseUrl::parse_url(&database_url)?;
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting ServiceFlow catalog server");
    info!("{}", config.summary());

    // Initialize database and run migrations
    let database = Database::new(&config.database.url.to_connection_string()).await?;
    info!("Database initialized and migrated");

    let resources = Arc::new(ServerResources::new(database, config));

    server::serve(resources).await
}
