// ABOUTME: Demo data seeder for the ServiceFlow catalog server
// ABOUTME: Installs a demo provider with the broadband and business sample catalogs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

//! Demo data seeder.
//!
//! Populates the database with a demo provider account and two sample
//! services whose trees exercise the full catalog shape (branch nodes,
//! priceable leaves, and a unit the default cost table does not price).
//!
//! Usage:
//! ```bash
//! cargo run --bin seed-demo-data
//! cargo run --bin seed-demo-data -- --database-url sqlite:./data/serviceflow.db
//! ```

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Parser;
use serviceflow_server::{
    auth::hash_password,
    database::Database,
    logging,
    models::{Service, ServiceStatus, User, UserRole},
    tree::{samples, validate},
};
use tracing::info;
use uuid::Uuid;

/// Default password for the demo provider - allows login for testing.
const DEMO_PROVIDER_PASSWORD: &str = "DemoProvider123!";

#[derive(Parser)]
#[command(
    name = "seed-demo-data",
    about = "ServiceFlow demo data seeder",
    long_about = "Populate the database with a demo provider and sample service catalogs"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Email for the demo provider account
    #[arg(long, default_value = "provider@serviceflow.example")]
    provider_email: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env()?;

    let args = SeedArgs::parse();

    let database_url = args
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:./data/serviceflow.db".to_owned());

    let database = Database::new(&database_url).await?;
    info!("connected to {database_url}");

    let provider_id = ensure_demo_provider(&database, &args.provider_email).await?;

    let broadband = samples::broadband_tree();
    let business = samples::business_tree();

    // Seed through the same validation gate the API uses.
    validate(&broadband).map_err(|e| anyhow!("broadband sample tree invalid: {e}"))?;
    validate(&business).map_err(|e| anyhow!("business sample tree invalid: {e}"))?;

    let now = Utc::now();
    let broadband_service = Service {
        id: Uuid::new_v4(),
        provider_id,
        name: "Broadband Internet Service".to_owned(),
        description: "High-speed internet service with multiple connection options".to_owned(),
        service_type: "broadband".to_owned(),
        status: ServiceStatus::Active,
        tree: broadband,
        diagram: None,
        documents: vec![],
        users_count: 0,
        revenue: 0.0,
        created_at: now,
        updated_at: now,
    };
    database.create_service(&broadband_service).await?;
    info!("created broadband service {}", broadband_service.id);

    let business_service = Service {
        id: Uuid::new_v4(),
        provider_id,
        name: "Business Internet & Support".to_owned(),
        description: "Complete business internet and support package".to_owned(),
        service_type: "business".to_owned(),
        status: ServiceStatus::Active,
        tree: business,
        diagram: None,
        documents: vec![],
        users_count: 0,
        revenue: 0.0,
        created_at: now,
        updated_at: now,
    };
    database.create_service(&business_service).await?;
    info!("created business service {}", business_service.id);

    info!("sample data creation completed");
    Ok(())
}

/// Create the demo provider account if it does not exist, returning its
/// provider record id.
async fn ensure_demo_provider(database: &Database, email: &str) -> Result<Uuid> {
    if let Some(user) = database.get_user_by_email(email).await? {
        let provider = database
            .get_provider_by_user_id(user.id)
            .await?
            .ok_or_else(|| anyhow!("demo user {email} exists but has no provider record"))?;
        info!("reusing demo provider {}", provider.id);
        return Ok(provider.id);
    }

    let password_hash = hash_password(DEMO_PROVIDER_PASSWORD)?;
    let user = User::new(
        "Sample Provider".to_owned(),
        email.to_owned(),
        password_hash,
        UserRole::ServiceProvider,
    );
    database.register_user(&user).await?;

    let provider = database
        .get_provider_by_user_id(user.id)
        .await?
        .ok_or_else(|| anyhow!("provider record missing after registration"))?;

    info!("created demo provider {} ({email})", provider.id);
    Ok(provider.id)
}
