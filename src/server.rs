// ABOUTME: Server resources and HTTP router assembly
// ABOUTME: Bundles shared state and wires route groups, CORS, and tracing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

//! Server resources and router assembly.
//!
//! [`ServerResources`] is the dependency-injection bundle handed to every
//! route group: database, auth manager/middleware, the immutable unit
//! cost table, and the loaded configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::middleware::AuthMiddleware;
use crate::routes;
use crate::tree::UnitCostTable;

/// Shared state for all route handlers
pub struct ServerResources {
    /// Storage layer
    pub database: Database,
    /// Token issuing and validation
    pub auth_manager: AuthManager,
    /// Request authentication
    pub auth_middleware: AuthMiddleware,
    /// Immutable measurement-unit price catalog
    pub unit_costs: UnitCostTable,
    /// Loaded configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Bundle the server's shared dependencies.
    ///
    /// The unit cost table is built here, once, from the defaults plus
    /// any configured overrides; handlers receive it by injection and
    /// never consult ambient state.
    #[must_use]
    pub fn new(database: Database, config: ServerConfig) -> Self {
        let auth_manager = AuthManager::new(
            config.auth.jwt_secret.as_bytes(),
            config.auth.token_expiry_hours,
        );
        let auth_middleware = AuthMiddleware::new(auth_manager.clone());
        let unit_costs = UnitCostTable::defaults_with_overrides(&config.unit_cost_overrides);

        Self {
            database,
            auth_manager,
            auth_middleware,
            unit_costs,
            config,
        }
    }
}

/// Assemble the full application router
#[must_use]
pub fn router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .nest("/api/auth", routes::auth::AuthRoutes::routes(resources.clone()))
        .nest("/api/user", routes::user::UserRoutes::routes(resources.clone()))
        .nest(
            "/api/provider",
            routes::provider::ProviderRoutes::routes(resources.clone()),
        )
        .nest(
            "/api/admin",
            routes::admin::AdminRoutes::routes(resources.clone()),
        )
        .nest(
            "/api/glossary",
            routes::glossary::GlossaryRoutes::routes(resources.clone()),
        )
        .nest(
            "/api/services",
            routes::services::ServiceRoutes::routes(resources.clone()),
        )
        .nest(
            "/api/saved-configurations",
            routes::configurations::ConfigurationRoutes::routes(resources.clone()),
        )
        .merge(routes::health::HealthRoutes::routes())
        .layer(TraceLayer::new_for_http())
        // Browser clients run on a separate dev origin; the API itself
        // is bearer-token authenticated.
        .layer(CorsLayer::permissive())
}

/// Bind the listener and serve until shutdown
///
/// # Errors
///
/// Returns an error if binding or serving fails.
pub async fn serve(resources: Arc<ServerResources>) -> Result<()> {
    let addr = format!("0.0.0.0:{}", resources.config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("HTTP server listening on {addr}");

    let app = router(&resources);
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated")?;

    Ok(())
}
