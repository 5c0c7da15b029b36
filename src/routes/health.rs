// ABOUTME: Health check route handler
// ABOUTME: Liveness endpoint for deployment probes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use crate::constants::service_names;

/// Health routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health route
    #[must_use]
    pub fn routes() -> Router {
        Router::new().route("/health", get(Self::handle_health))
    }

    async fn handle_health() -> impl IntoResponse {
        Json(json!({
            "status": "ok",
            "service": service_names::SERVICEFLOW_SERVER,
            "version": env!("CARGO_PKG_VERSION"),
        }))
    }
}
