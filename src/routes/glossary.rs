// ABOUTME: Glossary route handlers
// ABOUTME: Serves the measurement-unit cost catalog to authenticated clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use crate::errors::AppResult;
use crate::server::ServerResources;

/// Glossary routes
pub struct GlossaryRoutes;

impl GlossaryRoutes {
    /// Create all glossary routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/uom-costs", get(Self::handle_uom_costs))
            .with_state(resources)
    }

    /// Return the unit-of-measurement cost catalog in force
    async fn handle_uom_costs(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        resources.auth_middleware.authenticate_request(&headers)?;

        // BTreeMap for stable key order in the response body.
        let costs: BTreeMap<&str, f64> = resources.unit_costs.entries().into_iter().collect();

        Ok(Json(json!({
            "success": true,
            "uomCosts": costs,
        })))
    }
}
