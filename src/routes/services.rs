// ABOUTME: Consumer-facing service routes
// ABOUTME: Tree fetch for configuration and stateless cost estimation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::ServiceStatus;
use crate::server::ServerResources;
use crate::tree::{estimate, Selection};

/// Stateless estimate request against a service's current tree
#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    /// Selections to price
    pub selections: Vec<Selection>,
}

/// Consumer-facing service routes
pub struct ServiceRoutes;

impl ServiceRoutes {
    /// Create all service routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/:id/tree", get(Self::handle_get_tree))
            .route("/:id/estimate", post(Self::handle_estimate))
            .with_state(resources)
    }

    /// Fetch a service's configuration tree for client-side walking.
    ///
    /// Consumers only see active services; a provider may fetch its own
    /// drafts.
    async fn handle_get_tree(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(service_id): Path<Uuid>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_middleware.authenticate_request(&headers)?;

        let service = resources
            .database
            .get_service(service_id)
            .await?
            .ok_or_else(|| AppError::not_found("Service"))?;

        if service.status != ServiceStatus::Active {
            let owns_it = resources
                .database
                .get_provider_by_user_id(auth.user_id)
                .await?
                .is_some_and(|provider| provider.id == service.provider_id);
            if !owns_it {
                return Err(AppError::not_found("Service"));
            }
        }

        Ok(Json(json!({
            "success": true,
            "serviceId": service.id.to_string(),
            "name": service.name,
            "tree": service.tree,
        })))
    }

    /// Price selections against a service's tree without saving
    /// anything.
    ///
    /// Pure computation over the tree snapshot and the process-wide cost
    /// table; the same request always produces the same total.
    async fn handle_estimate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(service_id): Path<Uuid>,
        Json(request): Json<EstimateRequest>,
    ) -> AppResult<impl IntoResponse> {
        resources.auth_middleware.authenticate_request(&headers)?;

        let service = resources
            .database
            .get_service(service_id)
            .await?
            .ok_or_else(|| AppError::not_found("Service"))?;

        let result = estimate(&service.tree, &resources.unit_costs, &request.selections)?;

        Ok(Json(json!({
            "success": true,
            "total": result.total,
            "breakdown": result.breakdown,
        })))
    }
}
