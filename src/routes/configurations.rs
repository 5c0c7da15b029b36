// ABOUTME: Saved-configuration route handlers
// ABOUTME: CRUD over configuration snapshots plus lifecycle status transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

//! Saved-configuration routes.
//!
//! A save recomputes the estimate server-side against the service's
//! current tree and the cost table in force — the estimator is
//! authoritative, a client-sent total is ignored — and validates the
//! submitted path against the tree topology. The persisted snapshot is
//! immutable thereafter: later tree edits never change it.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::database::ConfigurationWithService;
use crate::errors::{AppError, AppResult};
use crate::models::{ConfigurationSnapshot, ConfigurationStatus, SavedConfiguration};
use crate::server::ServerResources;
use crate::tree::{estimate, resolve_path, Selection, Tree};

/// Configuration save request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveConfigurationRequest {
    /// Service being configured
    pub service_id: Uuid,
    /// Configuration name
    pub name: String,
    /// Selections made
    pub selected_nodes: Vec<Selection>,
    /// Root-to-node walk taken (optional)
    #[serde(default)]
    pub selected_path: Vec<String>,
    /// Completion percentage (defaults to complete)
    pub progress: Option<i64>,
    /// Initial status; `saved` unless the client asks for `draft`
    pub status: Option<String>,
}

/// Configuration update request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigurationRequest {
    /// New name
    pub name: Option<String>,
    /// Replacement selections
    pub selected_nodes: Vec<Selection>,
    /// Replacement path
    #[serde(default)]
    pub selected_path: Vec<String>,
    /// New completion percentage
    pub progress: Option<i64>,
}

/// Status transition request
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// Target status
    pub status: String,
}

/// Configuration payload shaped for display
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationView {
    /// Configuration id
    pub id: String,
    /// Configuration name
    pub name: String,
    /// Configured service id
    pub service_id: String,
    /// Owning user id
    pub user_id: String,
    /// Configured service name
    pub service_name: String,
    /// Configured service description
    pub service_description: String,
    /// Provider company name
    pub provider: String,
    /// Selections made
    pub user_choices: Vec<Selection>,
    /// Walk taken through the tree
    pub selected_path: Vec<String>,
    /// Completion percentage
    pub progress: i64,
    /// Lifecycle status
    pub status: ConfigurationStatus,
    /// Snapshot total
    pub total_estimate: f64,
    /// Created timestamp, RFC 3339
    pub created_at: String,
    /// Updated timestamp, RFC 3339
    pub updated_at: String,
}

impl From<ConfigurationWithService> for ConfigurationView {
    fn from(row: ConfigurationWithService) -> Self {
        let config = row.configuration;
        let selected = config.snapshot.selected_nodes.len();
        Self {
            id: config.id.to_string(),
            name: config.name.clone(),
            service_id: config.service_id.to_string(),
            user_id: config.user_id.to_string(),
            service_name: row.service_name.unwrap_or_else(|| config.name.clone()),
            service_description: row
                .service_description
                .unwrap_or_else(|| format!("Configuration with {selected} selected nodes")),
            provider: row.provider_name.unwrap_or_else(|| "ServiceFlow".to_owned()),
            user_choices: config.snapshot.selected_nodes,
            selected_path: config.snapshot.selected_path,
            progress: config.progress,
            status: config.status,
            total_estimate: config.snapshot.total_estimate,
            created_at: config.created_at.to_rfc3339(),
            updated_at: config.updated_at.to_rfc3339(),
        }
    }
}

/// Saved-configuration routes
pub struct ConfigurationRoutes;

impl ConfigurationRoutes {
    /// Create all saved-configuration routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_list))
            .route("/", post(Self::handle_save))
            .route("/:id", get(Self::handle_get))
            .route("/:id", put(Self::handle_update))
            .route("/:id", delete(Self::handle_delete))
            .route("/:id/status", put(Self::handle_status))
            .with_state(resources)
    }

    /// Build the snapshot for a set of selections: resolve the path
    /// against the tree when one is claimed, then recompute the total.
    fn build_snapshot(
        tree: &Tree,
        resources: &ServerResources,
        selected_nodes: Vec<Selection>,
        selected_path: Vec<String>,
    ) -> AppResult<ConfigurationSnapshot> {
        if !selected_path.is_empty() {
            resolve_path(tree, &selected_path)?;
        }

        let priced = estimate(tree, &resources.unit_costs, &selected_nodes)?;

        Ok(ConfigurationSnapshot {
            selected_nodes,
            selected_path,
            total_estimate: priced.total,
            timestamp: Utc::now(),
        })
    }

    /// List the user's saved configurations
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_middleware.authenticate_request(&headers)?;

        let rows = resources
            .database
            .list_configurations_for_user(auth.user_id)
            .await?;

        let configurations: Vec<ConfigurationView> =
            rows.into_iter().map(ConfigurationView::from).collect();

        Ok(Json(json!({
            "success": true,
            "configurations": configurations,
        })))
    }

    /// Save a new configuration snapshot
    async fn handle_save(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<SaveConfigurationRequest>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_middleware.authenticate_request(&headers)?;

        if request.name.is_empty() {
            return Err(AppError::missing_field("name"));
        }
        if request.selected_nodes.is_empty() {
            return Err(AppError::missing_field("selectedNodes"));
        }

        let service = resources
            .database
            .get_service(request.service_id)
            .await?
            .ok_or_else(|| AppError::not_found("Service"))?;

        let status = request
            .status
            .as_deref()
            .map(ConfigurationStatus::from_str)
            .transpose()
            .map_err(AppError::invalid_input)?
            .unwrap_or(ConfigurationStatus::Saved);
        if status == ConfigurationStatus::Active {
            return Err(AppError::invalid_input(
                "A configuration must be saved before it can be activated",
            ));
        }

        let snapshot = Self::build_snapshot(
            &service.tree,
            &resources,
            request.selected_nodes,
            request.selected_path,
        )?;

        let now = Utc::now();
        let config = SavedConfiguration {
            id: Uuid::new_v4(),
            user_id: auth.user_id,
            service_id: request.service_id,
            name: request.name,
            snapshot,
            progress: request.progress.unwrap_or(100),
            status,
            created_at: now,
            updated_at: now,
        };

        resources.database.insert_configuration(&config).await?;

        info!(config_id = %config.id, user_id = %auth.user_id, "configuration saved");

        let row = resources
            .database
            .get_configuration_for_user(config.id, auth.user_id)
            .await?
            .ok_or_else(|| AppError::internal("Configuration vanished after insert"))?;

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "configuration": ConfigurationView::from(row),
            })),
        ))
    }

    /// Fetch one configuration
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(config_id): Path<Uuid>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_middleware.authenticate_request(&headers)?;

        let row = resources
            .database
            .get_configuration_for_user(config_id, auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Configuration"))?;

        Ok(Json(json!({
            "success": true,
            "configuration": ConfigurationView::from(row),
        })))
    }

    /// Update a configuration's contents.
    ///
    /// Allowed while `draft` or `saved`; an `active` configuration is
    /// frozen until its owner transitions it back. The estimate is
    /// recomputed against the service's *current* tree, producing a
    /// fresh snapshot.
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(config_id): Path<Uuid>,
        Json(request): Json<UpdateConfigurationRequest>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_middleware.authenticate_request(&headers)?;

        let existing = resources
            .database
            .get_configuration_for_user(config_id, auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Configuration"))?
            .configuration;

        if !existing.status.allows_content_updates() {
            return Err(AppError::invalid_input(
                "An active configuration cannot be edited; move it back to saved first",
            ));
        }

        if request.selected_nodes.is_empty() {
            return Err(AppError::missing_field("selectedNodes"));
        }

        let service = resources
            .database
            .get_service(existing.service_id)
            .await?
            .ok_or_else(|| AppError::not_found("Service"))?;

        let snapshot = Self::build_snapshot(
            &service.tree,
            &resources,
            request.selected_nodes,
            request.selected_path,
        )?;

        let name = request.name.unwrap_or(existing.name);
        let progress = request.progress.unwrap_or(existing.progress);

        let updated = resources
            .database
            .update_configuration(config_id, auth.user_id, &name, &snapshot, progress)
            .await?;
        if !updated {
            return Err(AppError::not_found("Configuration"));
        }

        let row = resources
            .database
            .get_configuration_for_user(config_id, auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Configuration"))?;

        Ok(Json(json!({
            "success": true,
            "configuration": ConfigurationView::from(row),
        })))
    }

    /// Delete a configuration (terminal from any status)
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(config_id): Path<Uuid>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_middleware.authenticate_request(&headers)?;

        let deleted = resources
            .database
            .delete_configuration(config_id, auth.user_id)
            .await?;
        if !deleted {
            return Err(AppError::not_found("Configuration"));
        }

        Ok(Json(json!({
            "success": true,
            "message": "Configuration deleted successfully",
        })))
    }

    /// Move a configuration through its lifecycle.
    ///
    /// The state machine is `draft → saved → active` with `saved →
    /// draft` as the only backward move; skipping the explicit save is
    /// rejected.
    async fn handle_status(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(config_id): Path<Uuid>,
        Json(request): Json<StatusRequest>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_middleware.authenticate_request(&headers)?;

        let new_status =
            ConfigurationStatus::from_str(&request.status).map_err(AppError::invalid_input)?;

        let config = resources
            .database
            .get_configuration_for_user(config_id, auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Configuration"))?
            .configuration;

        if !config.status.can_transition_to(new_status) {
            return Err(AppError::invalid_input(format!(
                "Cannot move a {} configuration to {}",
                config.status, new_status
            )));
        }

        resources
            .database
            .update_configuration_status(&config, new_status)
            .await?;

        info!(
            config_id = %config.id,
            from = %config.status,
            to = %new_status,
            "configuration status changed"
        );

        Ok(Json(json!({
            "success": true,
            "status": new_status,
        })))
    }
}
