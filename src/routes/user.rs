// ABOUTME: Consumer route handlers for profile and dashboard listings
// ABOUTME: Recent services, available services, catalogue, and service status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use crate::models::{ProfileUpdate, User};
use crate::server::ServerResources;

/// Profile fields returned to the owning user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// User id
    pub id: String,
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Company name
    pub company_name: Option<String>,
    /// Company website
    pub website: Option<String>,
    /// Business license
    pub business_license: Option<String>,
    /// Profile description
    pub description: Option<String>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            company_name: user.company_name,
            website: user.website,
            business_license: user.business_license,
            description: user.description,
        }
    }
}

/// Consumer routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create all consumer routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/profile", get(Self::handle_get_profile))
            .route("/profile", post(Self::handle_update_profile))
            .route("/recent-services", get(Self::handle_recent_services))
            .route("/available-services", get(Self::handle_available_services))
            .route("/catalogue", get(Self::handle_catalogue))
            .route("/service-status", get(Self::handle_service_status))
            .with_state(resources)
    }

    /// Fetch the current user's profile
    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_middleware.authenticate_request(&headers)?;

        let user = resources
            .database
            .get_user_by_id(auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        Ok(Json(json!({
            "success": true,
            "user": ProfileResponse::from(user),
        })))
    }

    /// Update the current user's profile; absent fields are left alone
    async fn handle_update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(update): Json<ProfileUpdate>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_middleware.authenticate_request(&headers)?;

        if update.is_empty() {
            return Err(AppError::invalid_input("At least one field is required"));
        }

        let user = resources
            .database
            .update_user_profile(auth.user_id, &update)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        Ok(Json(json!({
            "success": true,
            "message": "Profile updated successfully",
            "user": ProfileResponse::from(user),
        })))
    }

    /// Services the user touched most recently
    async fn handle_recent_services(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_middleware.authenticate_request(&headers)?;

        let services = resources
            .database
            .recent_services_for_user(auth.user_id, limits::RECENT_LISTING_LIMIT)
            .await?;

        Ok(Json(json!({
            "success": true,
            "services": services,
        })))
    }

    /// All active services offered to consumers
    async fn handle_available_services(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        resources.auth_middleware.authenticate_request(&headers)?;

        let services = resources.database.list_active_services().await?;

        Ok(Json(json!({
            "success": true,
            "services": services,
        })))
    }

    /// The user's saved-configuration catalogue
    async fn handle_catalogue(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_middleware.authenticate_request(&headers)?;

        let items = resources.database.catalogue_for_user(auth.user_id).await?;

        Ok(Json(json!({
            "success": true,
            "items": items,
        })))
    }

    /// Status of services behind the user's active configurations
    async fn handle_service_status(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_middleware.authenticate_request(&headers)?;

        let services = resources
            .database
            .service_status_for_user(auth.user_id)
            .await?;

        Ok(Json(json!({
            "success": true,
            "services": services,
        })))
    }
}
