// ABOUTME: Admin route handlers for oversight dashboards
// ABOUTME: User management, service overview, system stats, and the security feed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{delete, get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use crate::models::{StatCard, UserRole, UserStatus};
use crate::server::ServerResources;

/// Sanitized user summary for the admin listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// User id
    pub id: String,
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Account role
    pub role: UserRole,
    /// Derived activity flag: active once the account has logged in
    pub status: String,
    /// Last successful login, RFC 3339
    pub last_login: Option<String>,
    /// When the account was created, RFC 3339
    pub join_date: String,
}

/// Admin user update request
#[derive(Debug, Deserialize)]
pub struct AdminUpdateUserRequest {
    /// New display name
    pub name: Option<String>,
    /// New email
    pub email: Option<String>,
    /// New role
    pub role: Option<String>,
    /// New account status
    pub status: Option<String>,
}

/// Admin routes
pub struct AdminRoutes;

impl AdminRoutes {
    /// Create all admin routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/users", get(Self::handle_list_users))
            .route("/users/:id", put(Self::handle_update_user))
            .route("/users/:id", delete(Self::handle_delete_user))
            .route("/services", get(Self::handle_services))
            .route("/stats", get(Self::handle_stats))
            .route("/security-events", get(Self::handle_security_events))
            .with_state(resources)
    }

    /// List all users with their last login
    async fn handle_list_users(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        resources
            .auth_middleware
            .authenticate_with_role(&headers, UserRole::Admin)?;

        let users = resources.database.admin_list_users().await?;

        let summaries: Vec<UserSummary> = users
            .into_iter()
            .map(|(user, last_login)| UserSummary {
                id: user.id.to_string(),
                name: user.name,
                email: user.email,
                role: user.role,
                status: if last_login.is_some() {
                    "active".to_owned()
                } else {
                    "inactive".to_owned()
                },
                last_login: last_login.map(|at| at.to_rfc3339()),
                join_date: user.created_at.to_rfc3339(),
            })
            .collect();

        Ok(Json(json!({
            "success": true,
            "users": summaries,
        })))
    }

    /// Update a user account
    async fn handle_update_user(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<Uuid>,
        Json(request): Json<AdminUpdateUserRequest>,
    ) -> AppResult<impl IntoResponse> {
        let admin = resources
            .auth_middleware
            .authenticate_with_role(&headers, UserRole::Admin)?;

        if request.name.is_none()
            && request.email.is_none()
            && request.role.is_none()
            && request.status.is_none()
        {
            return Err(AppError::invalid_input("No fields to update"));
        }

        let role = request
            .role
            .as_deref()
            .map(UserRole::from_str)
            .transpose()
            .map_err(AppError::invalid_input)?;
        let status = request
            .status
            .as_deref()
            .map(UserStatus::from_str)
            .transpose()
            .map_err(AppError::invalid_input)?;

        let user = resources
            .database
            .admin_update_user(
                user_id,
                request.name.as_deref(),
                request.email.as_deref(),
                role,
                status,
            )
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        info!(admin_id = %admin.user_id, user_id = %user_id, "admin updated user");

        Ok(Json(json!({
            "success": true,
            "user": json!({
                "id": user.id.to_string(),
                "name": user.name,
                "email": user.email,
                "role": user.role,
                "status": user.status,
            }),
        })))
    }

    /// Delete a user account
    async fn handle_delete_user(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<Uuid>,
    ) -> AppResult<impl IntoResponse> {
        let admin = resources
            .auth_middleware
            .authenticate_with_role(&headers, UserRole::Admin)?;

        if admin.user_id == user_id {
            return Err(AppError::invalid_input(
                "Admins cannot delete their own account",
            ));
        }

        let deleted = resources.database.delete_user(user_id).await?;
        if !deleted {
            return Err(AppError::not_found("User"));
        }

        info!(admin_id = %admin.user_id, user_id = %user_id, "admin deleted user");

        Ok(Json(json!({
            "success": true,
            "message": "User deleted successfully",
        })))
    }

    /// All services with providers for oversight
    async fn handle_services(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        resources
            .auth_middleware
            .authenticate_with_role(&headers, UserRole::Admin)?;

        let services = resources.database.admin_service_overview().await?;

        Ok(Json(json!({
            "success": true,
            "services": services,
        })))
    }

    /// System-wide stat cards
    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        resources
            .auth_middleware
            .authenticate_with_role(&headers, UserRole::Admin)?;

        let stats = resources.database.admin_stats().await?;

        let cards = vec![
            StatCard::stable("Total Users", stats.total_users.to_string()),
            StatCard::stable("Total Services", stats.total_services.to_string()),
            StatCard::stable(
                "Active Configurations",
                stats.active_configurations.to_string(),
            ),
            StatCard::stable("Total Revenue", format!("{:.2}", stats.total_revenue)),
        ];

        Ok(Json(json!({
            "success": true,
            "stats": cards,
        })))
    }

    /// Recent security events and alerts
    async fn handle_security_events(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        resources
            .auth_middleware
            .authenticate_with_role(&headers, UserRole::Admin)?;

        let events = resources
            .database
            .recent_security_events(limits::SECURITY_EVENT_FEED_LIMIT)
            .await?;

        let events: Vec<serde_json::Value> = events
            .iter()
            .map(|event| {
                json!({
                    "id": event.id.to_string(),
                    "type": event.event_type,
                    "message": event.message,
                    "severity": event.severity,
                    "time": event.created_at.to_rfc3339(),
                })
            })
            .collect();

        Ok(Json(json!({
            "success": true,
            "events": events,
        })))
    }
}
