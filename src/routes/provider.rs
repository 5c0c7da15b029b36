// ABOUTME: Provider route handlers for company info, dashboards, and service authoring
// ABOUTME: Service creation and edits run the tree validator before anything is persisted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::constants::limits;
use crate::database::CompanyInfoUpdate;
use crate::errors::{AppError, AppResult};
use crate::models::{DocumentRef, Service, ServiceProvider, ServiceStatus, StatCard, UserRole};
use crate::server::ServerResources;
use crate::tree::{validate, Tree};

/// Company info payload for the provider dashboard
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    /// Provider id
    pub id: String,
    /// Company display name
    pub company_name: String,
    /// Company website
    pub website: Option<String>,
    /// Business license reference
    pub business_license: Option<String>,
    /// Service categories offered
    pub service_types: Vec<String>,
    /// Company description
    pub description: Option<String>,
    /// Logo URL
    pub logo_url: Option<String>,
}

impl From<ServiceProvider> for CompanyInfo {
    fn from(provider: ServiceProvider) -> Self {
        Self {
            id: provider.id.to_string(),
            company_name: provider.company_name,
            website: provider.website,
            business_license: provider.business_license,
            service_types: provider.service_types,
            description: provider.description,
            logo_url: provider.logo_url,
        }
    }
}

/// Company info update request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyInfoRequest {
    /// New company name
    pub company_name: Option<String>,
    /// New website
    pub website: Option<String>,
    /// New business license
    pub business_license: Option<String>,
    /// New service categories
    pub service_types: Option<Vec<String>>,
    /// New description
    pub description: Option<String>,
    /// New logo URL
    pub logo_url: Option<String>,
}

/// Service creation request; the tree is validated before persistence
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    /// Service display name
    pub name: String,
    /// Service description
    #[serde(default)]
    pub description: String,
    /// Category
    #[serde(default = "default_service_type")]
    pub service_type: String,
    /// Publication status; defaults to draft
    pub status: Option<String>,
    /// The configuration tree
    pub tree: Tree,
    /// Optional rendered diagram payload
    pub diagram: Option<serde_json::Value>,
    /// Attached document references
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
}

fn default_service_type() -> String {
    "broadband".to_owned()
}

/// Service update request; the tree is overwritten wholesale
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    /// New display name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New category
    pub service_type: Option<String>,
    /// New publication status
    pub status: Option<String>,
    /// Replacement tree (validated, then overwrites the stored one)
    pub tree: Option<Tree>,
    /// Replacement diagram payload
    pub diagram: Option<serde_json::Value>,
    /// Replacement document list
    pub documents: Option<Vec<DocumentRef>>,
}

/// Summary of a provider's own service for dashboard listings
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnServiceSummary {
    /// Service id
    pub id: String,
    /// Service name
    pub name: String,
    /// Publication status
    pub status: ServiceStatus,
    /// Consumers on the service
    pub users_count: i64,
    /// Revenue, formatted to two decimals
    pub revenue: String,
    /// When the service was created
    pub created_at: String,
}

impl From<&Service> for OwnServiceSummary {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id.to_string(),
            name: service.name.clone(),
            status: service.status,
            users_count: service.users_count,
            revenue: format!("{:.2}", service.revenue),
            created_at: service.created_at.to_rfc3339(),
        }
    }
}

/// Provider routes
pub struct ProviderRoutes;

impl ProviderRoutes {
    /// Create all provider routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/company-info", get(Self::handle_company_info))
            .route("/company-info", put(Self::handle_update_company_info))
            .route("/stats", get(Self::handle_stats))
            .route("/recent-services", get(Self::handle_recent_services))
            .route("/service-types", get(Self::handle_service_types))
            .route("/all-services", get(Self::handle_all_services))
            .route("/services", post(Self::handle_create_service))
            .route("/services/:id", put(Self::handle_update_service))
            .with_state(resources)
    }

    /// Authenticate and resolve the caller's provider record
    async fn require_provider(
        resources: &Arc<ServerResources>,
        headers: &HeaderMap,
    ) -> AppResult<ServiceProvider> {
        let auth = resources
            .auth_middleware
            .authenticate_with_role(headers, UserRole::ServiceProvider)?;

        resources
            .database
            .get_provider_by_user_id(auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Service provider"))
    }

    /// Company information for the logged-in provider
    async fn handle_company_info(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        let provider = Self::require_provider(&resources, &headers).await?;

        Ok(Json(json!({
            "success": true,
            "company": CompanyInfo::from(provider),
        })))
    }

    /// Update company information
    async fn handle_update_company_info(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<UpdateCompanyInfoRequest>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources
            .auth_middleware
            .authenticate_with_role(&headers, UserRole::ServiceProvider)?;

        let update = CompanyInfoUpdate {
            company_name: request.company_name,
            website: request.website,
            business_license: request.business_license,
            service_types: request.service_types,
            description: request.description,
            logo_url: request.logo_url,
        };

        let updated = resources
            .database
            .update_company_info(auth.user_id, &update)
            .await?;
        if !updated {
            return Err(AppError::not_found("Service provider"));
        }

        Ok(Json(json!({
            "success": true,
            "message": "Company info updated successfully",
        })))
    }

    /// Dashboard stat cards for the provider
    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        let provider = Self::require_provider(&resources, &headers).await?;

        let stats = resources.database.provider_stats(provider.id).await?;

        let cards = vec![
            StatCard::stable("Total Services", stats.total_services.to_string()),
            StatCard::stable("Total Users", stats.total_users.to_string()),
            StatCard::stable("Total Revenue", format!("{:.2}", stats.total_revenue)),
        ];

        Ok(Json(json!({
            "success": true,
            "stats": cards,
        })))
    }

    /// The provider's most recently created services
    async fn handle_recent_services(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        let provider = Self::require_provider(&resources, &headers).await?;

        let services = resources
            .database
            .recent_services_by_provider(provider.id, limits::RECENT_LISTING_LIMIT)
            .await?;

        let summaries: Vec<OwnServiceSummary> =
            services.iter().map(OwnServiceSummary::from).collect();

        Ok(Json(json!({
            "success": true,
            "services": summaries,
        })))
    }

    /// The service-type catalog
    async fn handle_service_types(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        resources
            .auth_middleware
            .authenticate_with_role(&headers, UserRole::ServiceProvider)?;

        let types = resources.database.list_service_types().await?;

        Ok(Json(json!({
            "success": true,
            "types": types,
        })))
    }

    /// All services owned by the provider, including trees
    async fn handle_all_services(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        let provider = Self::require_provider(&resources, &headers).await?;

        let services = resources
            .database
            .list_services_by_provider(provider.id)
            .await?;

        Ok(Json(json!({
            "success": true,
            "services": services,
        })))
    }

    /// Create a service with its configuration tree
    async fn handle_create_service(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateServiceRequest>,
    ) -> AppResult<impl IntoResponse> {
        let provider = Self::require_provider(&resources, &headers).await?;

        if request.name.is_empty() {
            return Err(AppError::missing_field("name"));
        }

        // Reject structurally invalid trees before anything is persisted.
        validate(&request.tree)?;

        let status = request
            .status
            .as_deref()
            .map(ServiceStatus::from_str)
            .transpose()
            .map_err(AppError::invalid_input)?
            .unwrap_or(ServiceStatus::Draft);

        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            provider_id: provider.id,
            name: request.name,
            description: request.description,
            service_type: request.service_type,
            status,
            tree: request.tree,
            diagram: request.diagram,
            documents: request.documents,
            users_count: 0,
            revenue: 0.0,
            created_at: now,
            updated_at: now,
        };

        resources.database.create_service(&service).await?;

        info!(service_id = %service.id, provider_id = %provider.id, "service created");

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Service and configuration tree saved successfully",
                "serviceId": service.id.to_string(),
            })),
        ))
    }

    /// Overwrite a service; a supplied tree replaces the stored one
    /// wholesale (no versioning)
    async fn handle_update_service(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(service_id): Path<Uuid>,
        Json(request): Json<UpdateServiceRequest>,
    ) -> AppResult<impl IntoResponse> {
        let provider = Self::require_provider(&resources, &headers).await?;

        let mut service = resources
            .database
            .get_service(service_id)
            .await?
            .ok_or_else(|| AppError::not_found("Service"))?;

        if service.provider_id != provider.id {
            return Err(AppError::permission_denied(
                "Service belongs to another provider",
            ));
        }

        if let Some(tree) = request.tree {
            validate(&tree)?;
            service.tree = tree;
        }
        if let Some(name) = request.name {
            service.name = name;
        }
        if let Some(description) = request.description {
            service.description = description;
        }
        if let Some(service_type) = request.service_type {
            service.service_type = service_type;
        }
        if let Some(status) = request.status {
            service.status = status.parse().map_err(AppError::invalid_input)?;
        }
        if let Some(diagram) = request.diagram {
            service.diagram = Some(diagram);
        }
        if let Some(documents) = request.documents {
            service.documents = documents;
        }

        let updated = resources.database.update_service(&service).await?;
        if !updated {
            return Err(AppError::not_found("Service"));
        }

        Ok(Json(json!({
            "success": true,
            "message": "Service updated successfully",
        })))
    }
}
