// ABOUTME: Service catalog database operations
// ABOUTME: Service CRUD with JSON tree column, listings, and admin aggregates

use anyhow::{anyhow, Result};
use serde::Serialize;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::models::{Service, ServiceStatus};
use crate::tree::Tree;

/// One row of the consumer-facing service listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListing {
    /// Service id
    pub id: Uuid,
    /// Service name
    pub name: String,
    /// Provider company name
    pub provider: String,
    /// Service description
    pub description: String,
    /// Category
    pub service_type: String,
    /// Publication status
    pub status: ServiceStatus,
}

/// One row of the admin service-oversight listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOversight {
    /// Service id
    pub id: Uuid,
    /// Service name
    pub name: String,
    /// Provider company name
    pub provider: String,
    /// Publication status
    pub status: ServiceStatus,
    /// Consumers on the service
    pub users: i64,
    /// Revenue, formatted to two decimals
    pub revenue: String,
}

/// System-wide aggregates for the admin dashboard
#[derive(Debug, Clone, Copy)]
pub struct AdminStats {
    /// All registered users
    pub total_users: i64,
    /// All services
    pub total_services: i64,
    /// Saved configurations currently active
    pub active_configurations: i64,
    /// Revenue across all services
    pub total_revenue: f64,
}

impl Database {
    /// Create the services table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub(super) async fn migrate_services(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS services (
                id TEXT PRIMARY KEY,
                provider_id TEXT NOT NULL REFERENCES service_providers(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                service_type TEXT NOT NULL DEFAULT 'broadband',
                status TEXT NOT NULL DEFAULT 'draft' CHECK (status IN ('draft', 'active', 'inactive')),
                tree TEXT NOT NULL,
                diagram TEXT,
                documents TEXT NOT NULL DEFAULT '[]',
                users_count INTEGER NOT NULL DEFAULT 0,
                revenue REAL NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_services_provider ON services(provider_id)")
            .execute(self.pool())
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_services_status ON services(status)")
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Insert a new service with its configuration tree
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails.
    pub async fn create_service(&self, service: &Service) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO services (id, provider_id, name, description, service_type, status,
                                  tree, diagram, documents, users_count, revenue, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(service.id.to_string())
        .bind(service.provider_id.to_string())
        .bind(&service.name)
        .bind(&service.description)
        .bind(&service.service_type)
        .bind(service.status.to_string())
        .bind(serde_json::to_string(&service.tree)?)
        .bind(
            service
                .diagram
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
        )
        .bind(serde_json::to_string(&service.documents)?)
        .bind(service.users_count)
        .bind(service.revenue)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Overwrite a service's editable fields wholesale, including its
    /// tree. Scoped to the owning provider.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the update fails.
    pub async fn update_service(&self, service: &Service) -> Result<bool> {
        let result = sqlx::query(
            r"
            UPDATE services SET
                name = $3,
                description = $4,
                service_type = $5,
                status = $6,
                tree = $7,
                diagram = $8,
                documents = $9,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND provider_id = $2
            ",
        )
        .bind(service.id.to_string())
        .bind(service.provider_id.to_string())
        .bind(&service.name)
        .bind(&service.description)
        .bind(&service.service_type)
        .bind(service.status.to_string())
        .bind(serde_json::to_string(&service.tree)?)
        .bind(
            service
                .diagram
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
        )
        .bind(serde_json::to_string(&service.documents)?)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get a service with its tree by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn get_service(&self, service_id: Uuid) -> Result<Option<Service>> {
        let row = sqlx::query(
            r"
            SELECT id, provider_id, name, description, service_type, status,
                   tree, diagram, documents, users_count, revenue, created_at, updated_at
            FROM services
            WHERE id = $1
            ",
        )
        .bind(service_id.to_string())
        .fetch_optional(self.pool())
        .await?;

        row.map(|row| Self::row_to_service(&row)).transpose()
    }

    /// All active services with their provider names, for the consumer
    /// catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_active_services(&self) -> Result<Vec<ServiceListing>> {
        let rows = sqlx::query(
            r"
            SELECT s.id, s.name, sp.company_name AS provider,
                   s.description, s.service_type, s.status
            FROM services s
            JOIN service_providers sp ON s.provider_id = sp.id
            WHERE s.status = 'active'
            ORDER BY s.name
            ",
        )
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id")?;
                let status: String = row.try_get("status")?;
                Ok(ServiceListing {
                    id: Uuid::parse_str(&id)?,
                    name: row.try_get("name")?,
                    provider: row.try_get("provider")?,
                    description: row.try_get("description")?,
                    service_type: row.try_get("service_type")?,
                    status: status.parse().map_err(|e: String| anyhow!(e))?,
                })
            })
            .collect()
    }

    /// All services owned by a provider, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub async fn list_services_by_provider(&self, provider_id: Uuid) -> Result<Vec<Service>> {
        let rows = sqlx::query(
            r"
            SELECT id, provider_id, name, description, service_type, status,
                   tree, diagram, documents, users_count, revenue, created_at, updated_at
            FROM services
            WHERE provider_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(provider_id.to_string())
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(|row| Self::row_to_service(row)).collect()
    }

    /// A provider's most recently created services
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub async fn recent_services_by_provider(
        &self,
        provider_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Service>> {
        let rows = sqlx::query(
            r"
            SELECT id, provider_id, name, description, service_type, status,
                   tree, diagram, documents, users_count, revenue, created_at, updated_at
            FROM services
            WHERE provider_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(provider_id.to_string())
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(|row| Self::row_to_service(row)).collect()
    }

    /// All services with provider names for admin oversight, newest
    /// first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn admin_service_overview(&self) -> Result<Vec<ServiceOversight>> {
        let rows = sqlx::query(
            r"
            SELECT s.id, s.name, sp.company_name AS provider,
                   s.status, s.users_count, s.revenue
            FROM services s
            JOIN service_providers sp ON s.provider_id = sp.id
            ORDER BY s.created_at DESC
            ",
        )
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id")?;
                let status: String = row.try_get("status")?;
                let revenue: f64 = row.try_get("revenue")?;
                Ok(ServiceOversight {
                    id: Uuid::parse_str(&id)?,
                    name: row.try_get("name")?,
                    provider: row.try_get("provider")?,
                    status: status.parse().map_err(|e: String| anyhow!(e))?,
                    users: row.try_get("users_count")?,
                    revenue: format!("{revenue:.2}"),
                })
            })
            .collect()
    }

    /// System-wide aggregates for the admin dashboard
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn admin_stats(&self) -> Result<AdminStats> {
        let row = sqlx::query(
            r"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM services) AS total_services,
                (SELECT COUNT(*) FROM user_configurations WHERE status = 'active') AS active_configurations,
                (SELECT COALESCE(SUM(revenue), 0.0) FROM services) AS total_revenue
            ",
        )
        .fetch_one(self.pool())
        .await?;

        Ok(AdminStats {
            total_users: row.try_get("total_users")?,
            total_services: row.try_get("total_services")?,
            active_configurations: row.try_get("active_configurations")?,
            total_revenue: row.try_get("total_revenue")?,
        })
    }

    fn row_to_service(row: &sqlx::sqlite::SqliteRow) -> Result<Service> {
        let id: String = row.try_get("id")?;
        let provider_id: String = row.try_get("provider_id")?;
        let status: String = row.try_get("status")?;
        let tree_json: String = row.try_get("tree")?;
        let diagram_json: Option<String> = row.try_get("diagram")?;
        let documents_json: String = row.try_get("documents")?;

        let tree: Tree = serde_json::from_str(&tree_json)?;
        let diagram = diagram_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(Service {
            id: Uuid::parse_str(&id)?,
            provider_id: Uuid::parse_str(&provider_id)?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            service_type: row.try_get("service_type")?,
            status: status.parse().map_err(|e: String| anyhow!(e))?,
            tree,
            diagram,
            documents: serde_json::from_str(&documents_json)?,
            users_count: row.try_get("users_count")?,
            revenue: row.try_get("revenue")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
