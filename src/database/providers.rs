// ABOUTME: Service-provider database operations
// ABOUTME: Company records, provider dashboard stats, and the service-type catalog

use anyhow::Result;
use serde::Serialize;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::models::ServiceProvider;

/// Partial company-info update accepted from the provider dashboard
#[derive(Debug, Clone, Default)]
pub struct CompanyInfoUpdate {
    /// Company display name
    pub company_name: Option<String>,
    /// Company website
    pub website: Option<String>,
    /// Business license reference
    pub business_license: Option<String>,
    /// Service categories offered
    pub service_types: Option<Vec<String>>,
    /// Company description
    pub description: Option<String>,
    /// Logo URL
    pub logo_url: Option<String>,
}

/// One entry of the service-type catalog
#[derive(Debug, Clone, Serialize)]
pub struct ServiceTypeEntry {
    /// Type id
    pub id: String,
    /// Type name
    pub name: String,
    /// Type description
    pub description: Option<String>,
}

/// Aggregates for the provider dashboard
#[derive(Debug, Clone, Copy)]
pub struct ProviderStats {
    /// Services owned by the provider
    pub total_services: i64,
    /// Consumers across those services
    pub total_users: i64,
    /// Revenue across those services
    pub total_revenue: f64,
}

/// Default service categories seeded into a fresh database
const DEFAULT_SERVICE_TYPES: &[(&str, &str)] = &[
    ("broadband", "Residential and business internet connectivity"),
    ("business", "Business internet and support packages"),
    ("hosting", "Web and application hosting"),
    ("voice", "Voice and telephony services"),
];

impl Database {
    /// Create provider and service-type tables, seeding default types
    ///
    /// # Errors
    ///
    /// Returns an error if table creation or seeding fails.
    pub(super) async fn migrate_providers(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS service_providers (
                id TEXT PRIMARY KEY,
                user_id TEXT UNIQUE NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                company_name TEXT NOT NULL,
                website TEXT,
                business_license TEXT,
                service_types TEXT NOT NULL DEFAULT '[]',
                description TEXT,
                logo_url TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS service_types (
                id TEXT PRIMARY KEY,
                name TEXT UNIQUE NOT NULL,
                description TEXT
            )
            ",
        )
        .execute(self.pool())
        .await?;

        for (name, description) in DEFAULT_SERVICE_TYPES {
            sqlx::query(
                "INSERT OR IGNORE INTO service_types (id, name, description) VALUES ($1, $2, $3)",
            )
            .bind(name)
            .bind(name)
            .bind(description)
            .execute(self.pool())
            .await?;
        }

        Ok(())
    }

    /// Get the provider record owned by a user
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn get_provider_by_user_id(&self, user_id: Uuid) -> Result<Option<ServiceProvider>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, company_name, website, business_license,
                   service_types, description, logo_url, created_at, updated_at
            FROM service_providers
            WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(self.pool())
        .await?;

        row.map(|row| Self::row_to_provider(&row)).transpose()
    }

    /// Update a provider's company info; absent fields are left alone
    ///
    /// # Errors
    ///
    /// Returns an error if the update or serialization fails.
    pub async fn update_company_info(
        &self,
        user_id: Uuid,
        update: &CompanyInfoUpdate,
    ) -> Result<bool> {
        let service_types_json = update
            .service_types
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r"
            UPDATE service_providers SET
                company_name = COALESCE($2, company_name),
                website = COALESCE($3, website),
                business_license = COALESCE($4, business_license),
                service_types = COALESCE($5, service_types),
                description = COALESCE($6, description),
                logo_url = COALESCE($7, logo_url),
                updated_at = CURRENT_TIMESTAMP
            WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .bind(&update.company_name)
        .bind(&update.website)
        .bind(&update.business_license)
        .bind(service_types_json)
        .bind(&update.description)
        .bind(&update.logo_url)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List the service-type catalog, sorted by name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_service_types(&self) -> Result<Vec<ServiceTypeEntry>> {
        let rows = sqlx::query("SELECT id, name, description FROM service_types ORDER BY name")
            .fetch_all(self.pool())
            .await?;

        rows.iter()
            .map(|row| {
                Ok(ServiceTypeEntry {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    description: row.try_get("description")?,
                })
            })
            .collect()
    }

    /// Aggregate dashboard stats for one provider
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn provider_stats(&self, provider_id: Uuid) -> Result<ProviderStats> {
        let row = sqlx::query(
            r"
            SELECT
                COUNT(*) AS total_services,
                COALESCE(SUM(users_count), 0) AS total_users,
                COALESCE(SUM(revenue), 0.0) AS total_revenue
            FROM services
            WHERE provider_id = $1
            ",
        )
        .bind(provider_id.to_string())
        .fetch_one(self.pool())
        .await?;

        Ok(ProviderStats {
            total_services: row.try_get("total_services")?,
            total_users: row.try_get("total_users")?,
            total_revenue: row.try_get("total_revenue")?,
        })
    }

    fn row_to_provider(row: &sqlx::sqlite::SqliteRow) -> Result<ServiceProvider> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let service_types_json: String = row.try_get("service_types")?;

        Ok(ServiceProvider {
            id: Uuid::parse_str(&id)?,
            user_id: Uuid::parse_str(&user_id)?,
            company_name: row.try_get("company_name")?,
            website: row.try_get("website")?,
            business_license: row.try_get("business_license")?,
            service_types: serde_json::from_str(&service_types_json)?,
            description: row.try_get("description")?,
            logo_url: row.try_get("logo_url")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
