// ABOUTME: Saved-configuration database operations
// ABOUTME: Snapshot CRUD, lifecycle transitions, and consumer dashboard listings

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::models::{ConfigurationSnapshot, ConfigurationStatus, SavedConfiguration};

/// A saved configuration joined with its service and provider names for
/// display
#[derive(Debug, Clone)]
pub struct ConfigurationWithService {
    /// The configuration itself
    pub configuration: SavedConfiguration,
    /// Service display name
    pub service_name: Option<String>,
    /// Service description
    pub service_description: Option<String>,
    /// Provider company name
    pub provider_name: Option<String>,
}

/// One row of the consumer "recently accessed services" listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentService {
    /// Service id
    pub id: Uuid,
    /// Service name
    pub name: String,
    /// Provider company name
    pub provider: String,
    /// When the consumer last touched the configuration
    pub last_accessed: DateTime<Utc>,
    /// Configuration progress (0-100)
    pub progress: i64,
    /// Configuration status
    pub status: ConfigurationStatus,
}

/// One row of the consumer catalogue listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueEntry {
    /// Configuration id
    pub id: Uuid,
    /// Configuration name
    pub name: String,
    /// Configured service id
    pub service_id: Uuid,
    /// Configured service name
    pub service_name: String,
    /// Configuration progress (0-100)
    pub progress: i64,
    /// Configuration status
    pub status: ConfigurationStatus,
    /// When the configuration was created
    pub created_at: DateTime<Utc>,
}

/// One row of the consumer "active services" status listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveServiceStatus {
    /// Service id
    pub id: Uuid,
    /// Service name
    pub name: String,
    /// Service publication status
    pub status: String,
    /// Last service update
    pub last_updated: DateTime<Utc>,
}

impl Database {
    /// Create the saved-configurations table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub(super) async fn migrate_configurations(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_configurations (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                service_id TEXT NOT NULL REFERENCES services(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                configuration TEXT NOT NULL,
                progress INTEGER NOT NULL DEFAULT 100,
                status TEXT NOT NULL DEFAULT 'saved' CHECK (status IN ('draft', 'saved', 'active')),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_user_configurations_user ON user_configurations(user_id)",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Persist a new configuration snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails.
    pub async fn insert_configuration(&self, config: &SavedConfiguration) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO user_configurations (id, user_id, service_id, name, configuration,
                                             progress, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(config.id.to_string())
        .bind(config.user_id.to_string())
        .bind(config.service_id.to_string())
        .bind(&config.name)
        .bind(serde_json::to_string(&config.snapshot)?)
        .bind(config.progress)
        .bind(config.status.to_string())
        .bind(config.created_at)
        .bind(config.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// All of a user's configurations with service/provider names,
    /// most recently updated first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub async fn list_configurations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConfigurationWithService>> {
        let rows = sqlx::query(
            r"
            SELECT uc.id, uc.user_id, uc.service_id, uc.name, uc.configuration,
                   uc.progress, uc.status, uc.created_at, uc.updated_at,
                   s.name AS service_name, s.description AS service_description,
                   sp.company_name AS provider_name
            FROM user_configurations uc
            LEFT JOIN services s ON uc.service_id = s.id
            LEFT JOIN service_providers sp ON s.provider_id = sp.id
            WHERE uc.user_id = $1
            ORDER BY uc.updated_at DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| Self::row_to_configuration_with_service(row))
            .collect()
    }

    /// One configuration with service/provider names, scoped to its
    /// owner
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn get_configuration_for_user(
        &self,
        config_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ConfigurationWithService>> {
        let row = sqlx::query(
            r"
            SELECT uc.id, uc.user_id, uc.service_id, uc.name, uc.configuration,
                   uc.progress, uc.status, uc.created_at, uc.updated_at,
                   s.name AS service_name, s.description AS service_description,
                   sp.company_name AS provider_name
            FROM user_configurations uc
            LEFT JOIN services s ON uc.service_id = s.id
            LEFT JOIN service_providers sp ON s.provider_id = sp.id
            WHERE uc.id = $1 AND uc.user_id = $2
            ",
        )
        .bind(config_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(self.pool())
        .await?;

        row.map(|row| Self::row_to_configuration_with_service(&row))
            .transpose()
    }

    /// Replace an owned configuration's name, snapshot, and progress.
    ///
    /// Status is not touched here; lifecycle moves go through
    /// [`Database::update_configuration_status`].
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the update fails.
    pub async fn update_configuration(
        &self,
        config_id: Uuid,
        user_id: Uuid,
        name: &str,
        snapshot: &ConfigurationSnapshot,
        progress: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            r"
            UPDATE user_configurations
            SET name = $3, configuration = $4, progress = $5, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(config_id.to_string())
        .bind(user_id.to_string())
        .bind(name)
        .bind(serde_json::to_string(snapshot)?)
        .bind(progress)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Move an owned configuration to a new lifecycle status.
    ///
    /// Activation also counts the consumer onto the service and adds the
    /// snapshot total to the service's revenue, in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn update_configuration_status(
        &self,
        config: &SavedConfiguration,
        new_status: ConfigurationStatus,
    ) -> Result<bool> {
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query(
            r"
            UPDATE user_configurations
            SET status = $3, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(config.id.to_string())
        .bind(config.user_id.to_string())
        .bind(new_status.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        if new_status == ConfigurationStatus::Active {
            sqlx::query(
                r"
                UPDATE services
                SET users_count = users_count + 1, revenue = revenue + $2
                WHERE id = $1
                ",
            )
            .bind(config.service_id.to_string())
            .bind(config.snapshot.total_estimate)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Delete an owned configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_configuration(&self, config_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM user_configurations WHERE id = $1 AND user_id = $2")
                .bind(config_id.to_string())
                .bind(user_id.to_string())
                .execute(self.pool())
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Services the user touched most recently, via their
    /// configurations
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub async fn recent_services_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<RecentService>> {
        let rows = sqlx::query(
            r"
            SELECT s.id, s.name, sp.company_name AS provider,
                   uc.updated_at AS last_accessed, uc.progress, uc.status
            FROM user_configurations uc
            JOIN services s ON uc.service_id = s.id
            JOIN service_providers sp ON s.provider_id = sp.id
            WHERE uc.user_id = $1
            ORDER BY uc.updated_at DESC
            LIMIT $2
            ",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id")?;
                let status: String = row.try_get("status")?;
                Ok(RecentService {
                    id: Uuid::parse_str(&id)?,
                    name: row.try_get("name")?,
                    provider: row.try_get("provider")?,
                    last_accessed: row.try_get("last_accessed")?,
                    progress: row.try_get("progress")?,
                    status: status.parse().map_err(|e: String| anyhow!(e))?,
                })
            })
            .collect()
    }

    /// The user's configuration catalogue, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub async fn catalogue_for_user(&self, user_id: Uuid) -> Result<Vec<CatalogueEntry>> {
        let rows = sqlx::query(
            r"
            SELECT uc.id, uc.name, uc.service_id, s.name AS service_name,
                   uc.progress, uc.status, uc.created_at
            FROM user_configurations uc
            JOIN services s ON uc.service_id = s.id
            WHERE uc.user_id = $1
            ORDER BY uc.created_at DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id")?;
                let service_id: String = row.try_get("service_id")?;
                let status: String = row.try_get("status")?;
                Ok(CatalogueEntry {
                    id: Uuid::parse_str(&id)?,
                    name: row.try_get("name")?,
                    service_id: Uuid::parse_str(&service_id)?,
                    service_name: row.try_get("service_name")?,
                    progress: row.try_get("progress")?,
                    status: status.parse().map_err(|e: String| anyhow!(e))?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }

    /// Services behind the user's active configurations
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub async fn service_status_for_user(&self, user_id: Uuid) -> Result<Vec<ActiveServiceStatus>> {
        let rows = sqlx::query(
            r"
            SELECT s.id, s.name, s.status, s.updated_at AS last_updated
            FROM user_configurations uc
            JOIN services s ON uc.service_id = s.id
            WHERE uc.user_id = $1 AND uc.status = 'active'
            ORDER BY s.updated_at DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id")?;
                Ok(ActiveServiceStatus {
                    id: Uuid::parse_str(&id)?,
                    name: row.try_get("name")?,
                    status: row.try_get("status")?,
                    last_updated: row.try_get("last_updated")?,
                })
            })
            .collect()
    }

    fn row_to_configuration_with_service(
        row: &sqlx::sqlite::SqliteRow,
    ) -> Result<ConfigurationWithService> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let service_id: String = row.try_get("service_id")?;
        let status: String = row.try_get("status")?;
        let snapshot_json: String = row.try_get("configuration")?;

        let snapshot: ConfigurationSnapshot = serde_json::from_str(&snapshot_json)?;

        Ok(ConfigurationWithService {
            configuration: SavedConfiguration {
                id: Uuid::parse_str(&id)?,
                user_id: Uuid::parse_str(&user_id)?,
                service_id: Uuid::parse_str(&service_id)?,
                name: row.try_get("name")?,
                snapshot,
                progress: row.try_get("progress")?,
                status: status.parse().map_err(|e: String| anyhow!(e))?,
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
            },
            service_name: row.try_get("service_name")?,
            service_description: row.try_get("service_description")?,
            provider_name: row.try_get("provider_name")?,
        })
    }
}
