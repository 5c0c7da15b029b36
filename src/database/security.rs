// ABOUTME: Security-event log database operations
// ABOUTME: Records auth events and serves the admin security feed

use anyhow::{anyhow, Result};
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::models::{SecurityEvent, SecuritySeverity};

impl Database {
    /// Create the security-events table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub(super) async fn migrate_security(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS security_events (
                id TEXT PRIMARY KEY,
                type TEXT NOT NULL,
                message TEXT NOT NULL,
                severity TEXT NOT NULL DEFAULT 'info' CHECK (severity IN ('info', 'warning', 'critical')),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_security_events_created ON security_events(created_at)",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Append an event to the security log
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn record_security_event(
        &self,
        event_type: &str,
        message: &str,
        severity: SecuritySeverity,
    ) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO security_events (id, type, message, severity)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(event_type)
        .bind(message)
        .bind(severity.to_string())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Most recent security events, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub async fn recent_security_events(&self, limit: i64) -> Result<Vec<SecurityEvent>> {
        let rows = sqlx::query(
            r"
            SELECT id, type, message, severity, created_at
            FROM security_events
            ORDER BY created_at DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id")?;
                let severity: String = row.try_get("severity")?;
                Ok(SecurityEvent {
                    id: Uuid::parse_str(&id)?,
                    event_type: row.try_get("type")?,
                    message: row.try_get("message")?,
                    severity: severity.parse().map_err(|e: String| anyhow!(e))?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }
}
