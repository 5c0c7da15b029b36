// ABOUTME: User management database operations
// ABOUTME: Handles registration, lookup, profile updates, and password reset tokens

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::models::{ProfileUpdate, User, UserRole, UserStatus};

impl Database {
    /// Create user and password-reset tables
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub(super) async fn migrate_users(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL CHECK (role IN ('consumer', 'service_provider', 'admin')),
                status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'inactive')),
                phone TEXT,
                address TEXT,
                company_name TEXT,
                website TEXT,
                business_license TEXT,
                description TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS password_reset_tokens (
                token_hash TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                expires_at DATETIME NOT NULL,
                used BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(self.pool())
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_reset_tokens_user ON password_reset_tokens(user_id)",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Register a new user.
    ///
    /// Runs in one transaction; a `service_provider` registration also
    /// creates the provider's (initially empty) company record so
    /// provider routes work immediately after signup.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already in use or the insert fails.
    pub async fn register_user(&self, user: &User) -> Result<Uuid> {
        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(anyhow!("Email already in use by another user"));
        }

        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r"
            INSERT INTO users (id, name, email, password_hash, role, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.to_string())
        .bind(user.status.to_string())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await?;

        if user.role == UserRole::ServiceProvider {
            sqlx::query(
                r"
                INSERT INTO service_providers (id, user_id, company_name, service_types, created_at, updated_at)
                VALUES ($1, $2, $3, '[]', $4, $5)
                ",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(user.id.to_string())
            .bind(&user.name)
            .bind(user.created_at)
            .bind(user.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(user.id)
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_impl("email", email).await
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        self.get_user_impl("id", &user_id.to_string()).await
    }

    async fn get_user_impl(&self, field: &str, value: &str) -> Result<Option<User>> {
        let query = format!(
            r"
            SELECT id, name, email, password_hash, role, status,
                   phone, address, company_name, website, business_license, description,
                   created_at, updated_at
            FROM users WHERE {field} = $1
            "
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| Self::row_to_user(&row)).transpose()
    }

    /// Apply a partial profile update and return the new profile.
    ///
    /// Absent fields fold into `COALESCE`, so a partial update never
    /// clears a column.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update_user_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<User>> {
        let result = sqlx::query(
            r"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                company_name = COALESCE($6, company_name),
                website = COALESCE($7, website),
                business_license = COALESCE($8, business_license),
                description = COALESCE($9, description),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .bind(&update.name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(&update.address)
        .bind(&update.company_name)
        .bind(&update.website)
        .bind(&update.business_license)
        .bind(&update.description)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_user_by_id(user_id).await
    }

    /// List all users with their last successful login, newest first
    /// (admin oversight).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn admin_list_users(&self) -> Result<Vec<(User, Option<DateTime<Utc>>)>> {
        let rows = sqlx::query(
            r"
            SELECT u.id, u.name, u.email, u.password_hash, u.role, u.status,
                   u.phone, u.address, u.company_name, u.website, u.business_license, u.description,
                   u.created_at, u.updated_at,
                   (SELECT MAX(created_at) FROM security_events
                    WHERE type = 'login_success' AND message LIKE '%' || u.email || '%') AS last_login
            FROM users u
            ORDER BY u.created_at DESC
            ",
        )
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| {
                let user = Self::row_to_user(row)?;
                let last_login: Option<DateTime<Utc>> = row.try_get("last_login")?;
                Ok((user, last_login))
            })
            .collect()
    }

    /// Admin update of account fields; absent fields are left alone
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn admin_update_user(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        role: Option<UserRole>,
        status: Option<UserStatus>,
    ) -> Result<Option<User>> {
        let result = sqlx::query(
            r"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                status = COALESCE($5, status),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .bind(name)
        .bind(email)
        .bind(role.map(|r| r.to_string()))
        .bind(status.map(|s| s.to_string()))
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_user_by_id(user_id).await
    }

    /// Delete a user account; cascades to provider records and
    /// configurations
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.to_string())
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace a user's password hash
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update_password(&self, user_id: Uuid, password_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1",
        )
        .bind(user_id.to_string())
        .bind(password_hash)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a password-reset token digest with its expiry
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_password_reset_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO password_reset_tokens (token_hash, user_id, expires_at, used)
            VALUES ($1, $2, $3, 0)
            ",
        )
        .bind(token_hash)
        .bind(user_id.to_string())
        .bind(expires_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Redeem a reset token: looks up the digest, rejects used or
    /// expired tokens, marks the token consumed, and returns the owning
    /// user. One transaction, so a token can never be redeemed twice.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn redeem_password_reset_token(&self, token_hash: &str) -> Result<Option<Uuid>> {
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query(
            r"
            SELECT user_id FROM password_reset_tokens
            WHERE token_hash = $1 AND used = 0 AND expires_at > $2
            ",
        )
        .bind(token_hash)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let user_id: String = row.try_get("user_id")?;

        sqlx::query("UPDATE password_reset_tokens SET used = 1 WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(Uuid::parse_str(&user_id)?))
    }

    /// Convert a database row to a `User` struct
    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        let id: String = row.try_get("id")?;
        let role: String = row.try_get("role")?;
        let status: String = row.try_get("status")?;

        Ok(User {
            id: Uuid::parse_str(&id)?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role: role.parse().map_err(|e: String| anyhow!(e))?,
            status: status.parse().map_err(|e: String| anyhow!(e))?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            company_name: row.try_get("company_name")?,
            website: row.try_get("website")?,
            business_license: row.try_get("business_license")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
