// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Database Management
//!
//! SQLite storage for the ServiceFlow catalog server: users and
//! providers, services with their configuration trees, saved
//! configuration snapshots, password-reset tokens, and the
//! security-event log. Migrations are idempotent `CREATE TABLE IF NOT
//! EXISTS` statements run at startup.

mod configurations;
mod providers;
mod security;
mod services;
mod users;

pub use configurations::{ActiveServiceStatus, CatalogueEntry, ConfigurationWithService, RecentService};
pub use providers::{CompanyInfoUpdate, ProviderStats, ServiceTypeEntry};
pub use services::{AdminStats, ServiceOversight, ServiceListing};

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};

/// Database manager for catalog storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        // An in-memory database exists per connection; pin the pool to a
        // single persistent connection or each checkout would see a
        // fresh, unmigrated database.
        let pool = if connection_options.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(&connection_options)
                .await?
        } else {
            SqlitePool::connect(&connection_options).await?
        };

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&self.pool)
            .await?;

        self.migrate_users().await?;
        self.migrate_providers().await?;
        self.migrate_services().await?;
        self.migrate_configurations().await?;
        self.migrate_security().await?;

        Ok(())
    }
}
