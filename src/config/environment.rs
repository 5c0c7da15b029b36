// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration management for production deployment

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::limits;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    Warn,
    /// Standard operational logging
    #[default]
    Info,
    /// Verbose debugging
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Environment type for security and logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development; relaxed secrets
    #[default]
    Development,
    /// Production; secrets are mandatory
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from a `sqlite:` URL string
    ///
    /// # Errors
    ///
    /// Returns an error for URL schemes other than `sqlite:`.
    pub fn parse_url(s: &str) -> Result<Self> {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            if path_str == ":memory:" {
                Ok(Self::Memory)
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            }
        } else {
            Err(anyhow!("unsupported database URL (expected sqlite:): {s}"))
        }
    }

    /// Render back to a connection string for sqlx
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Where the data lives
    pub url: DatabaseUrl,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for issued JWTs
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub token_expiry_hours: i64,
}

/// Complete server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Database settings
    pub database: DatabaseConfig,
    /// Auth settings
    pub auth: AuthConfig,
    /// Per-unit price overrides applied on top of the default catalog
    pub unit_cost_overrides: HashMap<String, f64>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Recognized variables: `HTTP_PORT`, `ENVIRONMENT`, `LOG_LEVEL`,
    /// `DATABASE_URL`, `JWT_SECRET`, `TOKEN_EXPIRY_HOURS`,
    /// `UNIT_COST_OVERRIDES` (JSON object of unit→price).
    ///
    /// # Errors
    ///
    /// Returns an error if a variable fails to parse, or if `JWT_SECRET`
    /// is missing in a production environment.
    pub fn from_env() -> Result<Self> {
        let http_port = env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8081".into())
            .parse::<u16>()
            .context("Invalid HTTP_PORT")?;

        let environment =
            Environment::from_str_or_default(&env::var("ENVIRONMENT").unwrap_or_default());

        let log_level = LogLevel::from_str_or_default(&env::var("LOG_LEVEL").unwrap_or_default());

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/serviceflow.db".into());
        let database = DatabaseConfig {
            url: DatabaseUrl::parse_url(&database_url)?,
        };

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment.is_production() => {
                return Err(anyhow!("JWT_SECRET is required in production"));
            }
            _ => {
                warn!("JWT_SECRET not set; using a generated development secret");
                crate::auth::generate_jwt_secret()
            }
        };

        let token_expiry_hours = env::var("TOKEN_EXPIRY_HOURS")
            .ok()
            .map_or(Ok(limits::USER_SESSION_EXPIRY_HOURS), |raw| {
                raw.parse::<i64>().context("Invalid TOKEN_EXPIRY_HOURS")
            })?;

        let unit_cost_overrides = match env::var("UNIT_COST_OVERRIDES") {
            Ok(raw) if !raw.is_empty() => serde_json::from_str::<HashMap<String, f64>>(&raw)
                .context("UNIT_COST_OVERRIDES must be a JSON object of unit name to price")?,
            _ => HashMap::new(),
        };

        Ok(Self {
            http_port,
            environment,
            log_level,
            database,
            auth: AuthConfig {
                jwt_secret,
                token_expiry_hours,
            },
            unit_cost_overrides,
        })
    }

    /// One-line summary for startup logging; never includes secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "env={} port={} db={} log={} overrides={}",
            self.environment,
            self.http_port,
            self.database.url.to_connection_string(),
            self.log_level,
            self.unit_cost_overrides.len()
        )
    }
}
