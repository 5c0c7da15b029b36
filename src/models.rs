// ABOUTME: Core data models for the ServiceFlow catalog backend
// ABOUTME: Users, providers, services, saved configurations, and security events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

//! # Data Models
//!
//! Core data structures shared by the storage layer and the route
//! handlers.
//!
//! ## Design Principles
//!
//! - **Serializable**: models support JSON serialization for the REST
//!   envelope and for the JSON columns (tree, snapshot, documents)
//! - **Type safe**: roles and statuses are enums with explicit parsing,
//!   never raw strings
//! - **Snapshot semantics**: a saved configuration embeds its selections
//!   and computed total at save time and is never recomputed when the
//!   source tree changes

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tree::Selection;

/// Account role; decides which route groups a token may reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Browses catalogs and saves configurations
    Consumer,
    /// Publishes services and their configuration trees
    ServiceProvider,
    /// Oversight dashboards and user management
    Admin,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Consumer => write!(f, "consumer"),
            Self::ServiceProvider => write!(f, "service_provider"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consumer" => Ok(Self::Consumer),
            "service_provider" => Ok(Self::ServiceProvider),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown user role: {other}")),
        }
    }
}

/// Account status as managed by admins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Normal account
    Active,
    /// Deactivated by an admin; login is refused
    Inactive,
}

impl Display for UserStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown user status: {other}")),
        }
    }
}

/// A registered account (consumer, provider, or admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email, unique across accounts
    pub email: String,
    /// Bcrypt password hash; never serialized to clients
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Account role
    pub role: UserRole,
    /// Account status
    pub status: UserStatus,
    /// Contact phone
    pub phone: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Company name (provider accounts)
    pub company_name: Option<String>,
    /// Company website (provider accounts)
    pub website: Option<String>,
    /// Business license reference (provider accounts)
    pub business_license: Option<String>,
    /// Free-form profile description
    pub description: Option<String>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// Last profile update
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new account with a fresh id and timestamps
    #[must_use]
    pub fn new(name: String, email: String, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
            status: UserStatus::Active,
            phone: None,
            address: None,
            company_name: None,
            website: None,
            business_license: None,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Optional profile fields accepted by the profile-update endpoints.
///
/// Only fields that are present are written; the storage layer folds the
/// rest into `COALESCE` so a partial update never clears a column.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name
    pub name: Option<String>,
    /// New email
    pub email: Option<String>,
    /// New phone
    pub phone: Option<String>,
    /// New address
    pub address: Option<String>,
    /// New company name
    pub company_name: Option<String>,
    /// New website
    pub website: Option<String>,
    /// New business license
    pub business_license: Option<String>,
    /// New description
    pub description: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update carries at least one field
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.company_name.is_none()
            && self.website.is_none()
            && self.business_license.is_none()
            && self.description.is_none()
    }
}

/// A provider's company record, owned by one `service_provider` user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceProvider {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user account
    pub user_id: Uuid,
    /// Company display name
    pub company_name: String,
    /// Company website
    pub website: Option<String>,
    /// Business license reference
    pub business_license: Option<String>,
    /// Service categories the provider operates in
    pub service_types: Vec<String>,
    /// Company description
    pub description: Option<String>,
    /// Logo URL
    pub logo_url: Option<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// Last update
    pub updated_at: DateTime<Utc>,
}

/// Publication status of a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// Being authored; not offered to consumers
    Draft,
    /// Offered to consumers
    Active,
    /// Withdrawn
    Inactive,
}

impl Display for ServiceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

impl FromStr for ServiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown service status: {other}")),
        }
    }
}

/// Metadata reference to an uploaded document.
///
/// Blob storage is an external collaborator; only name and location are
/// recorded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    /// Display name
    pub name: String,
    /// Location in the external store
    pub url: String,
}

/// A published service owning exactly one current configuration tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier
    pub id: Uuid,
    /// Owning provider
    pub provider_id: Uuid,
    /// Service display name
    pub name: String,
    /// Service description
    pub description: String,
    /// Category (e.g. "broadband", "business")
    pub service_type: String,
    /// Publication status
    pub status: ServiceStatus,
    /// The current configuration tree; overwritten wholesale on edit
    pub tree: crate::tree::Tree,
    /// Optional rendered diagram payload (opaque to the server)
    pub diagram: Option<serde_json::Value>,
    /// Attached document references
    pub documents: Vec<DocumentRef>,
    /// Consumers with configurations against this service
    pub users_count: i64,
    /// Accumulated revenue for dashboards
    pub revenue: f64,
    /// When the service was created
    pub created_at: DateTime<Utc>,
    /// Last edit
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle status of a saved configuration.
///
/// The machine is `draft → saved → active`, with `saved → draft` (edit)
/// and deletion from `saved`/`active` as the only other moves. A
/// configuration must pass through `saved` before it may be marked
/// `active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigurationStatus {
    /// Being assembled; not yet an explicit named save
    Draft,
    /// Explicitly persisted as a named configuration
    Saved,
    /// Consumed/activated by the surrounding system
    Active,
}

impl ConfigurationStatus {
    /// Whether the machine permits moving from `self` to `next`
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Saved) | (Self::Saved, Self::Active) | (Self::Saved, Self::Draft)
        )
    }

    /// Whether content edits are allowed in this status.
    ///
    /// Active configurations are frozen; the owner must transition back
    /// through `saved` first.
    #[must_use]
    pub const fn allows_content_updates(self) -> bool {
        matches!(self, Self::Draft | Self::Saved)
    }
}

impl Display for ConfigurationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Saved => write!(f, "saved"),
            Self::Active => write!(f, "active"),
        }
    }
}

impl FromStr for ConfigurationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "saved" => Ok(Self::Saved),
            "active" => Ok(Self::Active),
            other => Err(format!("unknown configuration status: {other}")),
        }
    }
}

/// The immutable payload persisted for a saved configuration.
///
/// Decoupled from the source tree: editing the tree after a save never
/// alters this snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSnapshot {
    /// Selections made by the consumer
    pub selected_nodes: Vec<Selection>,
    /// Root-to-node walk the consumer took
    #[serde(default)]
    pub selected_path: Vec<String>,
    /// Total computed by the estimator at save time
    pub total_estimate: f64,
    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,
}

/// A consumer's persisted configuration of one service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedConfiguration {
    /// Unique identifier
    pub id: Uuid,
    /// Owning consumer
    pub user_id: Uuid,
    /// Configured service
    pub service_id: Uuid,
    /// Human-readable name chosen by the owner
    pub name: String,
    /// Immutable selection snapshot
    pub snapshot: ConfigurationSnapshot,
    /// Completion percentage for dashboard display (0-100)
    pub progress: i64,
    /// Lifecycle status
    pub status: ConfigurationStatus,
    /// When the configuration was first saved
    pub created_at: DateTime<Utc>,
    /// Last owner edit
    pub updated_at: DateTime<Utc>,
}

/// Severity of a recorded security event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecuritySeverity {
    /// Routine event
    Info,
    /// Worth attention
    Warning,
    /// Requires action
    Critical,
}

impl Display for SecuritySeverity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for SecuritySeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// One row in the security-event log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    /// Unique identifier
    pub id: Uuid,
    /// Event type tag (e.g. `login_success`, `login_failure`)
    pub event_type: String,
    /// Human-readable message
    pub message: String,
    /// Severity
    pub severity: SecuritySeverity,
    /// When the event occurred
    pub created_at: DateTime<Utc>,
}

/// Dashboard stat card shared by the provider and admin stats endpoints
#[derive(Debug, Clone, Serialize)]
pub struct StatCard {
    /// Card label
    pub label: String,
    /// Formatted value
    pub value: String,
    /// Change indicator (reserved; the current system reports "+0")
    pub change: String,
    /// Trend indicator (reserved; the current system reports "stable")
    pub trend: String,
}

impl StatCard {
    /// A card with the placeholder change/trend the dashboards expect
    #[must_use]
    pub fn stable(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            change: "+0".to_owned(),
            trend: "stable".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [UserRole::Consumer, UserRole::ServiceProvider, UserRole::Admin] {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn configuration_status_machine() {
        use ConfigurationStatus::{Active, Draft, Saved};

        assert!(Draft.can_transition_to(Saved));
        assert!(Saved.can_transition_to(Active));
        assert!(Saved.can_transition_to(Draft));

        // Skipping the explicit save is disallowed.
        assert!(!Draft.can_transition_to(Active));
        assert!(!Active.can_transition_to(Draft));
        assert!(!Active.can_transition_to(Saved));
        assert!(!Saved.can_transition_to(Saved));
    }

    #[test]
    fn active_configurations_are_frozen() {
        assert!(ConfigurationStatus::Draft.allows_content_updates());
        assert!(ConfigurationStatus::Saved.allows_content_updates());
        assert!(!ConfigurationStatus::Active.allows_content_updates());
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User::new(
            "Test".into(),
            "test@example.com".into(),
            "hash".into(),
            UserRole::Consumer,
        );
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("hash"));
    }

    #[test]
    fn snapshot_wire_shape_is_camel_case() {
        let snapshot = ConfigurationSnapshot {
            selected_nodes: vec![],
            selected_path: vec!["root".into()],
            total_estimate: 1000.0,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("selectedNodes"));
        assert!(json.contains("selectedPath"));
        assert!(json.contains("totalEstimate"));
    }
}
