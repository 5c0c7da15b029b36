// ABOUTME: Shared helpers for integration tests
// ABOUTME: In-memory database setup and fixture users, providers, and services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs, dead_code)]

use chrono::Utc;
use serviceflow_server::{
    auth::{generate_jwt_secret, hash_password, AuthManager},
    database::Database,
    models::{Service, ServiceStatus, User, UserRole},
    tree::{samples, Tree},
};
use uuid::Uuid;

/// Password used for all fixture accounts
pub const TEST_PASSWORD: &str = "CorrectHorse9!";

/// Fresh in-memory database with migrations applied
pub async fn test_database() -> Database {
    Database::new("sqlite::memory:").await.unwrap()
}

/// Auth manager with a random secret and a 24h expiry
pub fn test_auth_manager() -> AuthManager {
    AuthManager::new(generate_jwt_secret(), 24)
}

/// Register a fixture user with the given role and return it
pub async fn create_user(database: &Database, email: &str, role: UserRole) -> User {
    let user = User::new(
        format!("Test {role}"),
        email.to_owned(),
        hash_password(TEST_PASSWORD).unwrap(),
        role,
    );
    database.register_user(&user).await.unwrap();
    user
}

/// Register a provider user and return (user, provider id)
pub async fn create_provider(database: &Database, email: &str) -> (User, Uuid) {
    let user = create_user(database, email, UserRole::ServiceProvider).await;
    let provider = database
        .get_provider_by_user_id(user.id)
        .await
        .unwrap()
        .expect("provider record created on signup");
    (user, provider.id)
}

/// Build an active service owned by `provider_id` carrying `tree`
pub fn service_with_tree(provider_id: Uuid, tree: Tree) -> Service {
    let now = Utc::now();
    Service {
        id: Uuid::new_v4(),
        provider_id,
        name: "Broadband Internet Service".to_owned(),
        description: "High-speed internet service".to_owned(),
        service_type: "broadband".to_owned(),
        status: ServiceStatus::Active,
        tree,
        diagram: None,
        documents: vec![],
        users_count: 0,
        revenue: 0.0,
        created_at: now,
        updated_at: now,
    }
}

/// Create and persist an active broadband service, returning it
pub async fn seed_broadband_service(database: &Database, provider_id: Uuid) -> Service {
    let service = service_with_tree(provider_id, samples::broadband_tree());
    database.create_service(&service).await.unwrap();
    service
}
