// ABOUTME: Integration tests for authentication
// ABOUTME: Token issue/validate, middleware extraction, and role guards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::http::{HeaderMap, HeaderValue};
use chrono::Utc;
use serviceflow_server::{
    auth::{generate_jwt_secret, verify_password, AuthManager},
    middleware::AuthMiddleware,
    models::{User, UserRole},
};

fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "authorization",
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    headers
}

#[test]
fn token_round_trip_carries_identity_and_role() {
    let manager = common::test_auth_manager();
    let user = User::new(
        "Admin".into(),
        "admin@example.com".into(),
        "hash".into(),
        UserRole::Admin,
    );

    let token = manager.generate_token(&user).unwrap();
    let claims = manager.validate_token(&token).unwrap();

    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.email, "admin@example.com");
    assert_eq!(claims.role, UserRole::Admin);
    assert!(claims.exp > Utc::now().timestamp());
}

#[test]
fn middleware_rejects_foreign_and_missing_tokens() {
    let manager = common::test_auth_manager();
    let middleware = AuthMiddleware::new(manager);

    // No header at all.
    let err = middleware.authenticate_request(&HeaderMap::new()).unwrap_err();
    assert_eq!(err.http_status(), 401);

    // Token signed by a different secret.
    let foreign = AuthManager::new(generate_jwt_secret(), 24);
    let user = User::new(
        "Other".into(),
        "other@example.com".into(),
        "hash".into(),
        UserRole::Consumer,
    );
    let token = foreign.generate_token(&user).unwrap();
    assert!(middleware
        .authenticate_request(&bearer_headers(&token))
        .is_err());
}

#[test]
fn role_guard_separates_route_groups() {
    let manager = common::test_auth_manager();
    let middleware = AuthMiddleware::new(manager.clone());

    let consumer = User::new(
        "Consumer".into(),
        "consumer@example.com".into(),
        "hash".into(),
        UserRole::Consumer,
    );
    let token = manager.generate_token(&consumer).unwrap();
    let headers = bearer_headers(&token);

    // A consumer token passes plain authentication...
    assert!(middleware.authenticate_request(&headers).is_ok());

    // ...but is turned away from the admin and provider groups with 403.
    let err = middleware
        .authenticate_with_role(&headers, UserRole::Admin)
        .unwrap_err();
    assert_eq!(err.http_status(), 403);

    let err = middleware
        .authenticate_with_role(&headers, UserRole::ServiceProvider)
        .unwrap_err();
    assert_eq!(err.http_status(), 403);
}

#[test]
fn expired_token_maps_to_auth_expired() {
    let manager = AuthManager::new(generate_jwt_secret(), -2);
    let middleware = AuthMiddleware::new(manager.clone());

    let user = User::new(
        "Late".into(),
        "late@example.com".into(),
        "hash".into(),
        UserRole::Consumer,
    );
    let token = manager.generate_token(&user).unwrap();

    let err = middleware
        .authenticate_request(&bearer_headers(&token))
        .unwrap_err();
    assert_eq!(err.http_status(), 403);
}

#[tokio::test]
async fn stored_password_hashes_verify() {
    let db = common::test_database().await;
    let user = common::create_user(&db, "hasher@example.com", UserRole::Consumer).await;

    let stored = db.get_user_by_id(user.id).await.unwrap().unwrap();
    assert!(verify_password(common::TEST_PASSWORD, &stored.password_hash).unwrap());
    assert!(!verify_password("wrong-password", &stored.password_hash).unwrap());
}
