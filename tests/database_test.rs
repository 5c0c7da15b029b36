// ABOUTME: Integration tests for the storage layer
// ABOUTME: User registration, profile updates, services, providers, and reset tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, Utc};
use serviceflow_server::{
    auth::{generate_reset_token, hash_reset_token},
    database::CompanyInfoUpdate,
    models::{ProfileUpdate, SecuritySeverity, UserRole, UserStatus},
    tree::samples,
};

#[tokio::test]
async fn file_backed_database_is_created_on_demand() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}/serviceflow.db", dir.path().display());

    let db = serviceflow_server::database::Database::new(&url).await.unwrap();
    let user = common::create_user(&db, "ondisk@example.com", UserRole::Consumer).await;

    // Reopen the same file; the row must still be there.
    drop(db);
    let db = serviceflow_server::database::Database::new(&url).await.unwrap();
    let loaded = db.get_user_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(loaded.email, "ondisk@example.com");
}

#[tokio::test]
async fn register_and_fetch_user() {
    let db = common::test_database().await;
    let user = common::create_user(&db, "alice@example.com", UserRole::Consumer).await;

    let by_email = db
        .get_user_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, user.id);
    assert_eq!(by_email.role, UserRole::Consumer);
    assert_eq!(by_email.status, UserStatus::Active);

    let by_id = db.get_user_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "alice@example.com");

    assert!(db.get_user_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let db = common::test_database().await;
    common::create_user(&db, "dup@example.com", UserRole::Consumer).await;

    let again = serviceflow_server::models::User::new(
        "Dup".into(),
        "dup@example.com".into(),
        "hash".into(),
        UserRole::Consumer,
    );
    assert!(db.register_user(&again).await.is_err());
}

#[tokio::test]
async fn provider_signup_creates_company_record() {
    let db = common::test_database().await;
    let (user, provider_id) = common::create_provider(&db, "acme@example.com").await;

    let provider = db.get_provider_by_user_id(user.id).await.unwrap().unwrap();
    assert_eq!(provider.id, provider_id);
    assert!(provider.service_types.is_empty());

    // Consumers do not get one.
    let consumer = common::create_user(&db, "plain@example.com", UserRole::Consumer).await;
    assert!(db.get_provider_by_user_id(consumer.id).await.unwrap().is_none());
}

#[tokio::test]
async fn partial_profile_update_keeps_other_fields() {
    let db = common::test_database().await;
    let user = common::create_user(&db, "profile@example.com", UserRole::Consumer).await;

    let first = ProfileUpdate {
        phone: Some("+91 98765 43210".into()),
        address: Some("42 Catalog Street".into()),
        ..ProfileUpdate::default()
    };
    let updated = db.update_user_profile(user.id, &first).await.unwrap().unwrap();
    assert_eq!(updated.phone.as_deref(), Some("+91 98765 43210"));

    // A second update touching one field must not clear the others.
    let second = ProfileUpdate {
        website: Some("https://example.com".into()),
        ..ProfileUpdate::default()
    };
    let updated = db.update_user_profile(user.id, &second).await.unwrap().unwrap();
    assert_eq!(updated.phone.as_deref(), Some("+91 98765 43210"));
    assert_eq!(updated.address.as_deref(), Some("42 Catalog Street"));
    assert_eq!(updated.website.as_deref(), Some("https://example.com"));
}

#[tokio::test]
async fn company_info_update_and_service_types() {
    let db = common::test_database().await;
    let (user, _) = common::create_provider(&db, "info@example.com").await;

    let update = CompanyInfoUpdate {
        company_name: Some("Acme Connectivity".into()),
        website: Some("https://acme.example".into()),
        service_types: Some(vec!["broadband".into(), "business".into()]),
        ..CompanyInfoUpdate::default()
    };
    assert!(db.update_company_info(user.id, &update).await.unwrap());

    let provider = db.get_provider_by_user_id(user.id).await.unwrap().unwrap();
    assert_eq!(provider.company_name, "Acme Connectivity");
    assert_eq!(provider.service_types, vec!["broadband", "business"]);

    let types = db.list_service_types().await.unwrap();
    assert!(types.iter().any(|t| t.name == "broadband"));
}

#[tokio::test]
async fn service_tree_round_trips_and_listings_work() {
    let db = common::test_database().await;
    let (_, provider_id) = common::create_provider(&db, "svc@example.com").await;
    let service = common::seed_broadband_service(&db, provider_id).await;

    let loaded = db.get_service(service.id).await.unwrap().unwrap();
    assert_eq!(loaded.tree, service.tree);
    assert_eq!(loaded.status, service.status);

    let listings = db.list_active_services().await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].name, "Broadband Internet Service");

    let own = db.list_services_by_provider(provider_id).await.unwrap();
    assert_eq!(own.len(), 1);

    let overview = db.admin_service_overview().await.unwrap();
    assert_eq!(overview.len(), 1);
    assert_eq!(overview[0].revenue, "0.00");
}

#[tokio::test]
async fn wholesale_tree_overwrite_replaces_structure() {
    let db = common::test_database().await;
    let (_, provider_id) = common::create_provider(&db, "edit@example.com").await;
    let mut service = common::seed_broadband_service(&db, provider_id).await;

    service.tree = samples::business_tree();
    service.name = "Business Package".into();
    assert!(db.update_service(&service).await.unwrap());

    let loaded = db.get_service(service.id).await.unwrap().unwrap();
    assert_eq!(loaded.name, "Business Package");
    assert!(loaded.tree.get("dedicated").is_some());
    assert!(loaded.tree.get("fiber_100").is_none());
}

#[tokio::test]
async fn admin_user_management() {
    let db = common::test_database().await;
    let user = common::create_user(&db, "managed@example.com", UserRole::Consumer).await;

    let updated = db
        .admin_update_user(
            user.id,
            Some("Renamed"),
            None,
            Some(UserRole::ServiceProvider),
            Some(UserStatus::Inactive),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.role, UserRole::ServiceProvider);
    assert_eq!(updated.status, UserStatus::Inactive);
    assert_eq!(updated.email, "managed@example.com");

    assert!(db.delete_user(user.id).await.unwrap());
    assert!(!db.delete_user(user.id).await.unwrap());
    assert!(db.get_user_by_id(user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn admin_stats_count_the_system() {
    let db = common::test_database().await;
    common::create_user(&db, "count1@example.com", UserRole::Consumer).await;
    let (_, provider_id) = common::create_provider(&db, "count2@example.com").await;
    common::seed_broadband_service(&db, provider_id).await;

    let stats = db.admin_stats().await.unwrap();
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.total_services, 1);
    assert_eq!(stats.active_configurations, 0);
}

#[tokio::test]
async fn security_events_feed_newest_first() {
    let db = common::test_database().await;
    db.record_security_event("login_failure", "Failed login attempt for x@example.com", SecuritySeverity::Warning)
        .await
        .unwrap();
    db.record_security_event("login_success", "Successful login for x@example.com", SecuritySeverity::Info)
        .await
        .unwrap();

    let events = db.recent_security_events(50).await.unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().any(|e| e.event_type == "login_failure"));
    assert!(events.iter().any(|e| e.event_type == "login_success"));
}

#[tokio::test]
async fn reset_tokens_redeem_exactly_once() {
    let db = common::test_database().await;
    let user = common::create_user(&db, "reset@example.com", UserRole::Consumer).await;

    let (token, digest) = generate_reset_token();
    db.create_password_reset_token(user.id, &digest, Utc::now() + Duration::minutes(60))
        .await
        .unwrap();

    let redeemed = db
        .redeem_password_reset_token(&hash_reset_token(&token))
        .await
        .unwrap();
    assert_eq!(redeemed, Some(user.id));

    // Second redemption fails.
    assert!(db
        .redeem_password_reset_token(&hash_reset_token(&token))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn expired_reset_tokens_are_rejected() {
    let db = common::test_database().await;
    let user = common::create_user(&db, "late@example.com", UserRole::Consumer).await;

    let (token, digest) = generate_reset_token();
    db.create_password_reset_token(user.id, &digest, Utc::now() - Duration::minutes(5))
        .await
        .unwrap();

    assert!(db
        .redeem_password_reset_token(&hash_reset_token(&token))
        .await
        .unwrap()
        .is_none());

    // An unknown token never redeems.
    assert!(db
        .redeem_password_reset_token(&hash_reset_token("bogus"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn deleting_a_user_cascades_to_their_data() {
    let db = common::test_database().await;
    let (user, provider_id) = common::create_provider(&db, "cascade@example.com").await;
    let service = common::seed_broadband_service(&db, provider_id).await;

    assert!(db.delete_user(user.id).await.unwrap());
    assert!(db.get_provider_by_user_id(user.id).await.unwrap().is_none());
    assert!(db.get_service(service.id).await.unwrap().is_none());
}
