// ABOUTME: HTTP route handler modules
// ABOUTME: One module per route group; all are request -> SQL -> JSON envelope glue
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

//! HTTP route handlers.
//!
//! Handlers are thin: validate the body, call the storage layer (and the
//! tree model where a tree or selection is involved), and shape the
//! `{ "success": true, ... }` envelope. All failures surface through
//! [`crate::errors::AppError`].

/// Admin oversight dashboards
pub mod admin;

/// Registration, login, and password reset
pub mod auth;

/// Saved-configuration CRUD and lifecycle
pub mod configurations;

/// Measurement-unit cost catalog
pub mod glossary;

/// Liveness endpoint
pub mod health;

/// Provider dashboards and service authoring
pub mod provider;

/// Consumer-facing service tree fetch and estimation
pub mod services;

/// Consumer profile and dashboards
pub mod user;
