// ABOUTME: Main library entry point for the ServiceFlow catalog backend
// ABOUTME: Provides REST APIs for service trees, cost estimation, and saved configurations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

#![deny(unsafe_code)]

//! # ServiceFlow Catalog Server
//!
//! A multi-tenant service-catalog backend. Providers publish configurable
//! "service trees" (hierarchical option catalogs with pricing units),
//! consumers browse and configure them, and admins get oversight dashboards.
//!
//! ## Architecture
//!
//! The server follows a modular architecture:
//! - **Tree**: the configuration tree model — validator, cost estimator,
//!   and path resolver (pure functions, no I/O)
//! - **Database**: SQLite storage for users, providers, services, and
//!   saved configurations
//! - **Routes**: REST handlers that glue requests to SQL and shape the
//!   JSON envelope
//! - **Auth**: JWT-based authentication with role guards
//! - **Config**: environment-based configuration management

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by binary crates (src/bin/) and integration tests.

/// Authentication: JWT tokens, password hashing, reset tokens
pub mod auth;

/// Environment-based configuration management
pub mod config;

/// Application constants organized by domain
pub mod constants;

/// SQLite storage layer
pub mod database;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Production logging configuration
pub mod logging;

/// Request authentication middleware and role guards
pub mod middleware;

/// Core domain models
pub mod models;

/// HTTP route handlers
pub mod routes;

/// Server resources and router assembly
pub mod server;

/// Configuration tree model: validation, cost estimation, path resolution
pub mod tree;
