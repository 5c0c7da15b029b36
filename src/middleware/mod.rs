// ABOUTME: Request middleware module
// ABOUTME: Authentication extraction and role guards for route handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

//! Request middleware: authentication and role guards

/// Bearer-token authentication and role enforcement
pub mod auth;

pub use auth::{AuthMiddleware, AuthenticatedUser};
