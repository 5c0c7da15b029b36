// ABOUTME: Authentication middleware for request authentication and authorization
// ABOUTME: Handles JWT bearer tokens and role-based access checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

use axum::http::HeaderMap;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{AuthManager, JwtValidationError};
use crate::errors::{AppError, AppResult};
use crate::models::UserRole;

/// Identity extracted from a validated token.
///
/// Carries everything route handlers need without a database round trip;
/// the token is self-contained.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Authenticated user id
    pub user_id: Uuid,
    /// Account email
    pub email: String,
    /// Account role from the token
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Enforce that the authenticated role matches `required`.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` when the roles differ.
    pub fn require_role(&self, required: UserRole) -> AppResult<()> {
        if self.role == required {
            Ok(())
        } else {
            warn!(
                user_id = %self.user_id,
                have = %self.role,
                need = %required,
                "role check failed"
            );
            Err(AppError::permission_denied(format!(
                "Access denied: {required} role required"
            )))
        }
    }
}

/// Middleware for bearer-token authentication
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: AuthManager,
}

impl AuthMiddleware {
    /// Create new auth middleware around a token manager
    #[must_use]
    pub const fn new(auth_manager: AuthManager) -> Self {
        Self { auth_manager }
    }

    /// Authenticate a request from its headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the `Authorization` header is missing or is
    /// not a valid `Bearer` token.
    pub fn authenticate_request(&self, headers: &HeaderMap) -> AppResult<AuthenticatedUser> {
        let auth_header = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(AppError::auth_required)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::auth_invalid("Authorization header must be a Bearer token"))?;

        let claims = self.auth_manager.validate_token(token).map_err(|e| {
            debug!("token validation failed: {e}");
            match e {
                JwtValidationError::TokenExpired { .. } => AppError::auth_expired(),
                JwtValidationError::TokenInvalid { .. }
                | JwtValidationError::TokenMalformed { .. } => AppError::auth_invalid(e.to_string()),
            }
        })?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::auth_invalid("Token subject is not a valid user id"))?;

        Ok(AuthenticatedUser {
            user_id,
            email: claims.email,
            role: claims.role,
        })
    }

    /// Authenticate and additionally require a role in one step
    ///
    /// # Errors
    ///
    /// Returns an authentication error or `PermissionDenied`.
    pub fn authenticate_with_role(
        &self,
        headers: &HeaderMap,
        required: UserRole,
    ) -> AppResult<AuthenticatedUser> {
        let user = self.authenticate_request(headers)?;
        user.require_role(required)?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::generate_jwt_secret;
    use crate::models::User;
    use axum::http::HeaderValue;

    fn middleware() -> (AuthMiddleware, AuthManager) {
        let manager = AuthManager::new(generate_jwt_secret(), 24);
        (AuthMiddleware::new(manager.clone()), manager)
    }

    fn headers_with_token(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn missing_header_is_auth_required() {
        let (mw, _) = middleware();
        let err = mw.authenticate_request(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.http_status(), 401);
    }

    #[test]
    fn bearer_token_authenticates() {
        let (mw, manager) = middleware();
        let user = User::new(
            "Provider".into(),
            "provider@example.com".into(),
            "hash".into(),
            UserRole::ServiceProvider,
        );
        let token = manager.generate_token(&user).unwrap();

        let auth = mw.authenticate_request(&headers_with_token(&token)).unwrap();
        assert_eq!(auth.user_id, user.id);
        assert_eq!(auth.role, UserRole::ServiceProvider);

        assert!(auth.require_role(UserRole::ServiceProvider).is_ok());
        let err = auth.require_role(UserRole::Admin).unwrap_err();
        assert_eq!(err.http_status(), 403);
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let (mw, _) = middleware();
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic Zm9vOmJhcg=="));
        assert!(mw.authenticate_request(&headers).is_err());
    }
}
