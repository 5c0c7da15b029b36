// ABOUTME: Authentication route handlers for registration, login, and password reset
// ABOUTME: Issues JWTs, verifies credentials, and records security events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

//! Authentication routes for account management.
//!
//! Login failures and successes are appended to the security-event log;
//! the admin dashboard reads that log for its activity feed.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{
    generate_reset_token, hash_password, hash_reset_token, verify_password,
};
use crate::constants::{error_messages, limits};
use crate::errors::{AppError, AppResult};
use crate::models::{SecuritySeverity, User, UserRole, UserStatus};
use crate::server::ServerResources;

/// User registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Plaintext password (hashed before storage)
    pub password: String,
    /// Requested role
    pub role: String,
}

/// User info for auth responses
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User id
    pub id: String,
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Account role
    pub role: UserRole,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Plaintext password
    pub password: String,
    /// Role the client is logging in as; must match the account
    pub role: String,
}

/// User login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Envelope flag
    pub success: bool,
    /// Issued bearer token
    pub token: String,
    /// Token expiry, RFC 3339
    pub expires_at: String,
    /// Authenticated account
    pub user: UserInfo,
}

/// Password reset request (step one)
#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    /// Account email
    pub email: String,
}

/// Password reset confirmation (step two)
#[derive(Debug, Deserialize)]
pub struct ResetConfirmRequest {
    /// The token issued in step one
    pub token: String,
    /// Replacement password
    pub new_password: String,
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/signup", post(Self::handle_signup))
            .route("/login", post(Self::handle_login))
            .route("/validate", post(Self::handle_validate))
            .route("/password-reset/request", post(Self::handle_reset_request))
            .route("/password-reset/confirm", post(Self::handle_reset_confirm))
            .with_state(resources)
    }

    /// Validate email format (same plain checks the rest of the platform
    /// uses; full RFC validation is not the goal)
    #[must_use]
    pub fn is_valid_email(email: &str) -> bool {
        if email.len() <= 5 {
            return false;
        }
        let Some(at_pos) = email.find('@') else {
            return false;
        };
        if at_pos == 0 || at_pos == email.len() - 1 {
            return false;
        }
        let domain_part = &email[at_pos + 1..];
        domain_part.contains('.')
    }

    /// Validate password strength
    #[must_use]
    pub const fn is_valid_password(password: &str) -> bool {
        password.len() >= limits::MIN_PASSWORD_LENGTH
    }

    /// Handle user registration
    async fn handle_signup(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> AppResult<impl IntoResponse> {
        info!("registration attempt for email: {}", request.email);

        if !Self::is_valid_email(&request.email) {
            return Err(AppError::invalid_input(error_messages::INVALID_EMAIL_FORMAT));
        }
        if !Self::is_valid_password(&request.password) {
            return Err(AppError::invalid_input(error_messages::PASSWORD_TOO_WEAK));
        }
        let role = UserRole::from_str(&request.role).map_err(AppError::invalid_input)?;

        if resources
            .database
            .get_user_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AppError::new(
                crate::errors::ErrorCode::ResourceAlreadyExists,
                error_messages::USER_ALREADY_EXISTS,
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(request.name, request.email, password_hash, role);
        resources.database.register_user(&user).await?;

        info!("registered user {} as {}", user.id, user.role);

        Ok((
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "user": UserInfo {
                    id: user.id.to_string(),
                    name: user.name,
                    email: user.email,
                    role: user.role,
                },
            })),
        ))
    }

    /// Handle user login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> AppResult<impl IntoResponse> {
        let user = resources.database.get_user_by_email(&request.email).await?;

        let Some(user) = user else {
            Self::record_login_failure(&resources, &request.email).await;
            return Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS));
        };

        if !verify_password(&request.password, &user.password_hash)? {
            Self::record_login_failure(&resources, &request.email).await;
            return Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS));
        }

        if user.status != UserStatus::Active {
            Self::record_login_failure(&resources, &request.email).await;
            return Err(AppError::permission_denied("Account is deactivated"));
        }

        let requested_role = UserRole::from_str(&request.role).map_err(AppError::invalid_input)?;
        if user.role != requested_role {
            return Err(AppError::permission_denied(
                error_messages::INVALID_ROLE_SELECTION,
            ));
        }

        let token = resources.auth_manager.generate_token(&user)?;
        let expires_at = resources.auth_manager.token_expiry().to_rfc3339();

        if let Err(e) = resources
            .database
            .record_security_event(
                "login_success",
                &format!("Successful login for {}", user.email),
                SecuritySeverity::Info,
            )
            .await
        {
            warn!("failed to record login event: {e}");
        }

        Ok(Json(LoginResponse {
            success: true,
            token,
            expires_at,
            user: UserInfo {
                id: user.id.to_string(),
                name: user.name,
                email: user.email,
                role: user.role,
            },
        }))
    }

    /// Confirm a presented token is still valid
    async fn handle_validate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        let user = resources.auth_middleware.authenticate_request(&headers)?;
        Ok(Json(serde_json::json!({
            "success": true,
            "valid": true,
            "userId": user.user_id.to_string(),
            "role": user.role,
        })))
    }

    /// Begin a password reset: issue a one-time token.
    ///
    /// The response is identical whether or not the email exists, so the
    /// endpoint cannot be used to probe for accounts. Delivery of the
    /// token is an external concern; in this deployment it is returned
    /// in the response body.
    async fn handle_reset_request(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ResetRequest>,
    ) -> AppResult<impl IntoResponse> {
        let user = resources.database.get_user_by_email(&request.email).await?;

        let token = if let Some(user) = user {
            let (token, digest) = generate_reset_token();
            let expires_at = Utc::now() + Duration::minutes(limits::RESET_TOKEN_EXPIRY_MINUTES);
            resources
                .database
                .create_password_reset_token(user.id, &digest, expires_at)
                .await?;

            if let Err(e) = resources
                .database
                .record_security_event(
                    "password_reset_requested",
                    &format!("Password reset requested for {}", user.email),
                    SecuritySeverity::Warning,
                )
                .await
            {
                warn!("failed to record reset event: {e}");
            }

            Some(token)
        } else {
            None
        };

        Ok(Json(serde_json::json!({
            "success": true,
            "message": "If the account exists, a reset token has been issued",
            "token": token,
        })))
    }

    /// Complete a password reset with the issued token
    async fn handle_reset_confirm(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ResetConfirmRequest>,
    ) -> AppResult<impl IntoResponse> {
        if !Self::is_valid_password(&request.new_password) {
            return Err(AppError::invalid_input(error_messages::PASSWORD_TOO_WEAK));
        }

        let digest = hash_reset_token(&request.token);
        let user_id = resources
            .database
            .redeem_password_reset_token(&digest)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Reset token is invalid, used, or expired"))?;

        let password_hash = hash_password(&request.new_password)?;
        resources
            .database
            .update_password(user_id, &password_hash)
            .await?;

        info!("password reset completed for user {user_id}");

        Ok(Json(serde_json::json!({
            "success": true,
            "message": "Password updated",
        })))
    }

    async fn record_login_failure(resources: &Arc<ServerResources>, email: &str) {
        if let Err(e) = resources
            .database
            .record_security_event(
                "login_failure",
                &format!("Failed login attempt for {email}"),
                SecuritySeverity::Warning,
            )
            .await
        {
            warn!("failed to record login failure: {e}");
        }
    }
}
