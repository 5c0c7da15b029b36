// ABOUTME: Application constants and configuration values organized by domain
// ABOUTME: Single source for default prices, limits, and service identity strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

//! Application constants organized by domain.

/// Service identity strings used in logging and token audiences
pub mod service_names {
    /// Canonical service name
    pub const SERVICEFLOW_SERVER: &str = "serviceflow-server";

    /// Audience claim for issued JWTs
    pub const API_AUDIENCE: &str = "serviceflow-api";
}

/// Operational limits and expiry windows
pub mod limits {
    /// Default JWT expiry for user sessions, in hours
    pub const USER_SESSION_EXPIRY_HOURS: i64 = 24;

    /// Password reset tokens expire after this many minutes
    pub const RESET_TOKEN_EXPIRY_MINUTES: i64 = 60;

    /// Length of generated password reset tokens (alphanumeric chars)
    pub const RESET_TOKEN_LENGTH: usize = 48;

    /// Minimum accepted password length
    pub const MIN_PASSWORD_LENGTH: usize = 8;

    /// Depth bound for tree traversal; deeper input is rejected as malformed
    pub const MAX_TREE_DEPTH: usize = 64;

    /// Maximum security events returned by the admin feed
    pub const SECURITY_EVENT_FEED_LIMIT: i64 = 50;

    /// Maximum rows in "recent" dashboard listings
    pub const RECENT_LISTING_LIMIT: i64 = 10;
}

/// Default per-unit prices for the measurement-unit cost catalog.
///
/// The catalog is advisory: units missing from it price at zero rather
/// than failing an estimate. Overridable at startup via
/// `UNIT_COST_OVERRIDES`.
pub mod unit_costs {
    /// Unit name/price pairs installed into the default cost table
    pub const DEFAULTS: &[(&str, f64)] = &[
        ("Mbps", 10.0),
        ("GB", 5.0),
        ("month", 500.0),
        ("year", 5000.0),
        ("installation", 1000.0),
        ("setup", 500.0),
        ("support", 200.0),
        ("maintenance", 300.0),
    ];
}

/// Standard error message fragments reused across route handlers
pub mod error_messages {
    /// Registration/login email failed the format check
    pub const INVALID_EMAIL_FORMAT: &str = "Invalid email format";

    /// Password shorter than the accepted minimum
    pub const PASSWORD_TOO_WEAK: &str = "Password must be at least 8 characters";

    /// Duplicate registration attempt
    pub const USER_ALREADY_EXISTS: &str = "A user with this email already exists";

    /// Login failed; deliberately does not say which credential was wrong
    pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

    /// Login role selector does not match the account role
    pub const INVALID_ROLE_SELECTION: &str = "Invalid role selection";
}
