// ABOUTME: Configuration management module
// ABOUTME: Environment-based server configuration with typed values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

//! Configuration management and persistence

/// Environment-variable based server configuration
pub mod environment;

pub use environment::{DatabaseUrl, Environment, LogLevel, ServerConfig};
