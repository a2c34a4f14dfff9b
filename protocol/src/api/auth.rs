//! Authentication API DTOs
//!
//! This module contains data transfer objects for the authentication
//! endpoints: login, register, logout, token refresh and profile.

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use crate::common::User;

// ============================================================================
// Login DTOs
// ============================================================================

/// Credentials for POST /users/login
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    /// Backend enforces the full password policy; length is checked here to
    /// avoid a guaranteed round-trip failure
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Payload of a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub user: User,
    pub access_token: String,
}

// ============================================================================
// Registration DTOs
// ============================================================================

/// New account details for POST /users/register
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 255))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Payload of a successful registration; no session is established
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

// ============================================================================
// Token Refresh DTOs
// ============================================================================

/// Response of POST /users/refresh-token
///
/// Returned bare, not wrapped in the standard envelope. The refresh token
/// itself travels in an HTTP-only cookie and never appears in a body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
}
