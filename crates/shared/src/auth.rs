//! Authentication types for JWT and auth payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
    /// Preferred display currency (defaults to USD).
    pub currency: Option<String>,
}

/// Profile update payload; absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name.
    pub name: Option<String>,
    /// New display currency.
    pub currency: Option<String>,
}

/// Password change payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// The password currently set.
    pub current_password: String,
    /// The replacement password.
    pub new_password: String,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// User email.
    pub email: String,
    /// Display currency.
    pub currency: String,
}

/// Response returned after register or login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Always true; mirrors the envelope of the other endpoints.
    pub success: bool,
    /// Bearer token.
    pub token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
    /// Authenticated user.
    pub user: UserInfo,
}

impl AuthResponse {
    /// Creates a successful auth response.
    #[must_use]
    pub const fn new(token: String, expires_in: i64, user: UserInfo) -> Self {
        Self {
            success: true,
            token,
            expires_in,
            user,
        }
    }
}
