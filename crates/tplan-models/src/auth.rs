//! Authentication request and response models.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::envelope::ErrorBody;

/// Registration request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub password: String,
    pub username: String,
}

/// Login request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub password: String,
}

/// Password change request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePasswordRequest {
    pub new_password: String,
}

/// Session refresh request.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Public view of an authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: Option<String>,
    /// From the `user_profiles` table; empty when no profile row exists.
    #[serde(default)]
    pub username: String,
    pub created_at: Option<String>,
}

/// Opaque session tokens handed back to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds).
    pub expires_at: Option<i64>,
}

/// Response for register, login and refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: Option<UserProfile>,
    pub session: Option<SessionTokens>,
    pub error: Option<ErrorBody>,
}

impl AuthResponse {
    pub fn success(user: Option<UserProfile>, session: SessionTokens) -> Self {
        Self {
            user,
            session: Some(session),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            user: None,
            session: None,
            error: Some(ErrorBody::new(message)),
        }
    }
}

/// Response for logout and password change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    pub error: Option<ErrorBody>,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: String::new(),
            error: Some(ErrorBody::new(message)),
        }
    }
}

/// Response for `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: UserProfile,
    pub error: Option<ErrorBody>,
}
