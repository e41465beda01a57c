//! Supabase access token authentication.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tplan_models::UserProfile;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Audience Supabase puts in tokens of signed-in users.
const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// Claims of a Supabase access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseClaims {
    /// User ID
    pub sub: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub aud: String,
    pub exp: i64,
}

/// HS256 verifier for tokens signed with the project's JWT secret.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[AUTHENTICATED_AUDIENCE]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Check signature, expiry and audience.
    pub fn verify(&self, token: &str) -> Result<SupabaseClaims, ApiError> {
        decode::<SupabaseClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| ApiError::unauthorized(format!("Authentication failed: {}", e)))
    }
}

/// Authenticated user extracted from request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    /// Empty when the user has no profile row
    pub username: String,
    pub created_at: Option<String>,
    /// Bearer token, forwarded to Supabase so RLS applies
    pub access_token: String,
}

impl AuthUser {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
            created_at: self.created_at.clone(),
        }
    }
}

/// Token from an `Authorization` header value.
fn bearer_token(header: Option<&str>) -> Result<&str, ApiError> {
    let header = header.ok_or_else(|| ApiError::unauthorized("Missing authentication credentials"))?;

    header.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::unauthorized("Invalid authorization format, expected: Bearer <token>")
    })
}

/// Axum extractor for authenticated user.
#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok());
        let token = bearer_token(header)?;

        if let Some(verifier) = &state.token_verifier {
            let claims = verifier.verify(token)?;
            debug!(user_id = %claims.sub, "Access token verified locally");
        }

        let profile = state
            .auth_service
            .current_user(token)
            .await
            .map_err(|e| ApiError::unauthorized(format!("Authentication failed: {}", e)))?;

        Ok(AuthUser {
            id: profile.id,
            email: profile.email,
            username: profile.username,
            created_at: profile.created_at,
            access_token: token.to_string(),
        })
    }
}
