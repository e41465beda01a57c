//! Account service: registration, sessions and the current user.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use tplan_models::{AuthResponse, SessionTokens, UserProfile};
use tplan_supabase::{Session, SupabaseClient, User};

use crate::error::{ApiError, ApiResult};

const PROFILES_TABLE: &str = "user_profiles";

#[derive(Debug, Deserialize)]
struct ProfileRow {
    username: Option<String>,
}

/// Wraps Supabase auth and the `user_profiles` table.
#[derive(Clone)]
pub struct AuthService {
    supabase: Arc<SupabaseClient>,
}

impl AuthService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Create an account and its profile row.
    ///
    /// Requires Supabase to hand back a session right away, i.e. email
    /// confirmation turned off.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> ApiResult<AuthResponse> {
        self.sign_up(email, password, username)
            .await
            .map_err(|e| ApiError::bad_request(registration_error_message(&e.to_string())))
    }

    async fn sign_up(&self, email: &str, password: &str, username: &str) -> ApiResult<AuthResponse> {
        let sign_up = self
            .supabase
            .auth()
            .sign_up(email, password, json!({ "username": username }))
            .await?;

        let (user, session) = match (sign_up.user, sign_up.session) {
            (Some(user), Some(session)) => (user, session),
            _ => {
                return Err(ApiError::internal(
                    "no session returned, email confirmation must be disabled",
                ))
            }
        };

        let profile_result = self
            .supabase
            .table(PROFILES_TABLE)
            .upsert::<_, Value>(
                &json!({ "id": user.id, "username": username }),
                &session.access_token,
            )
            .await;
        if let Err(e) = profile_result {
            warn!(user_id = %user.id, "Failed to store user profile: {}", e);
        }

        info!(user_id = %user.id, "User registered");
        Ok(AuthResponse::success(
            Some(user_profile(&user, username.to_string())),
            session_tokens(&session),
        ))
    }

    /// Password sign-in.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let session = self
            .supabase
            .auth()
            .sign_in_with_password(email, password)
            .await?;

        let user = session
            .user
            .as_ref()
            .ok_or_else(|| ApiError::internal("Login returned no user"))?;
        let username = self.username(&user.id, &session.access_token).await;

        Ok(AuthResponse::success(
            Some(user_profile(user, username)),
            session_tokens(&session),
        ))
    }

    pub async fn logout(&self, access_token: &str) -> ApiResult<()> {
        self.supabase.auth().sign_out(access_token).await?;
        Ok(())
    }

    /// Resolve the owner of `access_token`, with the username from their profile.
    pub async fn current_user(&self, access_token: &str) -> ApiResult<UserProfile> {
        let user = self.supabase.auth().get_user(access_token).await?;
        let username = self.username(&user.id, access_token).await;
        Ok(user_profile(&user, username))
    }

    pub async fn update_password(&self, access_token: &str, new_password: &str) -> ApiResult<()> {
        self.supabase
            .auth()
            .update_user(access_token, &json!({ "password": new_password }))
            .await?;
        Ok(())
    }

    /// Exchange a refresh token for fresh session tokens.
    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<SessionTokens> {
        let session = self.supabase.auth().refresh_session(refresh_token).await?;
        Ok(session_tokens(&session))
    }

    /// Username from `user_profiles`; empty when the row or lookup is missing.
    async fn username(&self, user_id: &str, access_token: &str) -> String {
        let row = self
            .supabase
            .table(PROFILES_TABLE)
            .select("username")
            .eq("id", user_id)
            .fetch_single::<ProfileRow>(access_token)
            .await;

        match row {
            Ok(Some(row)) => row.username.unwrap_or_default(),
            Ok(None) => String::new(),
            Err(e) => {
                warn!(user_id = %user_id, "Profile lookup failed: {}", e);
                String::new()
            }
        }
    }
}

fn user_profile(user: &User, username: String) -> UserProfile {
    UserProfile {
        id: user.id.clone(),
        email: user.email.clone(),
        username,
        created_at: user.created_at.clone(),
    }
}

fn session_tokens(session: &Session) -> SessionTokens {
    SessionTokens {
        access_token: session.access_token.clone(),
        refresh_token: session.refresh_token.clone(),
        expires_at: session.expires_at,
    }
}

/// Client-facing message for a failed registration.
pub fn registration_error_message(raw: &str) -> String {
    let lower = raw.to_lowercase();
    if lower.contains("already registered") || lower.contains("already exists") {
        "This email is already registered".to_string()
    } else if lower.contains("email") && lower.contains("invalid") {
        "Invalid email format".to_string()
    } else if lower.contains("password") {
        "Password does not meet requirements".to_string()
    } else {
        format!("Registration failed: {}", raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_error_message() {
        assert_eq!(
            registration_error_message("User already registered"),
            "This email is already registered"
        );
        assert_eq!(
            registration_error_message("A user with this email address already exists"),
            "This email is already registered"
        );
        assert_eq!(
            registration_error_message("Unable to validate email address: invalid format"),
            "Invalid email format"
        );
        assert_eq!(
            registration_error_message("Password should be at least 6 characters."),
            "Password does not meet requirements"
        );
        assert_eq!(
            registration_error_message("Signups not allowed for this instance"),
            "Registration failed: Signups not allowed for this instance"
        );
    }
}
