//! GoTrue auth API.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::client::SupabaseClient;
use crate::error::{SupabaseError, SupabaseResult};

/// Auth user as returned by GoTrue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
}

/// Auth session as returned by GoTrue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub expires_at: Option<i64>,
    pub user: Option<User>,
}

/// Result of a sign up.
///
/// With email confirmation enabled GoTrue returns only the user and no
/// session.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUp {
    pub user: Option<User>,
    pub session: Option<Session>,
}

impl SignUp {
    fn from_body(body: Value) -> SupabaseResult<Self> {
        if body.get("access_token").is_some() {
            let session: Session = serde_json::from_value(body)?;
            Ok(Self {
                user: session.user.clone(),
                session: Some(session),
            })
        } else if body.get("id").is_some() {
            Ok(Self {
                user: Some(serde_json::from_value(body)?),
                session: None,
            })
        } else {
            Err(SupabaseError::invalid_response(
                "sign up returned neither a session nor a user",
            ))
        }
    }
}

/// Borrowed handle on the auth endpoints.
pub struct AuthApi<'a> {
    client: &'a SupabaseClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a SupabaseClient) -> Self {
        Self { client }
    }

    /// Register a new user with password, storing `data` as user metadata.
    pub async fn sign_up(&self, email: &str, password: &str, data: Value) -> SupabaseResult<SignUp> {
        let url = self.client.auth_endpoint("signup");
        let builder = self.client.request(Method::POST, &url, None).json(&json!({
            "email": email,
            "password": password,
            "data": data,
        }));

        let body: Value = self.client.execute_json("sign_up", "auth", builder).await?;
        SignUp::from_body(body)
    }

    /// Exchange email and password for a session.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> SupabaseResult<Session> {
        let url = self.client.auth_endpoint("token");
        let builder = self
            .client
            .request(Method::POST, &url, None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        self.client.execute_json("sign_in", "auth", builder).await
    }

    /// Exchange a refresh token for a new session.
    pub async fn refresh_session(&self, refresh_token: &str) -> SupabaseResult<Session> {
        let url = self.client.auth_endpoint("token");
        let builder = self
            .client
            .request(Method::POST, &url, None)
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }));

        self.client.execute_json("refresh_session", "auth", builder).await
    }

    /// Revoke the session behind `access_token`.
    pub async fn sign_out(&self, access_token: &str) -> SupabaseResult<()> {
        let url = self.client.auth_endpoint("logout");
        let builder = self.client.request(Method::POST, &url, Some(access_token));

        self.client.execute("sign_out", "auth", builder).await?;
        debug!("Session revoked");
        Ok(())
    }

    /// Resolve the user owning `access_token`.
    pub async fn get_user(&self, access_token: &str) -> SupabaseResult<User> {
        let url = self.client.auth_endpoint("user");
        let builder = self.client.request(Method::GET, &url, Some(access_token));

        self.client.execute_json("get_user", "auth", builder).await
    }

    /// Update attributes (e.g. `{"password": ...}`) of the user owning `access_token`.
    pub async fn update_user(&self, access_token: &str, attributes: &Value) -> SupabaseResult<User> {
        let url = self.client.auth_endpoint("user");
        let builder = self
            .client
            .request(Method::PUT, &url, Some(access_token))
            .json(attributes);

        self.client.execute_json("update_user", "auth", builder).await
    }
}
