//! Supabase HTTP client.
//!
//! Holds one pooled `reqwest` client for both the auth (`/auth/v1`) and the
//! table (`/rest/v1`) APIs. Every call is wrapped in a tracing span and
//! recorded in request metrics.

use std::time::{Duration, Instant};

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info_span, Instrument};
use url::Url;

use crate::auth::AuthApi;
use crate::error::{SupabaseError, SupabaseResult};
use crate::metrics::record_request;
use crate::query::TableQuery;

// =============================================================================
// Configuration
// =============================================================================

/// Supabase client configuration.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`
    pub url: String,
    /// Public anon key, sent as `apikey` on every request
    pub anon_key: String,
    /// Legacy HS256 JWT secret; enables local token checks when set
    pub jwt_secret: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl SupabaseConfig {
    /// Config with default timeouts.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            jwt_secret: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> SupabaseResult<Self> {
        let url = required_env("SUPABASE_URL")?;
        let anon_key = required_env("SUPABASE_KEY")?;

        let timeout_secs: u64 = std::env::var("SUPABASE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let connect_timeout_secs: u64 = std::env::var("SUPABASE_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            url,
            anon_key,
            jwt_secret: std::env::var("SUPABASE_JWT_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }
}

fn required_env(name: &str) -> SupabaseResult<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(SupabaseError::config(format!("{} must be set", name))),
    }
}

// =============================================================================
// Client
// =============================================================================

/// Supabase REST client.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    config: SupabaseConfig,
    auth_url: String,
    rest_url: String,
}

impl SupabaseClient {
    /// Create a new Supabase client.
    pub fn new(config: SupabaseConfig) -> SupabaseResult<Self> {
        let base = Url::parse(&config.url)
            .map_err(|e| SupabaseError::config(format!("Invalid SUPABASE_URL: {}", e)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(SupabaseError::config("SUPABASE_URL must be an http(s) URL"));
        }
        let base = base.as_str().trim_end_matches('/').to_string();

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("tplan-supabase/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            auth_url: format!("{}/auth/v1", base),
            rest_url: format!("{}/rest/v1", base),
            config,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> SupabaseResult<Self> {
        Self::new(SupabaseConfig::from_env()?)
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// Auth (GoTrue) API.
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Start a query against a table.
    pub fn table(&self, table: &str) -> TableQuery<'_> {
        TableQuery::new(self, table)
    }

    /// Check that the auth service answers.
    pub async fn health_check(&self) -> SupabaseResult<()> {
        let url = format!("{}/health", self.auth_url);
        let builder = self.request(Method::GET, &url, None);
        self.execute("health", "auth", builder).await.map(|_| ())
    }

    pub(crate) fn auth_endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.auth_url, path.trim_start_matches('/'))
    }

    pub(crate) fn table_endpoint(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    /// Build a request carrying the project key and the caller's token.
    ///
    /// Without an access token the anon key doubles as the bearer token.
    pub(crate) fn request(
        &self,
        method: Method,
        url: &str,
        access_token: Option<&str>,
    ) -> RequestBuilder {
        let bearer = access_token.unwrap_or(&self.config.anon_key);
        self.http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    /// Send a request, converting non-success statuses into errors.
    pub(crate) async fn execute(
        &self,
        operation: &str,
        target: &str,
        builder: RequestBuilder,
    ) -> SupabaseResult<Response> {
        let span = info_span!("supabase_request", operation = %operation, target = %target);

        let start = Instant::now();
        let result = async {
            let response = builder.send().await?;
            let status = response.status();
            debug!(status = status.as_u16(), "Supabase responded");

            if status.is_success() {
                Ok(response)
            } else {
                let body = response.text().await.unwrap_or_default();
                Err(SupabaseError::from_http_status(status.as_u16(), &body))
            }
        }
        .instrument(span)
        .await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(response) => response.status().as_u16(),
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);

        result
    }

    /// Send a request and decode its JSON body.
    pub(crate) async fn execute_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        target: &str,
        builder: RequestBuilder,
    ) -> SupabaseResult<T> {
        let response = self.execute(operation, target, builder).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            SupabaseError::invalid_response(format!("{} returned unexpected body: {}", operation, e))
        })
    }
}
