//! Shared fixtures for the router tests.
//!
//! Supabase, DashScope and the OSS S3 endpoint are all served by one
//! wiremock server.

#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tplan_api::{create_router, ApiConfig, AppState};
use tplan_dashscope::{DashScopeClient, DashScopeConfig};
use tplan_oss::{OssClient, OssConfig};
use tplan_supabase::{SupabaseClient, SupabaseConfig};

pub const TOKEN: &str = "user-token";
pub const USER_ID: &str = "u1";
pub const BUCKET: &str = "planner-audio";
pub const REGION: &str = "oss-cn-hangzhou";

pub async fn setup() -> (MockServer, Router) {
    let server = MockServer::start().await;

    let supabase = SupabaseClient::new(SupabaseConfig::new(server.uri(), "anon-key")).unwrap();
    let dashscope = DashScopeClient::new(DashScopeConfig {
        base_url: server.uri(),
        api_key: Some("server-key".to_string()),
        app_id: "app-1".to_string(),
        poll_interval: Duration::from_millis(10),
        poll_limit: 3,
        ..DashScopeConfig::default()
    })
    .unwrap();
    let oss = OssClient::new(OssConfig {
        region: REGION.to_string(),
        access_key_id: "ak".to_string(),
        access_key_secret: "sk".to_string(),
        bucket: BUCKET.to_string(),
        endpoint: Some(server.uri()),
    })
    .unwrap();

    let state = AppState::new(ApiConfig::default(), supabase, dashscope, oss);
    (server, create_router(state, None))
}

/// Make `TOKEN` resolve to `USER_ID` with username "traveler".
pub async fn mount_user(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": USER_ID,
            "email": "a@b.co",
            "created_at": "2025-01-01T00:00:00Z"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/user_profiles"))
        .and(query_param("id", format!("eq.{}", USER_ID).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"username": "traveler"}])))
        .mount(server)
        .await;
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {}", TOKEN))
        .body(Body::empty())
        .unwrap()
}

pub fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", TOKEN))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Multipart body with an audio `file` part and optional `api_key` field.
pub fn multipart_upload(uri: &str, file_name: &str, data: &[u8], api_key: Option<&str>) -> Request<Body> {
    const BOUNDARY: &str = "XPLANNERBOUNDARY";

    let mut body = Vec::new();
    if let Some(key) = api_key {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"api_key\"\r\n\r\n{key}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: audio/mpeg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}
