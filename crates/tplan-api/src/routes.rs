//! API routes.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::ai::{completion, generate_plan};
use crate::handlers::asr::{recognize, recognize_url};
use crate::handlers::auth::{login, logout, me, refresh, register, update_password};
use crate::handlers::expenses::{
    create_expense, delete_expense, expense_summary, list_expenses, update_expense,
};
use crate::handlers::oss::{delete_file, upload_audio};
use crate::handlers::plans::{create_plan, delete_plan, get_plan, list_plans, update_plan};
use crate::handlers::{health, ready, root};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/auth/password", put(update_password))
        .route("/auth/refresh", post(refresh));

    let plan_routes = Router::new()
        .route("/plans", get(list_plans).post(create_plan))
        .route(
            "/plans/:plan_id",
            get(get_plan).put(update_plan).delete(delete_plan),
        );

    let expense_routes = Router::new()
        .route("/expenses", post(create_expense))
        .route("/expenses/plan/:plan_id", get(list_expenses))
        .route("/expenses/plan/:plan_id/summary", get(expense_summary))
        .route(
            "/expenses/:expense_id",
            put(update_expense).delete(delete_expense),
        );

    let ai_routes = Router::new()
        .route("/ai/completion", post(completion))
        .route("/ai/generate-plan", post(generate_plan));

    // Multipart uploads
    let media_routes = Router::new()
        .route("/asr/recognize-url", post(recognize_url))
        .route("/asr/recognize", post(recognize))
        .route("/oss/upload/audio", post(upload_audio))
        .route("/oss/delete", post(delete_file));

    let rate_limiter = Arc::new(
        RateLimiterCache::new(state.config.rate_limit_rps, state.config.rate_limit_burst)
            .trust_proxy_headers(state.config.trust_proxy_headers),
    );

    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(plan_routes)
        .merge(expense_routes)
        .merge(ai_routes)
        .merge(media_routes)
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let health_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ready", get(ready));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .merge(api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        // Replaced by the configurable limit below
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
