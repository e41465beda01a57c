//! Axum HTTP API server.
//!
//! This crate provides:
//! - Auth, plan and expense endpoints backed by Supabase with row-level security
//! - AI plan drafting, speech recognition and audio upload via DashScope and OSS
//! - Bearer token authentication
//! - Rate limiting, security headers and Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{AuthService, ExpenseService, PlanService};
pub use state::AppState;
