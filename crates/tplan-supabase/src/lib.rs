//! Supabase REST client.
//!
//! This crate provides:
//! - GoTrue auth calls (sign up, password sign in, refresh, sign out, user lookup/update)
//! - A small PostgREST query builder for row-level-secured tables
//! - Status-to-error mapping that keeps the provider's message
//! - Tracing spans and request metrics per call

pub mod auth;
pub mod client;
pub mod error;
pub mod metrics;
pub mod query;

pub use auth::{AuthApi, Session, SignUp, User};
pub use client::{SupabaseClient, SupabaseConfig};
pub use error::{SupabaseError, SupabaseResult};
pub use query::{Order, TableQuery};
