//! Client for Alibaba Cloud DashScope (Bailian).
//!
//! Covers the two upstream features the planner uses:
//! - App completion, which drafts travel plans
//! - Paraformer file transcription, an async task that is polled to completion

pub mod client;
pub mod error;
pub mod types;

pub use client::{DashScopeClient, DashScopeConfig};
pub use error::{DashScopeError, DashScopeResult};
pub use types::{extract_text, TaskOutput, TaskResponse, TaskResult, TaskStatus};
