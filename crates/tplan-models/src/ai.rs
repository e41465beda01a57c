//! AI completion models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::ErrorBody;

fn default_extract_text() -> bool {
    true
}

/// Completion request forwarded to the planning app.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Caller-supplied key; overrides the configured one.
    pub api_key: Option<String>,
    pub parameters: Option<Value>,
    pub debug: Option<Value>,
    /// Return the model text (parsed as JSON when possible) alongside the raw response.
    #[serde(default = "default_extract_text")]
    pub extract_text: bool,
}

/// Completion response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub data: Option<Value>,
    pub text: Option<Value>,
    pub error: Option<ErrorBody>,
}

impl CompletionResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            text: None,
            error: Some(ErrorBody::new(message)),
        }
    }
}

/// Generate-and-save plan request.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePlanRequest {
    pub prompt: String,
    pub api_key: Option<String>,
    pub parameters: Option<Value>,
}

/// Generate-and-save plan response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratePlanResponse {
    pub plan_id: Option<String>,
    pub error: Option<ErrorBody>,
}

impl GeneratePlanResponse {
    pub fn created(plan_id: impl Into<String>) -> Self {
        Self {
            plan_id: Some(plan_id.into()),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            plan_id: None,
            error: Some(ErrorBody::new(message)),
        }
    }
}
