//! DashScope client error types.

use thiserror::Error;

pub type DashScopeResult<T> = Result<T, DashScopeError>;

/// Errors from DashScope calls.
///
/// `Api`, `TaskFailed` and `Timeout` render their message as-is so callers
/// can hand it straight to the client.
#[derive(Debug, Error)]
pub enum DashScopeError {
    #[error("DashScope configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Api(String),

    #[error("{0}")]
    TaskFailed(String),

    #[error("{0}")]
    Timeout(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashScopeError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Error for a non-success response: the body's `message`, then `error`,
    /// then `fallback`.
    pub fn from_response_body(body: &str, fallback: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["message", "error"]
                    .iter()
                    .filter_map(|key| value.get(*key).and_then(|v| v.as_str()))
                    .find(|msg| !msg.trim().is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| fallback.to_string());
        Self::Api(message)
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Network(e) => e.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_body() {
        let err = DashScopeError::from_response_body(
            r#"{"code":"InvalidApiKey","message":"Invalid API-key provided."}"#,
            "fallback",
        );
        assert_eq!(err.to_string(), "Invalid API-key provided.");

        let err = DashScopeError::from_response_body(r#"{"error":"quota exceeded"}"#, "fallback");
        assert_eq!(err.to_string(), "quota exceeded");

        let err = DashScopeError::from_response_body("<html>502</html>", "DashScope request failed");
        assert_eq!(err.to_string(), "DashScope request failed");
    }
}
