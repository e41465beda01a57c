//! Uniform `{data, error}` response envelope.

use serde::{Deserialize, Serialize};

/// Error payload carried inside an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response wrapper used by the data endpoints.
///
/// Exactly one of `data` and `error` is set. Both keys are always serialized
/// so clients can rely on their presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
}

impl<T> Envelope<T> {
    /// Successful envelope.
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Failed envelope.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(ErrorBody::new(message)),
        }
    }

    /// Build an envelope from a result, rendering the error with `Display`.
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// `{id}` returned after an insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub id: String,
}

/// `{id, updated}` returned after an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Updated {
    pub id: String,
    pub updated: bool,
}

impl Updated {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            updated: true,
        }
    }
}

/// `{id, deleted}` returned after a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub id: String,
    pub deleted: bool,
}

impl Deleted {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            deleted: true,
        }
    }
}
