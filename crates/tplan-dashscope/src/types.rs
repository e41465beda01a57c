//! DashScope request/response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transcription model used for uploaded audio.
pub const ASR_MODEL: &str = "paraformer-v2";

/// App completion request body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CompletionBody<'a> {
    pub input: CompletionInput<'a>,
    pub parameters: Value,
    pub debug: Value,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CompletionInput<'a> {
    pub prompt: &'a str,
}

/// File transcription request body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TranscriptionBody<'a> {
    pub model: &'a str,
    pub input: TranscriptionInput<'a>,
    pub parameters: TranscriptionParameters,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TranscriptionInput<'a> {
    pub file_urls: Vec<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TranscriptionParameters {
    pub language_hints: Vec<&'static str>,
}

impl Default for TranscriptionParameters {
    fn default() -> Self {
        Self {
            language_hints: vec!["zh", "en"],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponse {
    pub output: SubmitOutput,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitOutput {
    pub task_id: String,
}

/// Async task status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

/// `GET /tasks/{id}` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskResponse {
    pub request_id: Option<String>,
    #[serde(default)]
    pub output: TaskOutput,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskOutput {
    pub task_id: Option<String>,
    #[serde(default)]
    pub task_status: TaskStatus,
    #[serde(default)]
    pub results: Vec<TaskResult>,
}

/// Per-file result of a transcription task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskResult {
    pub file_url: Option<String>,
    pub transcription_url: Option<String>,
    pub subtask_status: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Document behind a `transcription_url`.
#[derive(Debug, Deserialize)]
pub(crate) struct Transcription {
    #[serde(default)]
    pub transcripts: Vec<Transcript>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Transcript {
    #[serde(default)]
    pub text: String,
}

impl Transcription {
    pub fn joined_text(&self) -> String {
        self.transcripts
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Model text of a completion response: `output.text`, else `text`, else empty.
pub fn extract_text(response: &Value) -> String {
    response
        .get("output")
        .and_then(|output| output.get("text"))
        .or_else(|| response.get("text"))
        .map(|text| match text {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .unwrap_or_default()
}
