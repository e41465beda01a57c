//! DashScope HTTP client.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::error::{DashScopeError, DashScopeResult};
use crate::types::{
    CompletionBody, CompletionInput, SubmitResponse, TaskResponse, TaskStatus, Transcription,
    TranscriptionBody, TranscriptionInput, TranscriptionParameters, ASR_MODEL,
};

/// Default API base.
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/api/v1";

/// Configuration for the DashScope client.
#[derive(Debug, Clone)]
pub struct DashScopeConfig {
    /// API base, without trailing slash
    pub base_url: String,
    /// Server-side key; a per-request key takes precedence
    pub api_key: Option<String>,
    /// Bailian application that drafts plans
    pub app_id: String,
    /// Model behind the app (informational)
    pub model_name: String,
    /// Timeout for app completions
    pub completion_timeout: Duration,
    /// Timeout for each ASR request
    pub asr_timeout: Duration,
    /// Task status queries before giving up
    pub poll_limit: u32,
    /// Delay between task status queries
    pub poll_interval: Duration,
}

impl Default for DashScopeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            app_id: String::new(),
            model_name: "qwen-max".to_string(),
            completion_timeout: Duration::from_secs(300), // plan drafting is slow
            asr_timeout: Duration::from_secs(30),
            poll_limit: 60,
            poll_interval: Duration::from_secs(2),
        }
    }
}

impl DashScopeConfig {
    /// Create config from environment variables.
    pub fn from_env() -> DashScopeResult<Self> {
        let defaults = Self::default();

        let app_id = std::env::var("BAILIAN_APP_ID")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DashScopeError::Config("BAILIAN_APP_ID must be set".to_string()))?;

        Ok(Self {
            base_url: std::env::var("DASHSCOPE_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            api_key: std::env::var("BAILIAN_API_KEY")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            app_id,
            model_name: std::env::var("BAILIAN_MODEL_NAME").unwrap_or(defaults.model_name),
            completion_timeout: Duration::from_secs(
                std::env::var("BAILIAN_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            ..defaults
        })
    }
}

/// Client for DashScope app completion and file transcription.
#[derive(Clone)]
pub struct DashScopeClient {
    http: Client,
    config: DashScopeConfig,
}

impl DashScopeClient {
    /// Create a new DashScope client.
    pub fn new(config: DashScopeConfig) -> DashScopeResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("tplan-dashscope/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> DashScopeResult<Self> {
        Self::new(DashScopeConfig::from_env()?)
    }

    pub fn config(&self) -> &DashScopeConfig {
        &self.config
    }

    /// Pick the per-request key, falling back to the configured one.
    fn resolve_key<'a>(&'a self, api_key: Option<&'a str>) -> DashScopeResult<&'a str> {
        api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or(self.config.api_key.as_deref())
            .ok_or_else(|| DashScopeError::Config("no API key provided or configured".to_string()))
    }

    /// Invoke the planning app and return its raw response.
    pub async fn complete(
        &self,
        prompt: &str,
        api_key: Option<&str>,
        parameters: Option<Value>,
        debug: Option<Value>,
    ) -> DashScopeResult<Value> {
        let key = self.resolve_key(api_key)?;
        let url = format!("{}/apps/{}/completion", self.config.base_url, self.config.app_id);

        let body = CompletionBody {
            input: CompletionInput { prompt },
            parameters: parameters.unwrap_or_else(|| json!({})),
            debug: debug.unwrap_or_else(|| json!({})),
        };

        let span = info_span!("dashscope_completion", app_id = %self.config.app_id);
        let request = self
            .http
            .post(&url)
            .bearer_auth(key)
            .timeout(self.config.completion_timeout)
            .json(&body);

        // The deadline covers reading the body too
        async {
            let response = self.send(request, "DashScope request failed").await?;
            Self::decode::<Value>(response).await
        }
        .instrument(span)
        .await
        .map_err(|e| {
            if e.is_timeout() {
                DashScopeError::Timeout("AI generation timed out".to_string())
            } else {
                e
            }
        })
    }

    /// Submit a transcription task for a file already in OSS; returns the task id.
    pub async fn submit_transcription(
        &self,
        file_url: &str,
        api_key: Option<&str>,
    ) -> DashScopeResult<String> {
        let key = self.resolve_key(api_key)?;
        let url = format!("{}/services/audio/asr/transcription", self.config.base_url);

        let body = TranscriptionBody {
            model: ASR_MODEL,
            input: TranscriptionInput {
                file_urls: vec![file_url],
            },
            parameters: TranscriptionParameters::default(),
        };

        let request = self
            .http
            .post(&url)
            .bearer_auth(key)
            .header("X-DashScope-Async", "enable")
            .header("X-DashScope-OssResourceResolve", "enable")
            .timeout(self.config.asr_timeout)
            .json(&body);

        let response = self
            .send(request, "Failed to submit recognition task")
            .await?;
        let submitted: SubmitResponse = Self::decode(response).await?;

        info!(task_id = %submitted.output.task_id, "Submitted transcription task");
        Ok(submitted.output.task_id)
    }

    /// Query the state of an async task.
    pub async fn query_task(
        &self,
        task_id: &str,
        api_key: Option<&str>,
    ) -> DashScopeResult<TaskResponse> {
        let key = self.resolve_key(api_key)?;
        let url = format!("{}/tasks/{}", self.config.base_url, task_id);

        let request = self
            .http
            .get(&url)
            .bearer_auth(key)
            .timeout(self.config.asr_timeout);

        let response = self.send(request, "Failed to query recognition task").await?;
        Self::decode(response).await
    }

    /// Download a transcription document and join its transcripts with newlines.
    pub async fn fetch_transcript(&self, transcription_url: &str) -> DashScopeResult<String> {
        let request = self
            .http
            .get(transcription_url)
            .timeout(self.config.asr_timeout);

        let response = self
            .send(request, "Failed to fetch recognition result")
            .await?;
        let transcription: Transcription = Self::decode(response).await?;
        Ok(transcription.joined_text())
    }

    /// Transcribe a file: submit, poll until the task settles, then fetch the text.
    pub async fn recognize(&self, file_url: &str, api_key: Option<&str>) -> DashScopeResult<String> {
        let task_id = self.submit_transcription(file_url, api_key).await?;

        let span = info_span!("dashscope_recognize", task_id = %task_id);
        async {
            for attempt in 1..=self.config.poll_limit {
                let task = self.query_task(&task_id, api_key).await?;
                debug!(attempt, status = ?task.output.task_status, "Polled transcription task");

                match task.output.task_status {
                    TaskStatus::Succeeded => {
                        let url = task
                            .output
                            .results
                            .first()
                            .and_then(|r| r.transcription_url.as_deref())
                            .ok_or_else(|| {
                                DashScopeError::TaskFailed(
                                    "No transcription result found".to_string(),
                                )
                            })?;
                        return self.fetch_transcript(url).await;
                    }
                    TaskStatus::Failed => {
                        let message = task
                            .output
                            .results
                            .first()
                            .and_then(|r| r.message.clone())
                            .unwrap_or_else(|| "Recognition task failed".to_string());
                        warn!("Transcription task failed: {}", message);
                        return Err(DashScopeError::TaskFailed(message));
                    }
                    _ => tokio::time::sleep(self.config.poll_interval).await,
                }
            }

            Err(DashScopeError::Timeout(
                "Speech recognition timed out".to_string(),
            ))
        }
        .instrument(span)
        .await
    }

    /// Send a request, turning non-success statuses into `Api` errors.
    async fn send(&self, request: RequestBuilder, fallback: &str) -> DashScopeResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "DashScope responded");

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "DashScope request failed");
            Err(DashScopeError::from_response_body(&body, fallback))
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> DashScopeResult<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| DashScopeError::invalid_response(e.to_string()))
    }
}
