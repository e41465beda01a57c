//! DashScope client tests against a mock server.

use std::time::Duration;

use serde_json::json;
use tplan_dashscope::{DashScopeClient, DashScopeConfig, DashScopeError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> DashScopeClient {
    DashScopeClient::new(DashScopeConfig {
        base_url: server.uri(),
        api_key: Some("server-key".to_string()),
        app_id: "app-123".to_string(),
        poll_limit: 3,
        poll_interval: Duration::from_millis(10),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_completion_forwards_prompt_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/apps/app-123/completion"))
        .and(header("authorization", "Bearer user-key"))
        .and(body_json(json!({
            "input": {"prompt": "3 days in Hangzhou"},
            "parameters": {},
            "debug": {}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": {"text": "{\"title\": \"Hangzhou\"}", "finish_reason": "stop"},
            "request_id": "r1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .complete("3 days in Hangzhou", Some("user-key"), None, None)
        .await
        .unwrap();
    assert_eq!(
        tplan_dashscope::extract_text(&response),
        "{\"title\": \"Hangzhou\"}"
    );
}

#[tokio::test]
async fn test_completion_surfaces_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/apps/app-123/completion"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "InvalidApiKey",
            "message": "Invalid API-key provided."
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .complete("hi", None, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid API-key provided.");
}

#[tokio::test]
async fn test_completion_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/apps/app-123/completion"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = DashScopeClient::new(DashScopeConfig {
        base_url: server.uri(),
        api_key: Some("k".to_string()),
        app_id: "app-123".to_string(),
        completion_timeout: Duration::from_millis(50),
        ..Default::default()
    })
    .unwrap();

    let err = client.complete("hi", None, None, None).await.unwrap_err();
    assert!(matches!(err, DashScopeError::Timeout(_)));
    assert_eq!(err.to_string(), "AI generation timed out");
}

#[tokio::test]
async fn test_completion_timeout_while_reading_body() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Headers arrive at once, the body never completes
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"output\":",
            )
            .await;
        let _ = socket.flush().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let client = DashScopeClient::new(DashScopeConfig {
        base_url: format!("http://{}", addr),
        api_key: Some("k".to_string()),
        app_id: "app-123".to_string(),
        completion_timeout: Duration::from_millis(200),
        ..Default::default()
    })
    .unwrap();

    let err = client.complete("hi", None, None, None).await.unwrap_err();
    assert_eq!(err.to_string(), "AI generation timed out");
}

#[tokio::test]
async fn test_recognize_polls_until_succeeded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/audio/asr/transcription"))
        .and(header("X-DashScope-Async", "enable"))
        .and(header("X-DashScope-OssResourceResolve", "enable"))
        .and(body_json(json!({
            "model": "paraformer-v2",
            "input": {"file_urls": ["https://bucket.oss-cn-hangzhou.aliyuncs.com/audio/a.wav"]},
            "parameters": {"language_hints": ["zh", "en"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": {"task_id": "task-1", "task_status": "PENDING"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tasks/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": {"task_id": "task-1", "task_status": "RUNNING"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tasks/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": {
                "task_id": "task-1",
                "task_status": "SUCCEEDED",
                "results": [{"transcription_url": format!("{}/results/task-1.json", server.uri())}]
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/results/task-1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transcripts": [{"text": "去杭州玩三天"}, {"text": "预算五千"}]
        })))
        .mount(&server)
        .await;

    let text = client(&server)
        .recognize("https://bucket.oss-cn-hangzhou.aliyuncs.com/audio/a.wav", None)
        .await
        .unwrap();
    assert_eq!(text, "去杭州玩三天\n预算五千");
}

#[tokio::test]
async fn test_recognize_reports_task_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/audio/asr/transcription"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"output": {"task_id": "task-2"}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/task-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": {
                "task_status": "FAILED",
                "results": [{"code": "InvalidFile.DownloadFailed", "message": "The audio file cannot be downloaded."}]
            }
        })))
        .mount(&server)
        .await;

    let err = client(&server).recognize("f", None).await.unwrap_err();
    assert!(matches!(err, DashScopeError::TaskFailed(_)));
    assert_eq!(err.to_string(), "The audio file cannot be downloaded.");
}

#[tokio::test]
async fn test_recognize_gives_up_after_poll_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/audio/asr/transcription"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"output": {"task_id": "task-3"}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/task-3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"output": {"task_status": "RUNNING"}})),
        )
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server).recognize("f", None).await.unwrap_err();
    assert!(matches!(err, DashScopeError::Timeout(_)));
}

#[tokio::test]
async fn test_succeeded_without_result_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/audio/asr/transcription"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"output": {"task_id": "task-4"}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/task-4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": {"task_status": "SUCCEEDED", "results": []}
        })))
        .mount(&server)
        .await;

    let err = client(&server).recognize("f", None).await.unwrap_err();
    assert_eq!(err.to_string(), "No transcription result found");
}

#[tokio::test]
async fn test_missing_key_fails_before_request() {
    let server = MockServer::start().await;
    let client = DashScopeClient::new(DashScopeConfig {
        base_url: server.uri(),
        app_id: "app-123".to_string(),
        ..Default::default()
    })
    .unwrap();

    let err = client.complete("hi", None, None, None).await.unwrap_err();
    assert!(matches!(err, DashScopeError::Config(_)));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
