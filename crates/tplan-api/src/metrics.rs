//! Prometheus metrics for the API server.

use std::sync::OnceLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Install the Prometheus recorder and return the handle that renders `/metrics`.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "tplan_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "tplan_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "tplan_http_requests_in_flight";

    pub const RATE_LIMIT_HITS_TOTAL: &str = "tplan_rate_limit_hits_total";

    pub const AI_COMPLETIONS_TOTAL: &str = "tplan_ai_completions_total";
    pub const ASR_RECOGNITIONS_TOTAL: &str = "tplan_asr_recognitions_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Record an AI completion by kind (`completion`, `generate_plan`) and outcome.
pub fn record_ai_completion(kind: &str, success: bool) {
    let labels = [
        ("kind", kind.to_string()),
        ("outcome", outcome(success).to_string()),
    ];
    counter!(names::AI_COMPLETIONS_TOTAL, &labels).increment(1);
}

/// Record a speech recognition run.
pub fn record_asr_recognition(success: bool) {
    let labels = [("outcome", outcome(success).to_string())];
    counter!(names::ASR_RECOGNITIONS_TOTAL, &labels).increment(1);
}

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}

fn path_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r"^/plans/[^/]+", "/plans/:plan_id"),
            (r"^/expenses/plan/[^/]+", "/expenses/plan/:plan_id"),
            (r"^/expenses/[^/]+$", "/expenses/:expense_id"),
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            (Regex::new(pattern).expect("valid path pattern"), replacement)
        })
        .collect()
    })
}

/// Sanitize path for metrics labels (replace ids with placeholders).
fn sanitize_path(path: &str) -> String {
    for (pattern, replacement) in path_patterns() {
        if pattern.is_match(path) {
            return pattern.replace(path, *replacement).into_owned();
        }
    }
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/plans/550e8400-e29b-41d4-a716-446655440000"),
            "/plans/:plan_id"
        );
        assert_eq!(
            sanitize_path("/expenses/plan/550e8400-e29b-41d4-a716-446655440000/summary"),
            "/expenses/plan/:plan_id/summary"
        );
        assert_eq!(sanitize_path("/expenses/42"), "/expenses/:expense_id");
        assert_eq!(sanitize_path("/expenses"), "/expenses");
        assert_eq!(sanitize_path("/ai/generate-plan"), "/ai/generate-plan");
    }
}
