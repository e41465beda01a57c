//! AI completion handlers.
//!
//! Both endpoints answer `200` and report upstream failures in `error`.

use axum::extract::State;
use axum::Json;
use chrono::Local;
use serde_json::Value;
use tracing::{info, warn};

use tplan_dashscope::extract_text;
use tplan_models::{
    CompletionRequest, CompletionResponse, GeneratePlanRequest, GeneratePlanResponse, NewPlan,
};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Model text as JSON when it parses, otherwise as a plain string.
fn parse_text(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

pub async fn completion(
    State(state): State<AppState>,
    Json(request): Json<CompletionRequest>,
) -> Json<CompletionResponse> {
    let result = state
        .dashscope
        .complete(
            &request.prompt,
            request.api_key.as_deref(),
            request.parameters,
            request.debug,
        )
        .await;
    metrics::record_ai_completion("completion", result.is_ok());

    let response = match result {
        Ok(data) => {
            let text = request
                .extract_text
                .then(|| parse_text(extract_text(&data)));
            CompletionResponse {
                data: Some(data),
                text,
                error: None,
            }
        }
        Err(e) => {
            warn!("Completion failed: {}", e);
            CompletionResponse::failure(e.to_string())
        }
    };
    Json(response)
}

/// Draft a plan with the model and store it for the caller.
pub async fn generate_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<GeneratePlanRequest>,
) -> Json<GeneratePlanResponse> {
    let result = draft_and_store(&state, &user, request).await;
    metrics::record_ai_completion("generate_plan", result.is_ok());

    let response = match result {
        Ok(plan_id) => {
            info!(plan_id = %plan_id, user_id = %user.id, "Generated plan saved");
            GeneratePlanResponse::created(plan_id)
        }
        Err(e) => {
            warn!(user_id = %user.id, "Plan generation failed: {}", e);
            GeneratePlanResponse::failure(e.to_string())
        }
    };
    Json(response)
}

async fn draft_and_store(
    state: &AppState,
    user: &AuthUser,
    request: GeneratePlanRequest,
) -> ApiResult<String> {
    let raw = state
        .dashscope
        .complete(
            &request.prompt,
            request.api_key.as_deref(),
            request.parameters,
            None,
        )
        .await?;

    let output: Value = serde_json::from_str(&extract_text(&raw))
        .map_err(|e| ApiError::internal(format!("AI response is not valid JSON: {}", e)))?;

    let plan = NewPlan::from_ai_output(user.id.as_str(), &output, Local::now().date_naive())
        .map_err(ApiError::Internal)?;

    let created = state.plan_service.create(&plan, &user.access_token).await?;
    Ok(created.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_text() {
        assert_eq!(
            parse_text(r#"{"title": "Chengdu"}"#.to_string()),
            json!({"title": "Chengdu"})
        );
        assert_eq!(parse_text("plain words".to_string()), json!("plain words"));
        assert_eq!(parse_text(String::new()), json!(""));
    }
}
