//! Speech recognition handlers.

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::warn;

use tplan_models::{RecognizeResponse, RecognizeUrlRequest};

use crate::error::ApiResult;
use crate::handlers::oss::read_audio_upload;
use crate::metrics;
use crate::state::AppState;

/// Recognize an audio file already uploaded to OSS.
pub async fn recognize_url(
    State(state): State<AppState>,
    Json(request): Json<RecognizeUrlRequest>,
) -> ApiResult<Json<RecognizeResponse>> {
    let result = state
        .dashscope
        .recognize(&request.file_url, request.api_key.as_deref())
        .await;
    metrics::record_asr_recognition(result.is_ok());

    Ok(Json(RecognizeResponse { text: result? }))
}

/// Upload, recognize, then remove the temporary object.
pub async fn recognize(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<RecognizeResponse>> {
    let upload = read_audio_upload(multipart).await?;
    let file_url = state.oss.upload_audio(upload.data, &upload.extension).await?;

    let result = state
        .dashscope
        .recognize(&file_url, upload.api_key.as_deref())
        .await;
    metrics::record_asr_recognition(result.is_ok());

    // Cleanup runs whatever the outcome
    if !state.oss.delete_file(&file_url).await {
        warn!(file_url = %file_url, "Temporary audio was not removed");
    }

    Ok(Json(RecognizeResponse { text: result? }))
}
