//! Object storage handlers.

use axum::extract::{Multipart, State};
use axum::Json;

use tplan_models::{file_extension, DeleteFileRequest, DeleteFileResponse, UploadResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Audio file read from a multipart form.
pub(crate) struct AudioUpload {
    pub data: Vec<u8>,
    pub extension: String,
    /// Optional `api_key` form field
    pub api_key: Option<String>,
}

/// Read the `file` part (and `api_key`, when sent) from a multipart form.
pub(crate) async fn read_audio_upload(mut multipart: Multipart) -> ApiResult<AudioUpload> {
    let mut file = None;
    let mut api_key = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let extension = file_extension(field.file_name());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
                file = Some((data.to_vec(), extension));
            }
            Some("api_key") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid api_key field: {}", e)))?;
                api_key = Some(value).filter(|v| !v.trim().is_empty());
            }
            _ => {}
        }
    }

    let (data, extension) = file.ok_or_else(|| ApiError::bad_request("Missing file field"))?;
    Ok(AudioUpload {
        data,
        extension,
        api_key,
    })
}

pub async fn upload_audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let upload = read_audio_upload(multipart).await?;

    let file_url = state
        .oss
        .upload_audio(upload.data, &upload.extension)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to upload file: {}", e)))?;

    Ok(Json(UploadResponse { file_url }))
}

pub async fn delete_file(
    State(state): State<AppState>,
    Json(request): Json<DeleteFileRequest>,
) -> Json<DeleteFileResponse> {
    let success = state.oss.delete_file(&request.file_url).await;
    Json(DeleteFileResponse { success })
}
