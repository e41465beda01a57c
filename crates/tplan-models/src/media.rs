//! Speech recognition and file upload models.

use serde::{Deserialize, Serialize};

/// Extension assumed for uploads without one.
pub const DEFAULT_AUDIO_EXTENSION: &str = "wav";

/// Recognize an audio file that is already in object storage.
#[derive(Debug, Clone, Deserialize)]
pub struct RecognizeUrlRequest {
    pub file_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizeResponse {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub file_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteFileRequest {
    pub file_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFileResponse {
    pub success: bool,
}

/// Extension of an uploaded file name: the text after the last `.`.
pub fn file_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .unwrap_or(DEFAULT_AUDIO_EXTENSION)
        .to_string()
}
