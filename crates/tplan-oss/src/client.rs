//! OSS client implementation.

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use chrono::{DateTime, Local};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

/// Prefix for uploaded audio objects.
const AUDIO_PREFIX: &str = "audio";

/// Configuration for the OSS client.
#[derive(Debug, Clone)]
pub struct OssConfig {
    /// OSS region id, e.g. `oss-cn-hangzhou`
    pub region: String,
    /// AccessKey ID
    pub access_key_id: String,
    /// AccessKey secret
    pub access_key_secret: String,
    /// Bucket name
    pub bucket: String,
    /// API endpoint override; defaults to `https://{region}.aliyuncs.com`
    pub endpoint: Option<String>,
}

impl OssConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            region: required_env("OSS_REGION")?,
            access_key_id: required_env("OSS_ACCESS_KEY_ID")?,
            access_key_secret: required_env("OSS_ACCESS_KEY_SECRET")?,
            bucket: required_env("OSS_BUCKET")?,
            endpoint: std::env::var("OSS_ENDPOINT")
                .ok()
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty()),
        })
    }

    /// S3 API endpoint.
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{}.aliyuncs.com", self.region))
    }

    /// Public host objects are served from: `{bucket}.{region}.aliyuncs.com`.
    pub fn public_host(&self) -> String {
        format!("{}.{}.aliyuncs.com", self.bucket, self.region)
    }

    /// Public URL of an object.
    pub fn public_url(&self, key: &str) -> String {
        format!("https://{}/{}", self.public_host(), key)
    }
}

fn required_env(name: &str) -> StorageResult<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(StorageError::config_error(format!("{} not set", name))),
    }
}

/// Object key for an uploaded audio file:
/// `audio/{YYYYmmdd_HHMMSS}_{8 hex chars}.{ext}`.
pub fn object_key(now: DateTime<Local>, id: Uuid, extension: &str) -> String {
    let short_id: String = id.simple().to_string().chars().take(8).collect();
    format!(
        "{}/{}_{}.{}",
        AUDIO_PREFIX,
        now.format("%Y%m%d_%H%M%S"),
        short_id,
        extension
    )
}

/// Object key behind a public URL.
///
/// Everything after `{public_host}/` is the key; a string that does not
/// contain the host is taken as a key already.
pub fn key_from_url<'a>(url: &'a str, public_host: &str) -> &'a str {
    let marker = format!("{}/", public_host);
    match url.rfind(&marker) {
        Some(pos) => &url[pos + marker.len()..],
        None => url,
    }
}

/// Alibaba Cloud OSS storage client.
#[derive(Clone)]
pub struct OssClient {
    client: Client,
    config: OssConfig,
}

impl OssClient {
    /// Create a new OSS client from configuration.
    pub fn new(config: OssConfig) -> StorageResult<Self> {
        if config.bucket.is_empty() {
            return Err(StorageError::config_error("OSS bucket is empty"));
        }

        let credentials = Credentials::new(
            &config.access_key_id,
            &config.access_key_secret,
            None,
            None,
            "oss",
        );

        // OSS only serves virtual-hosted buckets; custom endpoints (local
        // S3 emulators) need path style.
        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(config.endpoint_url())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(config.endpoint.is_some())
            .build();

        Ok(Self {
            client: Client::from_conf(sdk_config),
            config,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Self::new(OssConfig::from_env()?)
    }

    pub fn config(&self) -> &OssConfig {
        &self.config
    }

    /// Upload audio bytes and return the object's public URL.
    pub async fn upload_audio(&self, data: Vec<u8>, extension: &str) -> StorageResult<String> {
        let key = object_key(Local::now(), Uuid::new_v4(), extension);
        debug!("Uploading {} bytes to {}", data.len(), key);

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        info!("Uploaded {}", key);
        Ok(self.config.public_url(&key))
    }

    /// Delete an object by key.
    pub async fn delete_object(&self, key: &str) -> StorageResult<()> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey("empty key".to_string()));
        }
        debug!("Deleting {}", key);

        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::delete_failed(e.to_string()))?;

        Ok(())
    }

    /// Delete the object behind a public URL.
    ///
    /// Returns `false` instead of an error when the delete fails.
    pub async fn delete_file(&self, file_url: &str) -> bool {
        let key = key_from_url(file_url, &self.config.public_host());
        match self.delete_object(key).await {
            Ok(()) => {
                info!("Deleted {}", key);
                true
            }
            Err(e) => {
                warn!(file_url = %file_url, "Failed to delete OSS object: {}", e);
                false
            }
        }
    }

    /// Check that the bucket is reachable with the configured credentials.
    pub async fn check_connectivity(&self) -> StorageResult<()> {
        self.client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
            .map_err(|e| StorageError::Unreachable(e.to_string()))?;
        Ok(())
    }
}
