//! Alibaba Cloud OSS storage client.
//!
//! OSS is reached through its S3-compatible API. This crate provides:
//! - Audio upload under a timestamped `audio/` key with a public URL
//! - Deletion by public URL
//! - Bucket connectivity checks

pub mod client;
pub mod error;

pub use client::{key_from_url, object_key, OssClient, OssConfig};
pub use error::{StorageError, StorageResult};
