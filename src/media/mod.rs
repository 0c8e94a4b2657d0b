//! Image hosting.
//!
//! Clients send images as either a remote `http(s)` URL or a base64
//! `data:` URI. Both are handed to the provider as is and only the
//! secure URL it returns is stored.
use async_trait::async_trait;
use error_stack::{Report, Result};
use thiserror::Error;

mod cloudinary;
pub use cloudinary::CloudinaryUploader;

#[derive(Debug, Error)]
#[error("Failed to upload image")]
pub struct UploadError;

/// Whether `source` is something the uploader accepts.
#[must_use]
pub fn is_supported_source(source: &str) -> bool {
    if let Some(rest) = source.strip_prefix("data:") {
        return rest.starts_with("image/") && rest.contains(";base64,");
    }
    url::Url::parse(source).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

#[async_trait]
pub trait MediaUploader: Send + Sync + std::fmt::Debug {
    /// Uploads the image and returns its secure URL.
    async fn upload(&self, source: &str) -> Result<String, UploadError>;
}

/// Used when no media provider is configured. Every upload fails.
#[derive(Debug, Default)]
pub struct DisabledUploader;

#[async_trait]
impl MediaUploader for DisabledUploader {
    async fn upload(&self, _source: &str) -> Result<String, UploadError> {
        Err(Report::new(UploadError).attach_printable("media uploads are not configured"))
    }
}
