use async_trait::async_trait;
use chrono::Utc;
use error_stack::{Result, ResultExt};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{MediaUploader, UploadError};
use crate::config;

/// Signed uploads through Cloudinary's upload API.
///
/// Signatures use SHA-256, which has to be enabled on the account.
#[derive(Debug)]
pub struct CloudinaryUploader {
    client: reqwest::Client,
    config: config::Media,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl CloudinaryUploader {
    #[must_use]
    pub fn new(client: reqwest::Client, config: config::Media) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }
}

/// Signs the upload parameters (sorted by name, secret appended).
fn sign(folder: &str, timestamp: i64, secret: &str) -> String {
    let payload = format!("folder={folder}&timestamp={timestamp}{secret}");
    hex::encode(Sha256::digest(payload.as_bytes()))
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    #[tracing::instrument(skip_all, name = "media.upload")]
    async fn upload(&self, source: &str) -> Result<String, UploadError> {
        let timestamp = Utc::now().timestamp();
        let signature = sign(
            &self.config.upload_folder,
            timestamp,
            self.config.api_secret.as_str(),
        );
        let timestamp = timestamp.to_string();

        let form = [
            ("file", source),
            ("api_key", self.config.api_key.as_str()),
            ("folder", self.config.upload_folder.as_str()),
            ("timestamp", timestamp.as_str()),
            ("signature", signature.as_str()),
            ("signature_algorithm", "sha256"),
        ];

        let response = self
            .client
            .post(self.endpoint())
            .timeout(self.config.timeout())
            .form(&form)
            .send()
            .await
            .change_context(UploadError)
            .attach_printable("could not reach media provider")?
            .error_for_status()
            .change_context(UploadError)
            .attach_printable("media provider rejected the upload")?
            .json::<UploadResponse>()
            .await
            .change_context(UploadError)
            .attach_printable("unexpected response from media provider")?;

        Ok(response.secure_url)
    }
}
