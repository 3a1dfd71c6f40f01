//! Signed uploads to Cloudinary.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::info;

use contacts_core::config::AvatarConfig;
use contacts_core::error::{AppError, ErrorKind};
use contacts_core::result::AppResult;

use super::{AvatarImage, AvatarUploader};

/// Edge length of the square delivery transform.
const AVATAR_SIZE: u32 = 250;

/// Cloudinary assumes SHA-1 unless the request names the digest.
const SIGNATURE_ALGORITHM: &str = "sha256";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    version: u64,
}

/// Uploads avatars to Cloudinary and returns a 250×250 fill-cropped URL.
#[derive(Clone)]
pub struct CloudinaryUploader {
    http: reqwest::Client,
    config: AvatarConfig,
}

impl std::fmt::Debug for CloudinaryUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryUploader")
            .field("cloud_name", &self.config.cloud_name)
            .finish_non_exhaustive()
    }
}

impl CloudinaryUploader {
    /// Builds the HTTP client. Requests time out after `timeout`.
    pub fn new(config: &AvatarConfig, timeout: Duration) -> AppResult<Self> {
        if config.cloud_name.is_empty() || config.api_key.is_empty() || config.api_secret.is_empty()
        {
            return Err(AppError::configuration(
                "avatar.cloud_name, avatar.api_key and avatar.api_secret are required",
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    fn public_id(&self, username: &str) -> String {
        format!("{}/{username}", self.config.folder)
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }

    /// Delivery URL for an uploaded image, cropped to a square.
    fn delivery_url(&self, public_id: &str, version: u64) -> String {
        format!(
            "https://res.cloudinary.com/{}/image/upload/c_fill,h_{AVATAR_SIZE},w_{AVATAR_SIZE}/v{version}/{public_id}",
            self.config.cloud_name
        )
    }

    /// Text fields of a signed upload request. `signature_algorithm` and
    /// `api_key` travel with the request but are not signed.
    fn upload_fields(&self, public_id: String, timestamp: String) -> Vec<(&'static str, String)> {
        let signed = [
            ("overwrite", "true".to_string()),
            ("public_id", public_id),
            ("timestamp", timestamp),
        ];
        let signature = sign(&signed, &self.config.api_secret);

        let mut fields = vec![("api_key", self.config.api_key.clone())];
        fields.extend(signed);
        fields.push(("signature", signature));
        fields.push(("signature_algorithm", SIGNATURE_ALGORITHM.to_string()));
        fields
    }
}

/// Signature over the alphabetically sorted, signed parameters.
fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    hex::encode(Sha256::digest(format!("{joined}{api_secret}").as_bytes()))
}

fn upstream_error(e: reqwest::Error) -> AppError {
    AppError::with_source(
        ErrorKind::DependencyUnavailable,
        "Image host request failed",
        e,
    )
}

#[async_trait]
impl AvatarUploader for CloudinaryUploader {
    async fn upload(&self, username: &str, image: AvatarImage) -> AppResult<String> {
        let fields = self.upload_fields(
            self.public_id(username),
            Utc::now().timestamp().to_string(),
        );

        let mut part = Part::bytes(image.data.to_vec()).file_name(image.file_name);
        if let Some(content_type) = image.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| AppError::with_source(ErrorKind::Invalid, "Invalid content type", e))?;
        }

        let form = fields
            .into_iter()
            .fold(Form::new().part("file", part), |form, (name, value)| {
                form.text(name, value)
            });

        let response = self
            .http
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(upstream_error)?
            .error_for_status()
            .map_err(upstream_error)?;

        let uploaded: UploadResponse = response.json().await.map_err(upstream_error)?;
        info!(public_id = %uploaded.public_id, "Avatar uploaded");
        Ok(self.delivery_url(&uploaded.public_id, uploaded.version))
    }
}
