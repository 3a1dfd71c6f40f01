//! Avatar defaults and uploads.

pub mod cloudinary;
pub mod gravatar;

pub use cloudinary::CloudinaryUploader;
pub use gravatar::gravatar_url;

use async_trait::async_trait;
use bytes::Bytes;

use contacts_core::error::AppError;
use contacts_core::result::AppResult;

/// An uploaded image file.
#[derive(Debug, Clone)]
pub struct AvatarImage {
    /// Original file name from the upload form.
    pub file_name: String,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// Raw bytes.
    pub data: Bytes,
}

/// Stores avatar images on an external host.
#[async_trait]
pub trait AvatarUploader: Send + Sync + std::fmt::Debug + 'static {
    /// Upload `image` for `username` and return its public URL.
    async fn upload(&self, username: &str, image: AvatarImage) -> AppResult<String>;
}

/// Uploader used when no image host is configured.
#[derive(Debug, Clone, Default)]
pub struct DisabledUploader;

#[async_trait]
impl AvatarUploader for DisabledUploader {
    async fn upload(&self, _username: &str, _image: AvatarImage) -> AppResult<String> {
        Err(AppError::dependency_unavailable(
            "Avatar uploads are not configured",
        ))
    }
}
