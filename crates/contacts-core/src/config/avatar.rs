//! Avatar image host configuration.

use serde::{Deserialize, Serialize};

/// Cloudinary credentials. Uploads are refused when `enabled` is false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarConfig {
    /// Whether avatar uploads are enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Cloudinary cloud name.
    #[serde(default)]
    pub cloud_name: String,
    /// Cloudinary API key.
    #[serde(default)]
    pub api_key: String,
    /// Cloudinary API secret.
    #[serde(default)]
    pub api_secret: String,
    /// Folder prefix for uploaded images.
    #[serde(default = "default_folder")]
    pub folder: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            folder: default_folder(),
        }
    }
}

fn default_folder() -> String {
    "ContactsApp".to_string()
}
