//! Gravatar identicon URLs for new accounts.

use sha2::{Digest, Sha256};

/// Default avatar for `email`: its trimmed, lower-cased SHA-256 identicon.
pub fn gravatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?d=identicon",
        hex::encode(digest)
    )
}
