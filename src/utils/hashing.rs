//! Stable document fingerprints for survey reports

use sha2::{Digest, Sha256};

/// Hex SHA-256 of the document text, shortened to 16 characters.
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)[..16].to_string()
}
