//! Checksum of the profile a plan was generated from.

use sha2::{Digest, Sha256};

use crate::api::StudentProfile;

/// Calculate the SHA-256 checksum of `content`.
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checksum of the profile's canonical JSON form.
///
/// The profile is re-serialized from its typed form, so key order and
/// ignored or malformed input fields do not change the result.
pub fn profile_checksum(profile: &StudentProfile) -> String {
    let canonical = serde_json::to_string(profile).unwrap_or_default();
    calculate_checksum(&canonical)
}
