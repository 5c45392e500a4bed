//! Verification of bcrypt hashes written by earlier deployments.
//!
//! New hashes are always Argon2id; bcrypt is accepted for verification only.
//! The one bcrypt hash produced here is the dummy for unknown usernames.

use super::errors::PasswordError;

const BCRYPT_PREFIXES: [&str; 4] = ["$2a$", "$2b$", "$2x$", "$2y$"];

pub(super) fn is_bcrypt(hash: &str) -> bool {
    BCRYPT_PREFIXES
        .iter()
        .any(|prefix| hash.starts_with(prefix))
}

/// Verify against a bcrypt hash using its embedded cost and salt.
pub(super) fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(password, hash)
        .map_err(|e| PasswordError::MalformedHash(format!("Invalid bcrypt hash: {}", e)))
}

/// Hash with bcrypt at the given cost.
pub(super) fn hash(password: &str, cost: u32) -> Result<String, PasswordError> {
    bcrypt::hash(password, cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
}
