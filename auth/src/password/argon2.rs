use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;
use super::legacy;
use crate::settings::ConfigurationError;
use crate::settings::HashingSettings;

const DUMMY_PASSWORD: &str = "timing-equalisation-placeholder";

/// Password hashing and verification.
///
/// Hashes with Argon2id using the configured work factor. Verification reads
/// the algorithm, cost and salt from the stored hash, so hashes produced under
/// older parameters (or legacy bcrypt hashes) keep verifying.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl PasswordHasher {
    /// Create a password hasher with the given work factor.
    ///
    /// Also precomputes the dummy hash used to equalise login latency: bcrypt
    /// at `legacy_bcrypt_cost` when set, Argon2id with these parameters otherwise.
    ///
    /// # Errors
    /// * `InvalidHashParameters` - Argon2 rejected the parameters, or the
    ///   bcrypt cost is outside 4..=31
    pub fn new(settings: &HashingSettings) -> Result<Self, ConfigurationError> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|e| ConfigurationError::InvalidHashParameters(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_hash = match settings.legacy_bcrypt_cost {
            Some(cost) => legacy::hash(DUMMY_PASSWORD, cost),
            None => Self::hash_with(&argon2, DUMMY_PASSWORD),
        }
        .map_err(|e| ConfigurationError::InvalidHashParameters(e.to_string()))?;

        Ok(Self { argon2, dummy_hash })
    }

    /// Hash a plaintext password securely.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Self::hash_with(&self.argon2, password)
    }

    fn hash_with(argon2: &Argon2<'static>, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Digests are compared in constant time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored hash, Argon2 PHC string or legacy bcrypt
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash` - Hash format, algorithm or version is not supported
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        if legacy::is_bcrypt(hash) {
            return legacy::verify(password, hash);
        }

        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::MalformedHash(format!("Invalid password hash: {}", e))
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
        }
    }

    /// Hash produced at construction, in the scheme the stored hashes use.
    pub fn dummy_hash(&self) -> &str {
        &self.dummy_hash
    }
}
