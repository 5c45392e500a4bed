use std::sync::Arc;

use chrono::Duration;

use crate::clock::Clock;
use crate::jwt::Claims;
use crate::jwt::IssuedToken;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::role::Role;
use crate::settings::AuthSettings;
use crate::settings::ConfigurationError;

/// Authentication coordinator combining password verification and JWT issuance.
///
/// Built once at startup from immutable settings and shared by reference;
/// every operation is stateless and safe to call concurrently.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Errors
    /// * `ConfigurationError` - Signing key, token lifetime or hash parameters invalid
    pub fn new(settings: &AuthSettings, clock: Arc<dyn Clock>) -> Result<Self, ConfigurationError> {
        Ok(Self {
            password_hasher: PasswordHasher::new(&settings.hashing)?,
            jwt_handler: JwtHandler::new(&settings.token, clock)?,
        })
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Run a full verification against the dummy hash and discard the result.
    ///
    /// Called when the username is unknown so that the response takes as long
    /// as a wrong password would. The dummy hash uses bcrypt when the store
    /// still holds legacy bcrypt hashes.
    pub fn verify_dummy(&self, password: &str) {
        let _ = self
            .password_hasher
            .verify(password, self.password_hasher.dummy_hash());
    }

    /// Verify credentials and issue a token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is malformed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject_id: i64,
        username: &str,
        role: Role,
    ) -> Result<IssuedToken, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.jwt_handler.issue(subject_id, username, role)?)
    }

    /// Issue a token without password verification.
    pub fn issue_token(
        &self,
        subject_id: i64,
        username: &str,
        role: Role,
    ) -> Result<IssuedToken, JwtError> {
        self.jwt_handler.issue(subject_id, username, role)
    }

    /// Whether a token is currently valid.
    pub fn validate_token(&self, token: &str) -> bool {
        self.jwt_handler.validate(token)
    }

    /// Verify a token and return its claims.
    pub fn extract_claims(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.extract_claims(token)
    }

    /// Lifetime of issued tokens.
    pub fn token_ttl(&self) -> Duration {
        self.jwt_handler.ttl()
    }
}
