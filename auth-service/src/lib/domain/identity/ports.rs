use async_trait::async_trait;
use auth::Claims;

use crate::domain::identity::models::Credentials;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LoginOutcome;
use crate::domain::identity::models::Username;
use crate::identity::errors::AuthError;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `credentials` - Submitted username and plaintext password
    ///
    /// # Returns
    /// Signed token with its lifetime and the identity it was issued for
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `Password` - Stored hash is malformed
    /// * `CredentialStore` - Lookup failed
    /// * `TokenIssue` - Token encoding failed
    async fn login(&self, credentials: Credentials) -> Result<LoginOutcome, AuthError>;

    /// Whether a token is currently valid.
    fn validate_token(&self, token: &str) -> bool;

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `InvalidToken` - Malformed, tampered or expired token
    fn extract_claims(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Read-only lookup of identity records.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve identity by username.
    ///
    /// # Arguments
    /// * `username` - Username to search for
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `CredentialStore` - Lookup failed or stored record is invalid
    async fn find_identity_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, AuthError>;
}
