use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;

use crate::domain::identity::models::Credentials;
use crate::domain::identity::models::LoginOutcome;
use crate::domain::identity::models::Username;
use crate::identity::errors::AuthError;
use crate::identity::ports::AuthServicePort;
use crate::identity::ports::CredentialStore;

/// Domain service implementation for login and token checks.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct LoginService<CS>
where
    CS: CredentialStore,
{
    credential_store: Arc<CS>,
    authenticator: Arc<Authenticator>,
}

impl<CS> LoginService<CS>
where
    CS: CredentialStore,
{
    /// Create a new login service with injected dependencies.
    ///
    /// # Arguments
    /// * `credential_store` - Identity lookup implementation
    /// * `authenticator` - Password verifier and token issuer
    pub fn new(credential_store: Arc<CS>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            credential_store,
            authenticator,
        }
    }

    /// Run password hashing work on the blocking pool.
    async fn run_blocking<T, F>(&self, work: F) -> Result<T, AuthError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || work(authenticator.as_ref()))
            .await
            .map_err(|e| AuthError::Verification(e.to_string()))
    }
}

#[async_trait]
impl<CS> AuthServicePort for LoginService<CS>
where
    CS: CredentialStore,
{
    async fn login(&self, credentials: Credentials) -> Result<LoginOutcome, AuthError> {
        tracing::info!(username = %credentials.username, "Login attempt");

        // A username that cannot exist is handled exactly like an unknown one.
        let identity = match Username::new(credentials.username.clone()) {
            Ok(username) => {
                self.credential_store
                    .find_identity_by_username(&username)
                    .await?
            }
            Err(e) => {
                tracing::debug!(error = %e, "Submitted username failed validation");
                None
            }
        };

        let Some(identity) = identity else {
            let password = credentials.password;
            self.run_blocking(move |authenticator| authenticator.verify_dummy(&password))
                .await?;
            tracing::warn!(
                username = %credentials.username,
                reason = "unknown_user",
                "Login failed"
            );
            return Err(AuthError::InvalidCredentials);
        };

        let password = credentials.password;
        let stored_hash = identity.password_hash.clone();
        let subject_id = identity.id.0;
        let username = identity.username.as_str().to_string();
        let role = identity.role;
        let issued = self
            .run_blocking(move |authenticator| {
                authenticator.authenticate(&password, &stored_hash, subject_id, &username, role)
            })
            .await?
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::warn!(
                        username = %identity.username,
                        user_id = %identity.id,
                        reason = "password_mismatch",
                        "Login failed"
                    );
                    AuthError::InvalidCredentials
                }
                AuthenticationError::PasswordError(err) => {
                    tracing::error!(
                        user_id = %identity.id,
                        error = %err,
                        "Stored password hash is unusable"
                    );
                    AuthError::Password(err)
                }
                AuthenticationError::JwtError(err) => {
                    tracing::error!(user_id = %identity.id, error = %err, "Token issuance failed");
                    AuthError::TokenIssue(err)
                }
            })?;

        tracing::info!(
            username = %identity.username,
            user_id = %identity.id,
            role = %identity.role,
            "Login successful"
        );

        Ok(LoginOutcome {
            token: issued.token,
            expires_in: self.authenticator.token_ttl(),
            user_id: identity.id,
            username: identity.username,
            role: identity.role,
        })
    }

    fn validate_token(&self, token: &str) -> bool {
        self.authenticator.validate_token(token)
    }

    fn extract_claims(&self, token: &str) -> Result<Claims, AuthError> {
        self.authenticator
            .extract_claims(token)
            .map_err(AuthError::InvalidToken)
    }
}
